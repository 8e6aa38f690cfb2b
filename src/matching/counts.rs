use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::types::AnchorId;
use crate::dictionary::store::AnchorDictionary;
use crate::matching::association::ReadAnchorAssociation;

/// Read count per anchor. Anchors without reads are present with count 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountDictionary {
    counts: BTreeMap<AnchorId, u64>,
}

impl CountDictionary {
    /// Every anchor of `dictionary` with a zero count
    pub fn zeroed(dictionary: &AnchorDictionary) -> Self {
        Self {
            counts: dictionary.anchors().iter().map(|anchor| (anchor.id, 0)).collect(),
        }
    }

    /// Count the distinct reads of each anchor in `reads`
    pub fn from_reads(
        dictionary: &AnchorDictionary,
        reads: &BTreeMap<AnchorId, BTreeSet<String>>,
    ) -> Self {
        let mut counts = Self::zeroed(dictionary);
        for (anchor, reads) in reads {
            counts.set(*anchor, reads.len() as u64);
        }
        counts
    }

    /// Count for `anchor`; 0 for anchors never seen
    pub fn get(&self, anchor: AnchorId) -> u64 {
        self.counts.get(&anchor).copied().unwrap_or(0)
    }

    pub fn set(&mut self, anchor: AnchorId, count: u64) {
        self.counts.insert(anchor, count);
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, u64)> + '_ {
        self.counts.iter().map(|(anchor, count)| (*anchor, *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all anchors
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Path and base-level count views of one matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnchorCounts {
    pub path: CountDictionary,
    pub bp: CountDictionary,
}

impl AnchorCounts {
    pub fn zeroed(dictionary: &AnchorDictionary) -> Self {
        Self {
            path: CountDictionary::zeroed(dictionary),
            bp: CountDictionary::zeroed(dictionary),
        }
    }

    /// Aggregate an association into per-anchor counts
    pub fn aggregate(dictionary: &AnchorDictionary, association: &ReadAnchorAssociation) -> Self {
        Self {
            path: CountDictionary::from_reads(dictionary, association.path_matches()),
            bp: CountDictionary::from_reads(dictionary, association.bp_matches()),
        }
    }
}
