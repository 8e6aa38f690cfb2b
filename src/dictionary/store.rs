use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::core::anchor::{Anchor, Direction};
use crate::core::types::{AnchorId, GenomicCoord, OrientedNode, Sentinel, SnarlId};
use crate::graph::GraphError;
use crate::matching::counts::{AnchorCounts, CountDictionary};
use crate::utils::io::{create_output, open_input};

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Anchor id collision: {0}")]
    AnchorIdCollision(AnchorId),

    #[error("Invalid anchor {id}: {message}")]
    InvalidAnchor { id: AnchorId, message: String },

    #[error("Failed to read dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dictionary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to decode dictionary: {0}")]
    Binary(#[from] bincode::Error),
}

/// Dictionary format version for compatibility checking
pub const DICTIONARY_VERSION: &str = "1.0.0";

/// Where a sentinel leads: the anchor and the direction it is crossed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SentinelHit {
    pub anchor: AnchorId,
    pub direction: Direction,
}

/// One anchor in the serialized dictionary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRecord {
    pub id: AnchorId,
    pub snarl: SnarlId,
    pub canonical_path: Vec<OrientedNode>,
    pub length_bp: u64,
    pub position: Option<GenomicCoord>,
    /// Reads with a path match, present after a matching run
    pub path_reads: Option<u64>,
    /// Reads with a base-level match, present after a matching run
    pub bp_reads: Option<u64>,
}

/// Serializable dictionary format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryData {
    pub version: String,
    pub created_at: String,
    /// Paths the canonical walks and positions were taken from
    pub reference_paths: Vec<String>,
    pub anchors: Vec<AnchorRecord>,
}

/// On-disk encoding, chosen from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictionaryFormat {
    Json,
    Binary,
}

impl DictionaryFormat {
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            _ => Self::Binary,
        }
    }
}

/// A dictionary read back from disk, with the counts of the run that wrote it
#[derive(Debug)]
pub struct LoadedDictionary {
    pub dictionary: AnchorDictionary,
    pub counts: Option<AnchorCounts>,
}

/// Anchors indexed by id and by sentinel.
///
/// Anchors live in an arena indexed by their dense `AnchorId`; the sentinel
/// map stores ids. Both sentinels of an anchor resolve to the same id.
/// Read-only once built: later stages produce new snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorDictionary {
    /// All anchors; `anchors[i].id == AnchorId(i)`
    anchors: Vec<Anchor>,

    /// Index: sentinel -> anchor and crossing direction
    sentinels: HashMap<Sentinel, SentinelHit>,

    /// Paths used for canonical walks and positions
    reference_paths: Vec<String>,

    /// Sentinels that were already claimed by an earlier anchor
    shared_sentinels: usize,
}

impl AnchorDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor and claim its sentinels.
    ///
    /// Ids are allocated densely, so `anchor.id` must equal the current length.
    /// A sentinel already owned by another anchor keeps its owner.
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::AnchorIdCollision` if the id is taken, or
    /// `DictionaryError::InvalidAnchor` if the id skips ahead or the canonical
    /// path has fewer than two nodes.
    pub fn insert(&mut self, anchor: Anchor) -> Result<(), DictionaryError> {
        let expected = self.anchors.len();
        if anchor.id.index() < expected {
            return Err(DictionaryError::AnchorIdCollision(anchor.id));
        }
        if anchor.id.index() > expected {
            return Err(DictionaryError::InvalidAnchor {
                id: anchor.id,
                message: format!("expected id {expected}"),
            });
        }
        if anchor.len() < 2 {
            return Err(DictionaryError::InvalidAnchor {
                id: anchor.id,
                message: "canonical path must include both boundaries".to_string(),
            });
        }

        for (sentinel, direction) in [
            (anchor.entry_sentinel(), Direction::Forward),
            (anchor.exit_sentinel(), Direction::Reverse),
        ] {
            let hit = SentinelHit {
                anchor: anchor.id,
                direction,
            };
            if let Some(existing) = self.sentinels.get(&sentinel) {
                warn!(
                    "Sentinel {sentinel} of anchor {} already belongs to anchor {}",
                    anchor.id, existing.anchor
                );
                self.shared_sentinels += 1;
            } else {
                self.sentinels.insert(sentinel, hit);
            }
        }

        self.anchors.push(anchor);
        Ok(())
    }

    /// Next free anchor id
    pub fn next_id(&self) -> AnchorId {
        #[allow(clippy::cast_possible_truncation)] // Anchor counts fit in u32
        AnchorId(self.anchors.len() as u32)
    }

    pub fn set_reference_paths(&mut self, paths: Vec<String>) {
        self.reference_paths = paths;
    }

    pub fn reference_paths(&self) -> &[String] {
        &self.reference_paths
    }

    /// Get an anchor by id
    pub fn get(&self, id: AnchorId) -> Option<&Anchor> {
        self.anchors.get(id.index())
    }

    /// Find the anchor entered through `sentinel`
    pub fn lookup(&self, sentinel: Sentinel) -> Option<SentinelHit> {
        self.sentinels.get(&sentinel).copied()
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Sentinel map in a stable order
    pub fn sentinel_map(&self) -> BTreeMap<Sentinel, SentinelHit> {
        self.sentinels.iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn sentinel_count(&self) -> usize {
        self.sentinels.len()
    }

    pub fn shared_sentinels(&self) -> usize {
        self.shared_sentinels
    }

    /// Number of anchors in the dictionary
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Snapshot with every anchor's position replaced; `positions[i]` goes to anchor `i`
    #[must_use]
    pub fn with_positions(&self, positions: Vec<Option<GenomicCoord>>) -> Self {
        let mut snapshot = self.clone();
        for (anchor, position) in snapshot.anchors.iter_mut().zip(positions) {
            anchor.position = position;
        }
        snapshot
    }

    /// Serializable form, joined with read counts when given
    pub fn to_data(&self, counts: Option<&AnchorCounts>) -> DictionaryData {
        let count = |view: fn(&AnchorCounts) -> &CountDictionary, id: AnchorId| {
            counts.map(|counts| view(counts).get(id))
        };
        let anchors = self
            .anchors
            .iter()
            .map(|anchor| AnchorRecord {
                id: anchor.id,
                snarl: anchor.snarl,
                canonical_path: anchor.canonical_path.clone(),
                length_bp: anchor.length_bp,
                position: anchor.position.clone(),
                path_reads: count(|c| &c.path, anchor.id),
                bp_reads: count(|c| &c.bp, anchor.id),
            })
            .collect();

        DictionaryData {
            version: DICTIONARY_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            reference_paths: self.reference_paths.clone(),
            anchors,
        }
    }

    /// Rebuild a dictionary (and counts, if every anchor carries them)
    ///
    /// # Errors
    ///
    /// Returns the first insertion error; see [`AnchorDictionary::insert`].
    pub fn from_data(data: DictionaryData) -> Result<LoadedDictionary, DictionaryError> {
        // Version check (warn but don't fail)
        if data.version != DICTIONARY_VERSION {
            warn!(
                "Dictionary version mismatch (expected {}, found {})",
                DICTIONARY_VERSION, data.version
            );
        }

        let has_counts = !data.anchors.is_empty()
            && data
                .anchors
                .iter()
                .all(|record| record.path_reads.is_some() && record.bp_reads.is_some());
        let mut path_counts = CountDictionary::default();
        let mut bp_counts = CountDictionary::default();

        let mut dictionary = Self::new();
        dictionary.reference_paths = data.reference_paths;
        for record in data.anchors {
            if has_counts {
                path_counts.set(record.id, record.path_reads.unwrap_or_default());
                bp_counts.set(record.id, record.bp_reads.unwrap_or_default());
            }
            let mut anchor =
                Anchor::new(record.id, record.snarl, record.canonical_path, record.length_bp);
            anchor.position = record.position;
            dictionary.insert(anchor)?;
        }

        let counts = has_counts.then_some(AnchorCounts {
            path: path_counts,
            bp: bp_counts,
        });
        Ok(LoadedDictionary { dictionary, counts })
    }

    /// Write the dictionary as JSON (`.json`) or bincode (anything else)
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Io` if the file cannot be written, or an
    /// encoding error.
    pub fn save(&self, path: &Path, counts: Option<&AnchorCounts>) -> Result<(), DictionaryError> {
        let data = self.to_data(counts);
        let mut output = create_output(path)?;
        match DictionaryFormat::from_path(path) {
            DictionaryFormat::Json => serde_json::to_writer_pretty(&mut output, &data)?,
            DictionaryFormat::Binary => bincode::serialize_into(&mut output, &data)?,
        }
        output.flush()?;
        Ok(())
    }

    /// Load a dictionary written by [`AnchorDictionary::save`]
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Io` if the file cannot be read, a decoding
    /// error, or an insertion error for inconsistent anchors.
    pub fn load(path: &Path) -> Result<LoadedDictionary, DictionaryError> {
        let reader = open_input(path)?;
        let data: DictionaryData = match DictionaryFormat::from_path(path) {
            DictionaryFormat::Json => serde_json::from_reader(reader)?,
            DictionaryFormat::Binary => bincode::deserialize_from(reader)?,
        };
        Self::from_data(data)
    }

    /// Export to a JSON string
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Json` if serialization fails.
    pub fn to_json(&self, counts: Option<&AnchorCounts>) -> Result<String, DictionaryError> {
        Ok(serde_json::to_string_pretty(&self.to_data(counts))?)
    }

    /// Parse a dictionary from a JSON string
    ///
    /// # Errors
    ///
    /// See [`AnchorDictionary::load`].
    pub fn from_json(json: &str) -> Result<LoadedDictionary, DictionaryError> {
        Self::from_data(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fwd;

    fn anchor(id: u32, walk: &[u64], length_bp: u64) -> Anchor {
        Anchor::new(AnchorId(id), SnarlId(id), fwd(walk), length_bp)
    }

    fn two_anchor_dictionary() -> AnchorDictionary {
        let mut dictionary = AnchorDictionary::new();
        dictionary.insert(anchor(0, &[1, 2, 3, 4, 5], 4)).unwrap();
        dictionary.insert(anchor(1, &[5, 7, 9], 1)).unwrap();
        dictionary.set_reference_paths(vec!["ref".to_string()]);
        dictionary
    }

    #[test]
    fn test_both_sentinels_resolve_to_same_anchor() {
        let dictionary = two_anchor_dictionary();
        let entry = dictionary.lookup(OrientedNode::forward(1)).unwrap();
        let exit = dictionary.lookup(OrientedNode::reverse(5)).unwrap();
        assert_eq!(entry.anchor, AnchorId(0));
        assert_eq!(exit.anchor, AnchorId(0));
        assert_eq!(entry.direction, Direction::Forward);
        assert_eq!(exit.direction, Direction::Reverse);

        // >5 enters the second anchor; <5 leaves it backwards into the first
        assert_eq!(dictionary.lookup(OrientedNode::forward(5)).unwrap().anchor, AnchorId(1));
        assert_eq!(dictionary.sentinel_count(), 4);
        assert!(dictionary.lookup(OrientedNode::forward(2)).is_none());
    }

    #[test]
    fn test_id_collision_is_an_error() {
        let mut dictionary = two_anchor_dictionary();
        let result = dictionary.insert(anchor(1, &[20, 21, 22], 1));
        assert!(matches!(result, Err(DictionaryError::AnchorIdCollision(AnchorId(1)))));

        let result = dictionary.insert(anchor(5, &[20, 21, 22], 1));
        assert!(matches!(result, Err(DictionaryError::InvalidAnchor { .. })));
        assert_eq!(dictionary.len(), 2);
    }

    #[test]
    fn test_shared_sentinel_keeps_first_owner() {
        let mut dictionary = two_anchor_dictionary();
        dictionary.insert(anchor(2, &[1, 8, 30], 1)).unwrap();
        assert_eq!(dictionary.lookup(OrientedNode::forward(1)).unwrap().anchor, AnchorId(0));
        assert_eq!(dictionary.lookup(OrientedNode::reverse(30)).unwrap().anchor, AnchorId(2));
        assert_eq!(dictionary.shared_sentinels(), 1);
    }

    #[test]
    fn test_json_roundtrip_without_counts() {
        let dictionary = two_anchor_dictionary().with_positions(vec![
            Some(GenomicCoord {
                path: "ref".to_string(),
                offset: 2,
            }),
            None,
        ]);
        let json = dictionary.to_json(None).unwrap();
        assert!(json.contains("\">1\""));

        let loaded = AnchorDictionary::from_json(&json).unwrap();
        assert_eq!(loaded.dictionary, dictionary);
        assert_eq!(loaded.dictionary.sentinel_map(), dictionary.sentinel_map());
        assert!(loaded.counts.is_none());
    }

    #[test]
    fn test_file_roundtrip_with_counts_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let dictionary = two_anchor_dictionary();
        let mut counts = AnchorCounts::zeroed(&dictionary);
        counts.path.set(AnchorId(0), 3);
        counts.bp.set(AnchorId(0), 2);

        for name in ["dict.json", "dict.bin"] {
            let path = dir.path().join(name);
            dictionary.save(&path, Some(&counts)).unwrap();
            let loaded = AnchorDictionary::load(&path).unwrap();
            assert_eq!(loaded.dictionary, dictionary);
            assert_eq!(loaded.counts.as_ref(), Some(&counts));
        }
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DictionaryFormat::from_path(Path::new("a.JSON")), DictionaryFormat::Json);
        assert_eq!(DictionaryFormat::from_path(Path::new("a.anchors")), DictionaryFormat::Binary);
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let dictionary = two_anchor_dictionary();
        let mut data = dictionary.to_data(None);
        data.anchors[1].id = AnchorId(0);
        assert!(matches!(
            AnchorDictionary::from_data(data),
            Err(DictionaryError::AnchorIdCollision(AnchorId(0)))
        ));
    }
}
