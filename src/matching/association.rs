use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::types::AnchorId;
use crate::matching::engine::RecordClassification;

/// Reads associated with each anchor, by match kind.
///
/// Every read in `bp_matches[a]` is also in `path_matches[a]`: recording a
/// base-level match records the path match too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadAnchorAssociation {
    path_matches: BTreeMap<AnchorId, BTreeSet<String>>,
    bp_matches: BTreeMap<AnchorId, BTreeSet<String>>,
}

impl ReadAnchorAssociation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_path_match(&mut self, anchor: AnchorId, read_id: &str) {
        self.path_matches
            .entry(anchor)
            .or_default()
            .insert(read_id.to_string());
    }

    pub fn record_bp_match(&mut self, anchor: AnchorId, read_id: &str) {
        self.record_path_match(anchor, read_id);
        self.bp_matches
            .entry(anchor)
            .or_default()
            .insert(read_id.to_string());
    }

    /// Reads whose path follows the anchor's canonical path
    pub fn path_matches(&self) -> &BTreeMap<AnchorId, BTreeSet<String>> {
        &self.path_matches
    }

    /// Reads that also agree with the anchor base for base
    pub fn bp_matches(&self) -> &BTreeMap<AnchorId, BTreeSet<String>> {
        &self.bp_matches
    }

    pub fn path_reads(&self, anchor: AnchorId) -> Option<&BTreeSet<String>> {
        self.path_matches.get(&anchor)
    }

    pub fn bp_reads(&self, anchor: AnchorId) -> Option<&BTreeSet<String>> {
        self.bp_matches.get(&anchor)
    }

    /// Union with another association
    pub fn merge(&mut self, other: Self) {
        for (anchor, reads) in other.path_matches {
            self.path_matches.entry(anchor).or_default().extend(reads);
        }
        for (anchor, reads) in other.bp_matches {
            self.bp_matches.entry(anchor).or_default().extend(reads);
        }
    }

    /// Does every base-level match have a path match?
    pub fn is_consistent(&self) -> bool {
        self.bp_matches.iter().all(|(anchor, reads)| {
            self.path_matches
                .get(anchor)
                .is_some_and(|path_reads| reads.is_subset(path_reads))
        })
    }
}

/// Match totals for one run, counted per sentinel occurrence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchCounters {
    pub reads_matching_path: u64,
    pub reads_matching_sequence: u64,
}

impl MatchCounters {
    /// Fraction of path matches that are also base-level matches.
    ///
    /// `None` when there were no path matches.
    #[allow(clippy::cast_precision_loss)] // Counts stay far below 2^52
    pub fn ratio(&self) -> Option<f64> {
        if self.reads_matching_path == 0 {
            return None;
        }
        Some(self.reads_matching_sequence as f64 / self.reads_matching_path as f64)
    }

    pub fn merge(&mut self, other: Self) {
        self.reads_matching_path += other.reads_matching_path;
        self.reads_matching_sequence += other.reads_matching_sequence;
    }
}

/// Line and record bookkeeping for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Non-empty input lines read
    pub lines: u64,
    /// Lines parsed into alignment records
    pub records: u64,
    /// Records without any sentinel hit
    pub skipped_records: u64,
    /// Sentinel hits examined
    pub sentinel_hits: u64,
    /// Lines that could not be parsed
    pub malformed_lines: u64,
}

impl ScanStats {
    pub fn merge(&mut self, other: Self) {
        self.lines += other.lines;
        self.records += other.records;
        self.skipped_records += other.skipped_records;
        self.sentinel_hits += other.sentinel_hits;
        self.malformed_lines += other.malformed_lines;
    }
}

/// Everything one matching run (or one shard of it) produces
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchRun {
    pub association: ReadAnchorAssociation,
    pub counters: MatchCounters,
    pub stats: ScanStats,
}

impl MatchRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one classified record into the run
    pub fn record(&mut self, classification: &RecordClassification) {
        self.stats.records += 1;
        if classification.is_skipped() {
            self.stats.skipped_records += 1;
            return;
        }
        for occurrence in &classification.occurrences {
            self.stats.sentinel_hits += 1;
            if !occurrence.path_match {
                continue;
            }
            self.counters.reads_matching_path += 1;
            if occurrence.bp_match {
                self.counters.reads_matching_sequence += 1;
                self.association
                    .record_bp_match(occurrence.anchor, &classification.read_id);
            } else {
                self.association
                    .record_path_match(occurrence.anchor, &classification.read_id);
            }
        }
    }

    pub fn record_malformed(&mut self) {
        self.stats.malformed_lines += 1;
    }

    /// Combine with another shard; order does not matter
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.association.merge(other.association);
        self.counters.merge(other.counters);
        self.stats.merge(other.stats);
        self
    }

    pub fn ratio(&self) -> Option<f64> {
        self.counters.ratio()
    }
}
