use std::io::{BufRead, Write};
use std::ops::Range;
use std::path::PathBuf;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::anchor::Direction;
use crate::core::types::AnchorId;
use crate::dictionary::store::AnchorDictionary;
use crate::graph::GraphIndex;
use crate::matching::association::MatchRun;
use crate::parsing::gaf::{AlignmentRecord, GafError};
use crate::report::trace::write_trace_rows;
use crate::utils::io::open_input;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Default number of lines classified together
pub const DEFAULT_BATCH_SIZE: usize = 10_000;

/// Configuration for a matching run
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Worker threads for classification; 0 uses every core
    pub threads: usize,
    /// Lines read and classified per batch
    pub batch_size: usize,
    /// Stop after this many alignment records
    pub max_records: Option<u64>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            batch_size: DEFAULT_BATCH_SIZE,
            max_records: None,
        }
    }
}

/// Outcome of one sentinel hit in an alignment path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OccurrenceOutcome {
    pub anchor: AnchorId,
    /// Index of the sentinel in the traversed path
    pub offset: usize,
    pub direction: Direction,
    pub path_match: bool,
    /// Only ever true together with `path_match`
    pub bp_match: bool,
}

/// Terminal state of a classified record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// At least one sentinel was tested
    Done,
    /// No sentinel in the path
    Skipped,
}

/// Everything the matcher found in one alignment record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordClassification {
    pub read_id: String,
    pub occurrences: Vec<OccurrenceOutcome>,
}

impl RecordClassification {
    pub fn status(&self) -> RecordStatus {
        if self.occurrences.is_empty() {
            RecordStatus::Skipped
        } else {
            RecordStatus::Done
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.status() == RecordStatus::Skipped
    }
}

/// Matches alignment records against an anchor dictionary.
///
/// [`AlignmentMatcher::classify`] looks at one record and touches no state;
/// [`AlignmentMatcher::run`] drives it over a GAF stream and folds the
/// results into a [`MatchRun`].
pub struct AlignmentMatcher<'a, G: GraphIndex + Sync + ?Sized> {
    dictionary: &'a AnchorDictionary,
    graph: &'a G,
    config: MatchingConfig,
}

impl<'a, G: GraphIndex + Sync + ?Sized> AlignmentMatcher<'a, G> {
    pub fn new(dictionary: &'a AnchorDictionary, graph: &'a G) -> Self {
        Self {
            dictionary,
            graph,
            config: MatchingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: MatchingConfig) -> Self {
        self.config = config;
        self
    }

    /// Test every sentinel occurrence in the record's path
    pub fn classify(&self, record: &AlignmentRecord) -> RecordClassification {
        let path = &record.traversed_path;
        let mut occurrences = Vec::new();
        let mut node_ends: Option<Vec<usize>> = None;

        for (offset, node) in path.iter().enumerate() {
            let Some(hit) = self.dictionary.lookup(*node) else {
                continue;
            };
            let Some(anchor) = self.dictionary.get(hit.anchor) else {
                continue;
            };

            let nodes = offset..offset + anchor.len();
            let path_match = nodes.end <= path.len()
                && anchor.matches_walk(&path[nodes.clone()], hit.direction);
            let bp_match = path_match && {
                let ends = node_ends.get_or_insert_with(|| self.node_ends(record));
                Self::is_baselevel_match(record, ends, &nodes)
            };
            debug!(
                "{}: anchor {} at {offset} path_match={path_match} bp_match={bp_match}",
                record.read_id, anchor.id
            );

            occurrences.push(OccurrenceOutcome {
                anchor: anchor.id,
                offset,
                direction: hit.direction,
                path_match,
                bp_match,
            });
        }

        RecordClassification {
            read_id: record.read_id.clone(),
            occurrences,
        }
    }

    /// Target offset where each node of the path ends, up to the first node
    /// missing from the graph
    fn node_ends(&self, record: &AlignmentRecord) -> Vec<usize> {
        let mut ends = Vec::with_capacity(record.traversed_path.len());
        let mut offset = 0usize;
        for node in &record.traversed_path {
            let Some(length) = self.graph.node_length(node.id) else {
                debug!("{}: node {} is not in the graph", record.read_id, node.id);
                break;
            };
            offset = offset.saturating_add(length);
            ends.push(offset);
        }
        ends
    }

    /// Target interval covered by the interior of the anchor crossing at `nodes`
    fn interior_interval(node_ends: &[usize], nodes: &Range<usize>) -> Option<Range<usize>> {
        let start = *node_ends.get(nodes.start)?;
        let end = *node_ends.get(nodes.end.checked_sub(2)?)?;
        Some(start..end)
    }

    /// Are the aligned bases over the anchor interior free of edits?
    fn is_baselevel_match(record: &AlignmentRecord, node_ends: &[usize], nodes: &Range<usize>) -> bool {
        let Some(interval) = Self::interior_interval(node_ends, nodes) else {
            return false;
        };
        if interval.start < record.path_interval.start || interval.end > record.path_interval.end {
            return false;
        }

        match &record.difference {
            Some(operations) => {
                let mut at = record.path_interval.start;
                for operation in operations {
                    if operation.conflicts_with(at, &interval) {
                        return false;
                    }
                    at = at.saturating_add(operation.target_len());
                }
                true
            }
            None => record.edits() == 0,
        }
    }

    fn thread_pool(&self) -> Result<rayon::ThreadPool, MatchError> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()?)
    }

    /// Classify every record of one GAF stream
    ///
    /// Malformed lines are logged, counted and skipped. When `trace` is given,
    /// one row per sentinel occurrence is written to it.
    ///
    /// # Errors
    ///
    /// Returns `MatchError::Io` if reading the stream or writing the trace
    /// fails, or `MatchError::ThreadPool` if the worker pool cannot start.
    pub fn run<R: BufRead>(
        &self,
        reader: R,
        trace: Option<&mut dyn Write>,
    ) -> Result<MatchRun, MatchError> {
        let pool = self.thread_pool()?;
        self.scan(&pool, reader, self.config.max_records, trace)
    }

    /// Treat each file as a shard and merge the shard results
    ///
    /// `max_records` applies to the files taken together, in the given order.
    ///
    /// # Errors
    ///
    /// See [`AlignmentMatcher::run`].
    pub fn run_files(
        &self,
        paths: &[PathBuf],
        mut trace: Option<&mut dyn Write>,
    ) -> Result<MatchRun, MatchError> {
        let pool = self.thread_pool()?;
        let mut run = MatchRun::new();

        for path in paths {
            let remaining = self
                .config
                .max_records
                .map(|limit| limit.saturating_sub(run.stats.records));
            if remaining == Some(0) {
                info!("Record limit reached, not reading {}", path.display());
                continue;
            }

            let shard_trace = trace.as_mut().map(|writer| &mut **writer as &mut dyn Write);
            let shard = self.scan(&pool, open_input(path)?, remaining, shard_trace)?;
            info!(
                "{}: {} records, {} malformed lines",
                path.display(),
                shard.stats.records,
                shard.stats.malformed_lines
            );
            run = run.merge(shard);
        }

        Ok(run)
    }

    fn scan<R: BufRead>(
        &self,
        pool: &rayon::ThreadPool,
        reader: R,
        limit: Option<u64>,
        mut trace: Option<&mut dyn Write>,
    ) -> Result<MatchRun, MatchError> {
        let batch_size = self.config.batch_size.max(1);
        let mut run = MatchRun::new();
        let mut lines = reader.lines();
        let mut line_number = 0usize;

        loop {
            let remaining = limit.map(|limit| limit.saturating_sub(run.stats.records));
            if remaining == Some(0) {
                break;
            }
            let capacity = remaining.map_or(batch_size, |remaining| {
                batch_size.min(usize::try_from(remaining).unwrap_or(usize::MAX))
            });

            let mut batch: Vec<(usize, String)> = Vec::with_capacity(capacity);
            while batch.len() < capacity {
                let Some(line) = lines.next() else {
                    break;
                };
                let line = line?;
                line_number += 1;
                if line.trim().is_empty() {
                    continue;
                }
                batch.push((line_number, line));
            }
            if batch.is_empty() {
                break;
            }

            let outcomes: Vec<Result<RecordClassification, GafError>> = pool.install(|| {
                batch
                    .par_iter()
                    .map(|(_, line)| AlignmentRecord::from_gaf(line).map(|record| self.classify(&record)))
                    .collect()
            });

            for ((line_number, _), outcome) in batch.iter().zip(outcomes) {
                run.stats.lines += 1;
                match outcome {
                    Ok(classification) => {
                        if let Some(writer) = trace.as_mut() {
                            write_trace_rows(writer, &classification)?;
                        }
                        run.record(&classification);
                    }
                    Err(e) => {
                        warn!("Skipping malformed alignment on line {line_number}: {e}");
                        run.record_malformed();
                    }
                }
            }
        }

        debug!(
            "Scanned {} lines: {} records, {} without sentinels",
            run.stats.lines, run.stats.records, run.stats.skipped_records
        );
        Ok(run)
    }
}
