//! Matching of read alignments against an anchor dictionary.
//!
//! - [`AlignmentMatcher`]: classifies alignment records and runs over GAF streams
//! - [`MatchRun`]: associations, counters and scan statistics of one run or shard
//! - [`AnchorCounts`]: per-anchor read counts derived from a run
//!
//! ## Match criteria
//!
//! A record's path is scanned for sentinels. At each hit the following nodes
//! are compared with the anchor's canonical path, orientation included
//! (*path match*). A path match is also a *base-level match* when the
//! alignment covers the anchor interior and reports no edits inside it.
//!
//! The run reports `reads_matching_sequence / reads_matching_path`, which is
//! undefined when nothing matched by path.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use graph_anchors::dictionary::AnchorDictionary;
//! use graph_anchors::matching::{AlignmentMatcher, AnchorCounts};
//! use graph_anchors::parsing::gfa::parse_gfa_file;
//!
//! let graph = parse_gfa_file(&PathBuf::from("graph.gfa")).unwrap();
//! let loaded = AnchorDictionary::load(&PathBuf::from("out.anchors.json")).unwrap();
//!
//! let matcher = AlignmentMatcher::new(&loaded.dictionary, &graph);
//! let run = matcher.run_files(&[PathBuf::from("reads.gaf")], None).unwrap();
//! let counts = AnchorCounts::aggregate(&loaded.dictionary, &run.association);
//!
//! match run.ratio() {
//!     Some(ratio) => println!("ratio = {ratio:.2}"),
//!     None => println!("ratio = undefined"),
//! }
//! # let _ = counts;
//! ```

pub mod association;
pub mod counts;
pub mod engine;

pub use association::{MatchCounters, MatchRun, ReadAnchorAssociation, ScanStats};
pub use counts::{AnchorCounts, CountDictionary};
pub use engine::{
    AlignmentMatcher, MatchError, MatchingConfig, OccurrenceOutcome, RecordClassification,
    RecordStatus,
};
