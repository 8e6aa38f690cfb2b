//! # graph-anchors
//!
//! A library for extracting snarl anchors from a pangenome variation graph and
//! matching read alignments against them.
//!
//! A leaf snarl (a bubble with no nested bubbles) becomes an anchor: one
//! canonical walk between its two boundary nodes. The boundaries act as
//! sentinels. Scanning a GAF alignment for sentinels finds every anchor the
//! read touches, and each touch is classified as a path match (the read
//! follows the canonical walk node for node) and, when the aligned bases over
//! the anchor carry no edits, a base-level match.
//!
//! ## Features
//!
//! - **Leaf snarl enumeration**: Iterative walk of the snarl tree
//! - **Canonical paths**: Taken from reference paths, read support, or a bounded search
//! - **Sentinel lookup**: O(1) boundary-node lookup while scanning alignments
//! - **Parallel matching**: Batches of alignment lines classified on a rayon pool
//! - **Persistence**: JSON or bincode dictionaries, with or without read counts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::io::BufReader;
//! use std::path::Path;
//!
//! use graph_anchors::parsing::gfa::parse_gfa_file;
//! use graph_anchors::parsing::snarls::parse_snarls_file;
//! use graph_anchors::{AlignmentMatcher, AnchorDictionaryBuilder};
//!
//! let snarls = parse_snarls_file(Path::new("graph.snarls.jsonl")).unwrap();
//! let graph = parse_gfa_file(Path::new("graph.gfa")).unwrap().with_snarls(snarls);
//!
//! let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();
//! println!("{} anchors", output.dictionary.len());
//!
//! let matcher = AlignmentMatcher::new(&output.dictionary, &graph);
//! let reader = BufReader::new(std::fs::File::open("reads.gaf").unwrap());
//! let run = matcher.run(reader, None).unwrap();
//! println!("ratio: {:?}", run.ratio());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Oriented nodes, anchors and leaf snarls
//! - [`graph`]: In-memory variation graph and snarl tree
//! - [`parsing`]: Parsers for GFA, snarl JSON lines, GAF and `cs` difference strings
//! - [`dictionary`]: Anchor dictionary construction, positions and persistence
//! - [`matching`]: Alignment classification and read/anchor association
//! - [`report`]: TSV, CSV and JSON output tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod dictionary;
pub mod graph;
pub mod matching;
pub mod parsing;
pub mod report;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types for convenience
pub use crate::core::anchor::Anchor;
pub use crate::core::types::*;
pub use dictionary::{AnchorDictionary, AnchorDictionaryBuilder};
pub use graph::{GraphIndex, VariationGraph};
pub use matching::{AlignmentMatcher, MatchRun};
