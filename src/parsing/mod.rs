//! Parsers for the graph, snarl and alignment inputs.
//!
//! - **GFA** ([`gfa`]): segments, links, paths and walks into a [`VariationGraph`]
//! - **Snarls** ([`snarls`]): JSON Lines snarl decomposition into a [`SnarlTree`]
//! - **GAF** ([`gaf`]): one alignment line into an [`AlignmentRecord`]
//! - **Difference strings** ([`difference`]): `cs:Z:` tags attached to GAF lines
//!
//! All loaders accept gzip-compressed files.
//!
//! ## Example
//!
//! ```rust,no_run
//! use graph_anchors::parsing::{gaf::parse_gaf_line, gfa::parse_gfa_file, snarls::parse_snarls_file};
//! use std::path::Path;
//!
//! let tree = parse_snarls_file(Path::new("graph.snarls.jsonl")).unwrap();
//! let graph = parse_gfa_file(Path::new("graph.gfa")).unwrap().with_snarls(tree);
//!
//! let record = parse_gaf_line("read1\t10\t0\t10\t+\t>1>2\t10\t0\t10\t10\t10\t60");
//! assert!(record.is_some());
//! ```
//!
//! [`VariationGraph`]: crate::graph::VariationGraph
//! [`SnarlTree`]: crate::graph::SnarlTree
//! [`AlignmentRecord`]: gaf::AlignmentRecord

pub mod difference;
pub mod gaf;
pub mod gfa;
pub mod snarls;
