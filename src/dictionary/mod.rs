//! Anchor dictionary construction and storage.
//!
//! Building a dictionary is a pipeline of snapshots:
//!
//! 1. [`SnarlEnumerator`] walks the snarl tree and yields leaf snarls
//! 2. [`AnchorDictionaryBuilder`] picks a canonical path per leaf snarl and
//!    indexes the resulting anchors by sentinel
//! 3. [`PositionAnnotator`] returns a copy with reference positions attached
//! 4. [`AnchorDictionary::save`] writes it as JSON or bincode
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use graph_anchors::dictionary::{AnchorDictionaryBuilder, PositionAnnotator};
//! use graph_anchors::parsing::{gfa::parse_gfa_file, snarls::parse_snarls_file};
//!
//! let snarls = parse_snarls_file(Path::new("graph.snarls.jsonl")).unwrap();
//! let graph = parse_gfa_file(Path::new("graph.gfa")).unwrap().with_snarls(snarls);
//!
//! let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();
//! let dictionary = PositionAnnotator::new(&graph).annotate(&output.dictionary).unwrap();
//! dictionary.save(Path::new("out.anchors.json"), None).unwrap();
//! ```

pub mod builder;
pub mod enumerator;
pub mod position;
pub mod store;
pub mod votes;

pub use builder::{AnchorDictionaryBuilder, BuildConfig, BuildOutput, BuildStats};
pub use enumerator::{EnumerationStats, SnarlEnumerator};
pub use position::PositionAnnotator;
pub use store::{AnchorDictionary, DictionaryError, LoadedDictionary, SentinelHit};
pub use votes::ReadPathVotes;
