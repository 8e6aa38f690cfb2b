//! Output tables and JSON documents written by the command-line tool.
//!
//! Every writer takes any `std::io::Write`; the CLI points them at files
//! named after an output prefix (see [`crate::utils::io::with_suffix`]).
//!
//! | Output | Writer |
//! |---|---|
//! | `P.sizes.tsv` | [`tables::write_sizes`] |
//! | `P.bandage.csv` | [`tables::write_bandage_colours`] |
//! | `P.snarls.tsv` | [`tables::write_leaf_snarls`] |
//! | `P.counts.tsv` | [`tables::write_counts`] |
//! | `P.reads_with_anchors.tsv`, `P.bpmatched_reads_with_anchors.tsv` | [`association::write_association_tsv`] |
//! | `P.anchors_with_reads.json` | [`association::write_anchors_with_reads`] |
//! | `P.trace.tsv` | [`trace::write_trace_rows`] |
//! | `P.selected.fastq` | [`selection::select_records`] |

pub mod association;
pub mod selection;
pub mod tables;
pub mod trace;
