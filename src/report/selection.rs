//! Read selection: copy the FASTQ records of reads that support an anchor.
//!
//! The supporting reads come from `P.anchors_with_reads.json`; FASTQ records
//! are matched on their name (the text before the first space of the `@`
//! line).

use std::collections::HashSet;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use noodles::fastq;
use serde::Deserialize;
use thiserror::Error;

use crate::utils::io::open_input;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid anchors JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse FASTQ record {record}: {source}")]
    Fastq { record: u64, source: std::io::Error },
}

#[derive(Deserialize)]
struct SupportedAnchor {
    reads: Vec<String>,
}

/// Names of every read listed in an anchors-with-reads document
///
/// # Errors
///
/// Returns `SelectionError::Json` if the document is not a list of anchors
/// with `reads`.
pub fn read_supporting_names<R: Read>(reader: R) -> Result<HashSet<String>, SelectionError> {
    let anchors: Vec<SupportedAnchor> = serde_json::from_reader(reader)?;
    Ok(anchors.into_iter().flat_map(|anchor| anchor.reads).collect())
}

/// Load [`read_supporting_names`] from a file (optionally gzipped)
///
/// # Errors
///
/// See [`read_supporting_names`]; also `SelectionError::Io` if the file
/// cannot be opened.
pub fn load_supporting_names(path: &Path) -> Result<HashSet<String>, SelectionError> {
    read_supporting_names(open_input(path)?)
}

/// Totals for one selection pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub records: u64,
    pub selected: u64,
}

impl SelectionStats {
    pub fn merge(&mut self, other: Self) {
        self.records += other.records;
        self.selected += other.selected;
    }
}

/// Copy the records of `reader` whose name is in `names` to `writer`
///
/// `found` collects the names seen so far, so supporting reads missing from
/// every input can be reported afterwards.
///
/// # Errors
///
/// Returns `SelectionError::Fastq` for a malformed record and
/// `SelectionError::Io` if writing fails.
pub fn select_records<R: BufRead, W: Write>(
    reader: &mut fastq::io::Reader<R>,
    writer: &mut fastq::io::Writer<W>,
    names: &HashSet<String>,
    found: &mut HashSet<String>,
) -> Result<SelectionStats, SelectionError> {
    let mut stats = SelectionStats::default();

    for result in reader.records() {
        let record = result.map_err(|source| SelectionError::Fastq {
            record: stats.records + 1,
            source,
        })?;
        stats.records += 1;

        let name: &[u8] = record.name().as_ref();
        let Ok(name) = std::str::from_utf8(name) else {
            continue;
        };
        if names.contains(name) {
            writer.write_record(&record)?;
            found.insert(name.to_string());
            stats.selected += 1;
        }
    }

    Ok(stats)
}

/// Open a FASTQ input (optionally gzipped)
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened.
pub fn open_fastq(path: &Path) -> io::Result<fastq::io::Reader<Box<dyn BufRead + Send>>> {
    Ok(fastq::io::Reader::new(open_input(path)?))
}
