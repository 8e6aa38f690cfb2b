use std::io::{self, Write};

use crate::matching::engine::RecordClassification;

pub const TRACE_HEADER: &str = "read_id\tanchor_id\tis_matching_nodes\tis_baselevel_aligned";

pub fn write_trace_header<W: Write + ?Sized>(writer: &mut W) -> io::Result<()> {
    writeln!(writer, "{TRACE_HEADER}")
}

/// One row per sentinel occurrence of a classified record
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_trace_rows<W: Write + ?Sized>(
    writer: &mut W,
    classification: &RecordClassification,
) -> io::Result<()> {
    for occurrence in &classification.occurrences {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            classification.read_id, occurrence.anchor, occurrence.path_match, occurrence.bp_match
        )?;
    }
    Ok(())
}
