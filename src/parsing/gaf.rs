//! Parser for GAF alignment lines.
//!
//! Only the 12 mandatory columns and the `cs:Z:` difference string are
//! interpreted; every other optional tag is ignored. A line that cannot be
//! parsed is reported as an error (or `None` via [`parse_gaf_line`]) so the
//! caller can skip it and keep scanning.

use std::ops::Range;

use thiserror::Error;

use crate::core::types::{parse_walk, Orientation, OrientedNode};
use crate::parsing::difference::Difference;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GafError {
    #[error("GAF line with fewer than {expected} fields ({found})")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("Alignment has no target path")]
    MissingPath,

    #[error("Invalid difference string: {0}")]
    InvalidDifference(String),
}

/// One alignment of a read to a walk in the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Read (query sequence) name
    pub read_id: String,
    /// Read length
    pub read_length: usize,
    /// Aligned interval of the read
    pub read_interval: Range<usize>,
    /// Strand of the read relative to the target walk
    pub strand: Orientation,
    /// Walk through the graph, in target orientation
    pub traversed_path: Vec<OrientedNode>,
    /// Total sequence length of the walk
    pub path_length: usize,
    /// Aligned interval of the walk
    pub path_interval: Range<usize>,
    /// Number of matching bases
    pub matches: usize,
    /// Alignment block length (matches, mismatches and gaps)
    pub block_length: usize,
    /// Mapping quality; `None` when reported as 255
    pub mapq: Option<u8>,
    /// Decoded `cs:Z:` difference string, if present
    pub difference: Option<Vec<Difference>>,
}

impl AlignmentRecord {
    const MANDATORY_FIELDS: usize = 12;
    const MISSING_MAPQ: u8 = 255;
    const MISSING_VALUE: &'static str = "*";
    const DIFFERENCE_TAG: &'static str = "cs:Z:";

    fn parse_usize(field: &str, name: &'static str) -> Result<usize, GafError> {
        field.parse().map_err(|_| GafError::InvalidField {
            field: name,
            value: field.to_string(),
        })
    }

    fn parse_strand(field: &str) -> Result<Orientation, GafError> {
        Orientation::from_strand(field).ok_or_else(|| GafError::InvalidField {
            field: "strand",
            value: field.to_string(),
        })
    }

    /// Parse a `>1<2>3` walk; stable `name:start-end` path names are not supported
    fn parse_path(field: &str) -> Result<Vec<OrientedNode>, GafError> {
        if field == Self::MISSING_VALUE || field.is_empty() {
            return Err(GafError::MissingPath);
        }
        parse_walk(field).map_err(|_| GafError::InvalidField {
            field: "path",
            value: field.to_string(),
        })
    }

    /// Parse one GAF line. A trailing newline is ignored.
    ///
    /// # Errors
    ///
    /// Returns `GafError` describing the first field that could not be parsed.
    pub fn from_gaf(line: &str) -> Result<Self, GafError> {
        let line = line.trim_end_matches(['\n', '\r']);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < Self::MANDATORY_FIELDS {
            return Err(GafError::TooFewFields {
                expected: Self::MANDATORY_FIELDS,
                found: fields.len(),
            });
        }

        let read_id = fields[0].to_string();
        if read_id.is_empty() {
            return Err(GafError::InvalidField {
                field: "read name",
                value: String::new(),
            });
        }
        let read_length = Self::parse_usize(fields[1], "read length")?;
        let read_interval =
            Self::parse_usize(fields[2], "read start")?..Self::parse_usize(fields[3], "read end")?;
        let strand = Self::parse_strand(fields[4])?;
        let traversed_path = Self::parse_path(fields[5])?;
        let path_length = Self::parse_usize(fields[6], "path length")?;
        let path_interval =
            Self::parse_usize(fields[7], "path start")?..Self::parse_usize(fields[8], "path end")?;
        let matches = Self::parse_usize(fields[9], "matches")?;
        let block_length = Self::parse_usize(fields[10], "block length")?;
        let mapq = u8::try_from(Self::parse_usize(fields[11], "mapping quality")?)
            .ok()
            .filter(|&quality| quality != Self::MISSING_MAPQ);

        let mut difference = None;
        for tag in &fields[Self::MANDATORY_FIELDS..] {
            if let Some(value) = tag.strip_prefix(Self::DIFFERENCE_TAG) {
                difference = Some(Difference::parse(value).map_err(GafError::InvalidDifference)?);
            }
        }

        if let Some(operations) = &difference {
            let aligned = path_interval.len();
            match Difference::target_length(operations) {
                Some(covered) if covered == aligned => {}
                Some(covered) => {
                    return Err(GafError::InvalidDifference(format!(
                        "covers {covered} target bases, alignment covers {aligned}"
                    )))
                }
                None => {
                    return Err(GafError::InvalidDifference(
                        "target length overflows".to_string(),
                    ))
                }
            }
        }

        Ok(Self {
            read_id,
            read_length,
            read_interval,
            strand,
            traversed_path,
            path_length,
            path_interval,
            matches,
            block_length,
            mapq,
            difference,
        })
    }

    /// Mismatches and gap bases reported for the alignment
    pub fn edits(&self) -> usize {
        self.block_length.saturating_sub(self.matches)
    }

}

/// Parse one GAF line, reporting a malformed line as `None`
pub fn parse_gaf_line(line: &str) -> Option<AlignmentRecord> {
    AlignmentRecord::from_gaf(line).ok()
}
