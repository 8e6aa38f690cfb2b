//! Read-association exports: the two `(anchor_id, read_id)` tables and the
//! JSON list of anchors with base-level matched reads.

use std::collections::{BTreeMap, BTreeSet};
use std::io::{self, Write};

use serde::Serialize;

use crate::core::types::{AnchorId, GenomicCoord, SnarlId};
use crate::dictionary::store::AnchorDictionary;
use crate::matching::association::ReadAnchorAssociation;

pub const ASSOCIATION_HEADER: &str = "anchor_id\tread_id";

/// Write one `anchor_id, read_id` row per association, sorted by anchor then read
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_association_tsv<W: Write>(
    writer: &mut W,
    matches: &BTreeMap<AnchorId, BTreeSet<String>>,
) -> io::Result<()> {
    writeln!(writer, "{ASSOCIATION_HEADER}")?;
    for (anchor, reads) in matches {
        for read in reads {
            writeln!(writer, "{anchor}\t{read}")?;
        }
    }
    Ok(())
}

/// An anchor together with the reads that match it base for base
#[derive(Debug, Serialize)]
pub struct AnchorWithReads<'a> {
    pub anchor_id: AnchorId,
    pub snarl: SnarlId,
    pub path: String,
    pub length_bp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<&'a GenomicCoord>,
    pub reads: &'a BTreeSet<String>,
}

/// Anchors with at least one base-level matched read
pub fn anchors_with_reads<'a>(
    dictionary: &'a AnchorDictionary,
    association: &'a ReadAnchorAssociation,
) -> Vec<AnchorWithReads<'a>> {
    association
        .bp_matches()
        .iter()
        .filter(|(_, reads)| !reads.is_empty())
        .filter_map(|(id, reads)| {
            let anchor = dictionary.get(*id)?;
            Some(AnchorWithReads {
                anchor_id: anchor.id,
                snarl: anchor.snarl,
                path: anchor.walk_string(),
                length_bp: anchor.length_bp,
                position: anchor.position.as_ref(),
                reads,
            })
        })
        .collect()
}

/// Write [`anchors_with_reads`] as pretty JSON
///
/// # Errors
///
/// Returns a JSON error (wrapping any IO error) if writing fails.
pub fn write_anchors_with_reads<W: Write>(
    writer: &mut W,
    dictionary: &AnchorDictionary,
    association: &ReadAnchorAssociation,
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &anchors_with_reads(dictionary, association))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::anchor::Anchor;
    use crate::test_support::fwd;

    #[test]
    fn test_association_tables() {
        let mut association = ReadAnchorAssociation::new();
        association.record_path_match(AnchorId(1), "r2");
        association.record_bp_match(AnchorId(0), "r1");
        association.record_path_match(AnchorId(0), "r0");

        let mut out = Vec::new();
        write_association_tsv(&mut out, association.path_matches()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "anchor_id\tread_id\n0\tr0\n0\tr1\n1\tr2\n"
        );

        let mut out = Vec::new();
        write_association_tsv(&mut out, association.bp_matches()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "anchor_id\tread_id\n0\tr1\n");
    }

    #[test]
    fn test_anchors_with_reads_json() {
        let mut dictionary = AnchorDictionary::new();
        dictionary
            .insert(Anchor::new(AnchorId(0), SnarlId(1), fwd(&[1, 2, 5]), 1))
            .unwrap();
        dictionary
            .insert(Anchor::new(AnchorId(1), SnarlId(2), fwd(&[5, 7, 9]), 1))
            .unwrap();
        let mut association = ReadAnchorAssociation::new();
        association.record_bp_match(AnchorId(1), "r1");
        association.record_path_match(AnchorId(0), "r2");

        let mut out = Vec::new();
        write_anchors_with_reads(&mut out, &dictionary, &association).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let anchors = json.as_array().unwrap();
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0]["anchor_id"], 1);
        assert_eq!(anchors[0]["path"], ">5>7>9");
        assert_eq!(anchors[0]["reads"], serde_json::json!(["r1"]));
        assert!(anchors[0].get("position").is_none());
    }
}
