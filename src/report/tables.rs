//! Flat diagnostic tables for inspection and plotting.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::core::snarl::LeafSnarl;
use crate::core::types::NodeId;
use crate::dictionary::store::AnchorDictionary;
use crate::matching::counts::AnchorCounts;

/// Bandage colour for anchor boundary nodes
pub const SENTINEL_COLOUR: &str = "#E41A1C";

/// Bandage colour for anchor interior nodes
pub const INTERIOR_COLOUR: &str = "#377EB8";

/// `anchor_id, snarl_id, nodes, length_bp` for every anchor
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_sizes<W: Write>(writer: &mut W, dictionary: &AnchorDictionary) -> io::Result<()> {
    writeln!(writer, "anchor_id\tsnarl_id\tnodes\tlength_bp")?;
    for anchor in dictionary.anchors() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            anchor.id,
            anchor.snarl,
            anchor.len(),
            anchor.length_bp
        )?;
    }
    Ok(())
}

/// Node colours for Bandage's "Load CSV data" (`Name,Colour`)
///
/// A node that bounds one anchor and lies inside another is coloured as a
/// boundary.
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_bandage_colours<W: Write>(
    writer: &mut W,
    dictionary: &AnchorDictionary,
) -> io::Result<()> {
    let mut colours: BTreeMap<NodeId, &str> = BTreeMap::new();
    for anchor in dictionary.anchors() {
        for node in anchor.interior() {
            colours.entry(node.id).or_insert(INTERIOR_COLOUR);
        }
    }
    for anchor in dictionary.anchors() {
        colours.insert(anchor.entry_sentinel().id, SENTINEL_COLOUR);
        colours.insert(anchor.exit_sentinel().id, SENTINEL_COLOUR);
    }

    writeln!(writer, "Name,Colour")?;
    for (node, colour) in colours {
        writeln!(writer, "{node},{colour}")?;
    }
    Ok(())
}

/// Every leaf snarl: `snarl_id, start, end, degenerate, interior`
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_leaf_snarls<W: Write>(writer: &mut W, leaf_snarls: &[LeafSnarl]) -> io::Result<()> {
    writeln!(writer, "snarl_id\tstart\tend\tdegenerate\tinterior")?;
    for leaf in leaf_snarls {
        let interior: Vec<String> = leaf.interior.iter().map(ToString::to_string).collect();
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            leaf.id,
            leaf.start,
            leaf.end,
            leaf.is_degenerate(),
            interior.join(",")
        )?;
    }
    Ok(())
}

/// `anchor_id, path, position, length_bp, path_reads, bp_reads`; an anchor
/// without a position gets `.` in the `path` and `position` columns
///
/// # Errors
///
/// Returns an IO error if the writer fails.
pub fn write_counts<W: Write>(
    writer: &mut W,
    dictionary: &AnchorDictionary,
    counts: &AnchorCounts,
) -> io::Result<()> {
    writeln!(writer, "anchor_id\tpath\tposition\tlength_bp\tpath_reads\tbp_reads")?;
    for anchor in dictionary.anchors() {
        let (path, position) = match &anchor.position {
            Some(coord) => (coord.path.as_str(), coord.offset.to_string()),
            None => (".", ".".to_string()),
        };
        writeln!(
            writer,
            "{}\t{path}\t{position}\t{}\t{}\t{}",
            anchor.id,
            anchor.length_bp,
            counts.path.get(anchor.id),
            counts.bp.get(anchor.id)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AnchorId, GenomicCoord};
    use crate::dictionary::builder::AnchorDictionaryBuilder;
    use crate::test_support::nested_graph;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_build_tables() {
        let graph = nested_graph();
        let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();

        let sizes = render(|w| write_sizes(w, &output.dictionary));
        assert_eq!(sizes, "anchor_id\tsnarl_id\tnodes\tlength_bp\n0\t1\t5\t4\n1\t2\t3\t1\n");

        let colours = render(|w| write_bandage_colours(w, &output.dictionary));
        let rows: Vec<&str> = colours.lines().collect();
        assert_eq!(rows[0], "Name,Colour");
        assert_eq!(rows[1], format!("1,{SENTINEL_COLOUR}"));
        assert_eq!(rows[2], format!("2,{INTERIOR_COLOUR}"));
        assert!(rows.contains(&format!("5,{SENTINEL_COLOUR}").as_str()));
        assert_eq!(rows.len(), 8);

        let snarls = render(|w| write_leaf_snarls(w, &output.leaf_snarls));
        assert_eq!(
            snarls.lines().collect::<Vec<_>>(),
            vec![
                "snarl_id\tstart\tend\tdegenerate\tinterior",
                "1\t>1\t>5\tfalse\t2,3,4",
                "2\t>5\t>9\tfalse\t7,8",
                "3\t>9\t>11\ttrue\t",
            ]
        );
    }

    #[test]
    fn test_counts_table() {
        let graph = nested_graph();
        let dictionary = AnchorDictionaryBuilder::new(&graph)
            .build()
            .unwrap()
            .dictionary
            .with_positions(vec![
                Some(GenomicCoord {
                    path: "ref".to_string(),
                    offset: 2,
                }),
                None,
            ]);
        let mut counts = AnchorCounts::zeroed(&dictionary);
        counts.path.set(AnchorId(0), 3);
        counts.bp.set(AnchorId(0), 1);

        let table = render(|w| write_counts(w, &dictionary, &counts));
        assert_eq!(
            table.lines().collect::<Vec<_>>(),
            vec![
                "anchor_id\tpath\tposition\tlength_bp\tpath_reads\tbp_reads",
                "0\tref\t2\t4\t3\t1",
                "1\t.\t.\t1\t0\t0",
            ]
        );
    }
}
