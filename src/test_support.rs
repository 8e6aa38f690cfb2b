//! Shared fixtures for unit tests.
//!
//! `nested_graph` is a small chain of bubbles inside one top-level snarl:
//!
//! ```text
//!             +--- 3 ---+            +- 7 -+
//! 10 -> 1 -> 2 -------> 4 -> 5 ---->|     |--> 9 -> 11
//!                                    +- 8 -+
//! ```
//!
//! Snarl 0 is (10, 11) with children 1 = (1, 5), 2 = (5, 9) and 3 = (9, 11);
//! snarl 3 has no interior. Path `ref` visits 10 1 2 3 4 5 7 9 11 and path
//! `alt` visits 10 1 2 4 5 8 9 11.

use crate::core::types::{OrientedNode, SnarlId};
use crate::graph::{SnarlTree, VariationGraph};

pub(crate) fn fwd(ids: &[u64]) -> Vec<OrientedNode> {
    ids.iter().map(|&id| OrientedNode::forward(id)).collect()
}

pub(crate) fn nested_graph() -> VariationGraph {
    let mut graph = VariationGraph::new();
    for (id, sequence) in [
        (10, "AC"),
        (1, "GATTACA"),
        (2, "C"),
        (3, "GG"),
        (4, "T"),
        (5, "TTAGC"),
        (7, "A"),
        (8, "G"),
        (9, "CAT"),
        (11, "TG"),
    ] {
        graph.add_node(id, sequence.as_bytes());
    }
    for (from, to) in [
        (10, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (2, 4),
        (4, 5),
        (5, 7),
        (5, 8),
        (7, 9),
        (8, 9),
        (9, 11),
    ] {
        graph.add_edge(OrientedNode::forward(from), OrientedNode::forward(to));
    }
    graph.add_path("ref", fwd(&[10, 1, 2, 3, 4, 5, 7, 9, 11]));
    graph.add_path("alt", fwd(&[10, 1, 2, 4, 5, 8, 9, 11]));

    let boundaries = vec![
        (OrientedNode::forward(10), OrientedNode::forward(11)),
        (OrientedNode::forward(1), OrientedNode::forward(5)),
        (OrientedNode::forward(5), OrientedNode::forward(9)),
        (OrientedNode::forward(9), OrientedNode::forward(11)),
    ];
    let parents = vec![None, Some(SnarlId(0)), Some(SnarlId(0)), Some(SnarlId(0))];
    let tree = SnarlTree::from_links(boundaries, parents).expect("valid fixture tree");
    graph.with_snarls(tree)
}

/// A GAF line with the 12 mandatory fields and an optional `cs` tag
pub(crate) fn gaf_line(read: &str, path: &str, path_len: usize, cs: Option<&str>) -> String {
    let mut line = format!(
        "{read}\t{path_len}\t0\t{path_len}\t+\t{path}\t{path_len}\t0\t{path_len}\t{path_len}\t{path_len}\t60"
    );
    if let Some(cs) = cs {
        line.push_str("\tcs:Z:");
        line.push_str(cs);
    }
    line
}
