use std::collections::{BTreeSet, HashMap};

use crate::core::types::{reverse_walk, NodeId, OrientedNode, SnarlId};

/// A leaf snarl: a snarl of the snarl tree without child snarls.
///
/// `start` is the start boundary in the orientation a traversal enters the snarl,
/// `end` is the end boundary in the orientation a traversal leaves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSnarl {
    pub id: SnarlId,
    pub start: OrientedNode,
    pub end: OrientedNode,
    /// Nodes strictly inside the snarl, boundaries excluded
    pub interior: BTreeSet<NodeId>,
}

impl LeafSnarl {
    pub fn new(
        id: SnarlId,
        start: OrientedNode,
        end: OrientedNode,
        interior: impl IntoIterator<Item = NodeId>,
    ) -> Self {
        let mut interior: BTreeSet<NodeId> = interior.into_iter().collect();
        interior.remove(&start.id);
        interior.remove(&end.id);
        Self {
            id,
            start,
            end,
            interior,
        }
    }

    /// A snarl with nothing between its boundaries never becomes an anchor
    pub fn is_degenerate(&self) -> bool {
        self.interior.is_empty()
    }

    /// Sentinel for entering the snarl through the start boundary
    pub fn entry_sentinel(&self) -> OrientedNode {
        self.start
    }

    /// Sentinel for entering the snarl backwards through the end boundary
    pub fn exit_sentinel(&self) -> OrientedNode {
        self.end.flip()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.interior.contains(&id)
    }

    /// The crossing of the snarl that starts at `walk[at]`, if any.
    ///
    /// A crossing enters through one boundary, stays inside the interior and
    /// leaves through the other boundary. Backward crossings are returned
    /// reversed, so the result always runs from `start` to `end`.
    pub fn crossing_at(&self, walk: &[OrientedNode], at: usize) -> Option<Vec<OrientedNode>> {
        let first = *walk.get(at)?;
        let (exit, backward) = if first == self.entry_sentinel() {
            (self.end, false)
        } else if first == self.exit_sentinel() {
            (self.start.flip(), true)
        } else {
            return None;
        };

        for (offset, node) in walk[at + 1..].iter().enumerate() {
            if *node == exit {
                let crossing = &walk[at..at + offset + 2];
                return Some(if backward {
                    reverse_walk(crossing)
                } else {
                    crossing.to_vec()
                });
            }
            if !self.contains(node.id) {
                return None;
            }
        }
        None
    }

    /// Every crossing of the snarl along `walk`, in walk order
    pub fn crossings<'a>(
        &'a self,
        walk: &'a [OrientedNode],
    ) -> impl Iterator<Item = Vec<OrientedNode>> + 'a {
        (0..walk.len()).filter_map(move |at| self.crossing_at(walk, at))
    }
}

/// Leaf snarls by the sentinels that start a crossing
#[derive(Debug, Default)]
pub struct SentinelIndex {
    leaves: HashMap<OrientedNode, Vec<usize>>,
}

impl SentinelIndex {
    /// Index `leaves` by entry and exit sentinel; values are positions in `leaves`
    pub fn new(leaves: &[LeafSnarl]) -> Self {
        let mut index: HashMap<OrientedNode, Vec<usize>> = HashMap::new();
        for (position, leaf) in leaves.iter().enumerate() {
            index.entry(leaf.entry_sentinel()).or_default().push(position);
            index.entry(leaf.exit_sentinel()).or_default().push(position);
        }
        Self { leaves: index }
    }

    pub fn leaves_at(&self, node: OrientedNode) -> &[usize] {
        self.leaves.get(&node).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_removed_from_interior() {
        let snarl = LeafSnarl::new(
            SnarlId(0),
            OrientedNode::forward(1),
            OrientedNode::forward(5),
            [1, 2, 3, 4, 5],
        );
        assert_eq!(snarl.interior.iter().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(!snarl.is_degenerate());
        assert_eq!(snarl.exit_sentinel(), OrientedNode::reverse(5));
    }

    #[test]
    fn test_degenerate_snarl() {
        let snarl = LeafSnarl::new(
            SnarlId(3),
            OrientedNode::forward(1),
            OrientedNode::forward(2),
            [1, 2],
        );
        assert!(snarl.is_degenerate());
    }

    #[test]
    fn test_crossings_in_both_directions() {
        let snarl = LeafSnarl::new(
            SnarlId(1),
            OrientedNode::forward(1),
            OrientedNode::forward(5),
            [2, 3, 4],
        );
        let forward = crate::test_support::fwd(&[10, 1, 2, 4, 5, 7]);
        assert_eq!(snarl.crossing_at(&forward, 1), Some(crate::test_support::fwd(&[1, 2, 4, 5])));
        assert_eq!(snarl.crossing_at(&forward, 0), None);

        let backward = reverse_walk(&forward);
        let crossings: Vec<_> = snarl.crossings(&backward).collect();
        assert_eq!(crossings, vec![crate::test_support::fwd(&[1, 2, 4, 5])]);

        // Leaves the interior before reaching the end boundary
        let detour = crate::test_support::fwd(&[1, 2, 8, 5]);
        assert_eq!(snarl.crossing_at(&detour, 0), None);
        // Runs off the end of the walk
        assert_eq!(snarl.crossing_at(&forward[..4], 1), None);
    }
}
