use crate::core::types::{OrientedNode, SnarlId};
use crate::graph::GraphError;

/// One snarl of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnarlRecord {
    pub start: OrientedNode,
    pub end: OrientedNode,
    pub parent: Option<SnarlId>,
    pub children: Vec<SnarlId>,
}

/// Nesting structure of the snarls in a graph.
///
/// Snarl ids are load order. Parent links are not checked for cycles here;
/// a corrupted tree surfaces as `GraphError::SnarlTreeCycle` when it is walked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnarlTree {
    records: Vec<SnarlRecord>,
    roots: Vec<SnarlId>,
}

impl SnarlTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from boundaries and parent links given in load order
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownSnarl` if a parent link points outside the tree.
    pub fn from_links(
        boundaries: Vec<(OrientedNode, OrientedNode)>,
        parents: Vec<Option<SnarlId>>,
    ) -> Result<Self, GraphError> {
        let count = boundaries.len();
        let mut records: Vec<SnarlRecord> = boundaries
            .into_iter()
            .map(|(start, end)| SnarlRecord {
                start,
                end,
                parent: None,
                children: Vec::new(),
            })
            .collect();

        // Snarls without a parent entry are roots
        let mut roots = Vec::new();
        for index in 0..count {
            let id = to_snarl_id(index);
            match parents.get(index).copied().flatten() {
                Some(parent) => {
                    if parent.index() >= count {
                        return Err(GraphError::UnknownSnarl(parent));
                    }
                    records[index].parent = Some(parent);
                    records[parent.index()].children.push(id);
                }
                None => roots.push(id),
            }
        }

        Ok(Self { records, roots })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn roots(&self) -> &[SnarlId] {
        &self.roots
    }

    /// # Errors
    ///
    /// Returns `GraphError::UnknownSnarl` if `id` is not in the tree.
    pub fn get(&self, id: SnarlId) -> Result<&SnarlRecord, GraphError> {
        self.records
            .get(id.index())
            .ok_or(GraphError::UnknownSnarl(id))
    }

    pub fn records(&self) -> &[SnarlRecord] {
        &self.records
    }
}

#[allow(clippy::cast_possible_truncation)] // Snarl counts fit in u32
fn to_snarl_id(index: usize) -> SnarlId {
    SnarlId(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundary(a: u64, b: u64) -> (OrientedNode, OrientedNode) {
        (OrientedNode::forward(a), OrientedNode::forward(b))
    }

    #[test]
    fn test_from_links_builds_children_and_roots() {
        let tree = SnarlTree::from_links(
            vec![boundary(10, 11), boundary(1, 5), boundary(5, 9)],
            vec![None, Some(SnarlId(0)), Some(SnarlId(0))],
        )
        .unwrap();

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots(), &[SnarlId(0)]);
        assert_eq!(tree.get(SnarlId(0)).unwrap().children, vec![SnarlId(1), SnarlId(2)]);
        assert_eq!(tree.get(SnarlId(2)).unwrap().parent, Some(SnarlId(0)));
    }

    #[test]
    fn test_missing_parent_entries_are_roots() {
        let tree = SnarlTree::from_links(vec![boundary(1, 2), boundary(3, 4)], vec![None]).unwrap();
        assert_eq!(tree.roots(), &[SnarlId(0), SnarlId(1)]);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let result = SnarlTree::from_links(vec![boundary(1, 2)], vec![Some(SnarlId(7))]);
        assert!(matches!(result, Err(GraphError::UnknownSnarl(SnarlId(7)))));
    }

    #[test]
    fn test_unknown_snarl_lookup() {
        let tree = SnarlTree::new();
        assert!(tree.is_empty());
        assert!(tree.get(SnarlId(0)).is_err());
    }
}
