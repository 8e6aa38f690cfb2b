use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::core::types::{NodeId, OrientedNode, SnarlId};
use crate::graph::snarl_tree::SnarlTree;
use crate::graph::{GraphError, GraphIndex};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node {
    length: usize,
    sequence: Option<Vec<u8>>,
}

/// In-memory bidirected variation graph with its snarl tree
#[derive(Debug, Clone, Default)]
pub struct VariationGraph {
    nodes: BTreeMap<NodeId, Node>,

    /// Adjacency over oriented nodes; kept sorted and deduplicated
    edges: HashMap<OrientedNode, Vec<OrientedNode>>,

    /// Named paths in load order
    paths: Vec<(String, Vec<OrientedNode>)>,

    /// Index: path name -> position in `paths`
    path_index: HashMap<String, usize>,

    snarls: SnarlTree,
}

impl VariationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with its forward-strand sequence
    pub fn add_node(&mut self, id: NodeId, sequence: &[u8]) {
        self.nodes.insert(
            id,
            Node {
                length: sequence.len(),
                sequence: Some(sequence.to_vec()),
            },
        );
    }

    /// Add a node known only by its length
    pub fn add_node_with_length(&mut self, id: NodeId, length: usize) {
        self.nodes.insert(
            id,
            Node {
                length,
                sequence: None,
            },
        );
    }

    /// Add a bidirected edge; `from -> to` also implies `to' -> from'`
    pub fn add_edge(&mut self, from: OrientedNode, to: OrientedNode) {
        Self::insert_sorted(self.edges.entry(from).or_default(), to);
        Self::insert_sorted(self.edges.entry(to.flip()).or_default(), from.flip());
    }

    fn insert_sorted(targets: &mut Vec<OrientedNode>, node: OrientedNode) {
        if let Err(pos) = targets.binary_search(&node) {
            targets.insert(pos, node);
        }
    }

    /// Add a named path; a later path with the same name replaces the earlier one
    pub fn add_path(&mut self, name: impl Into<String>, walk: Vec<OrientedNode>) {
        let name = name.into();
        if let Some(&index) = self.path_index.get(&name) {
            self.paths[index].1 = walk;
        } else {
            self.path_index.insert(name.clone(), self.paths.len());
            self.paths.push((name, walk));
        }
    }

    /// Drop every stored path
    pub fn clear_paths(&mut self) {
        self.paths.clear();
        self.path_index.clear();
    }

    #[must_use]
    pub fn with_snarls(mut self, snarls: SnarlTree) -> Self {
        self.snarls = snarls;
        self
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of distinct bidirected edges
    pub fn edge_count(&self) -> usize {
        // Every edge is stored once per direction, except self-reverse edges
        let directed: usize = self.edges.values().map(Vec::len).sum();
        let self_reverse = self
            .edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| *to == from.flip())
            .count();
        (directed + self_reverse) / 2
    }

    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    pub fn snarl_tree(&self) -> &SnarlTree {
        &self.snarls
    }
}

impl GraphIndex for VariationGraph {
    fn node_length(&self, id: NodeId) -> Option<usize> {
        self.nodes.get(&id).map(|node| node.length)
    }

    fn node_sequence(&self, id: NodeId) -> Option<&[u8]> {
        self.nodes.get(&id).and_then(|node| node.sequence.as_deref())
    }

    fn successors(&self, node: OrientedNode) -> &[OrientedNode] {
        self.edges.get(&node).map_or(&[], Vec::as_slice)
    }

    fn path_names(&self) -> Vec<&str> {
        self.paths.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn path(&self, name: &str) -> Option<&[OrientedNode]> {
        self.path_index
            .get(name)
            .map(|&index| self.paths[index].1.as_slice())
    }

    fn snarl_count(&self) -> usize {
        self.snarls.len()
    }

    fn snarl_roots(&self) -> &[SnarlId] {
        self.snarls.roots()
    }

    fn snarl_children(&self, id: SnarlId) -> Result<&[SnarlId], GraphError> {
        self.snarls.get(id).map(|record| record.children.as_slice())
    }

    fn snarl_boundaries(&self, id: SnarlId) -> Result<(OrientedNode, OrientedNode), GraphError> {
        self.snarls.get(id).map(|record| (record.start, record.end))
    }

    /// Breadth-first walk from the start boundary that never steps onto a boundary node
    fn snarl_interior(&self, id: SnarlId) -> Result<BTreeSet<NodeId>, GraphError> {
        let record = self.snarls.get(id)?;
        for boundary in [record.start.id, record.end.id] {
            if !self.has_node(boundary) {
                return Err(GraphError::UnknownNode(boundary));
            }
        }

        let is_boundary = |node: &OrientedNode| node.id == record.start.id || node.id == record.end.id;
        let mut seen: BTreeSet<OrientedNode> = BTreeSet::new();
        let mut queue: VecDeque<OrientedNode> = self
            .successors(record.start)
            .iter()
            .copied()
            .filter(|node| !is_boundary(node))
            .collect();

        while let Some(node) = queue.pop_front() {
            if !seen.insert(node) {
                continue;
            }
            for next in self.successors(node) {
                if !is_boundary(next) && !seen.contains(next) {
                    queue.push_back(*next);
                }
            }
        }

        Ok(seen.into_iter().map(|node| node.id).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::nested_graph;

    #[test]
    fn test_bidirected_edges() {
        let mut graph = VariationGraph::new();
        graph.add_node(1, b"A");
        graph.add_node(2, b"C");
        graph.add_edge(OrientedNode::forward(1), OrientedNode::reverse(2));

        assert_eq!(graph.successors(OrientedNode::forward(1)), &[OrientedNode::reverse(2)]);
        assert_eq!(graph.successors(OrientedNode::forward(2)), &[OrientedNode::reverse(1)]);
        assert!(graph.successors(OrientedNode::reverse(1)).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_successors_sorted_and_deduplicated() {
        let mut graph = VariationGraph::new();
        graph.add_edge(OrientedNode::forward(1), OrientedNode::forward(9));
        graph.add_edge(OrientedNode::forward(1), OrientedNode::forward(3));
        graph.add_edge(OrientedNode::forward(1), OrientedNode::forward(9));
        assert_eq!(
            graph.successors(OrientedNode::forward(1)),
            &[OrientedNode::forward(3), OrientedNode::forward(9)]
        );
    }

    #[test]
    fn test_paths_keep_load_order() {
        let mut graph = VariationGraph::new();
        graph.add_path("b", vec![OrientedNode::forward(1)]);
        graph.add_path("a", vec![OrientedNode::forward(2)]);
        assert_eq!(graph.path_names(), vec!["b", "a"]);
        assert_eq!(graph.path("a"), Some(&[OrientedNode::forward(2)][..]));
        assert!(graph.path("c").is_none());
    }

    #[test]
    fn test_snarl_interior_excludes_boundaries() {
        let graph = nested_graph();
        let interior = graph.snarl_interior(SnarlId(1)).unwrap();
        assert_eq!(interior.into_iter().collect::<Vec<_>>(), vec![2, 3, 4]);

        let outer = graph.snarl_interior(SnarlId(0)).unwrap();
        assert_eq!(outer.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn test_snarl_interior_unknown_snarl() {
        let graph = nested_graph();
        assert!(matches!(
            graph.snarl_interior(SnarlId(99)),
            Err(GraphError::UnknownSnarl(SnarlId(99)))
        ));
    }
}
