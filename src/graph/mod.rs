//! Graph and snarl-index access.
//!
//! Everything downstream talks to the graph through [`GraphIndex`]: node
//! lengths and sequences, bidirected adjacency, named paths, and a snarl tree
//! with boundary and interior resolution per snarl.
//!
//! [`VariationGraph`] is the in-memory implementation. It is filled from a GFA
//! file (see [`crate::parsing::gfa`]) and a snarl file (see
//! [`crate::parsing::snarls`]).

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::types::{NodeId, OrientedNode, SnarlId};

pub mod memory;
pub mod snarl_tree;

pub use memory::VariationGraph;
pub use snarl_tree::SnarlTree;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid GFA on line {line}: {message}")]
    InvalidGfa { line: usize, message: String },

    #[error("Invalid snarl record on line {line}: {message}")]
    InvalidSnarl { line: usize, message: String },

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Unknown snarl: {0}")]
    UnknownSnarl(SnarlId),

    #[error("Snarl tree contains a cycle through snarl {0}")]
    SnarlTreeCycle(SnarlId),

    #[error("Graph contains no nodes")]
    EmptyGraph,
}

/// Read-only queries over a variation graph and its snarl decomposition
pub trait GraphIndex {
    /// Sequence length of a node
    fn node_length(&self, id: NodeId) -> Option<usize>;

    /// Forward-strand sequence of a node, when the graph stores sequences
    fn node_sequence(&self, id: NodeId) -> Option<&[u8]>;

    /// Oriented nodes reachable by one edge, sorted by (id, orientation)
    fn successors(&self, node: OrientedNode) -> &[OrientedNode];

    /// Names of the stored paths, in load order
    fn path_names(&self) -> Vec<&str>;

    /// Walk of a named path
    fn path(&self, name: &str) -> Option<&[OrientedNode]>;

    /// Total number of snarls in the snarl tree
    fn snarl_count(&self) -> usize;

    /// Top-level snarls, in tree order
    fn snarl_roots(&self) -> &[SnarlId];

    /// Child snarls nested directly inside `id`, in tree order
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownSnarl` if `id` is not in the tree.
    fn snarl_children(&self, id: SnarlId) -> Result<&[SnarlId], GraphError>;

    /// Start boundary (entry orientation) and end boundary (exit orientation)
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownSnarl` if `id` is not in the tree.
    fn snarl_boundaries(&self, id: SnarlId) -> Result<(OrientedNode, OrientedNode), GraphError>;

    /// Nodes strictly between the boundaries of `id`
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownSnarl` if `id` is not in the tree, or
    /// `GraphError::UnknownNode` if a boundary is missing from the graph.
    fn snarl_interior(&self, id: SnarlId) -> Result<BTreeSet<NodeId>, GraphError>;
}
