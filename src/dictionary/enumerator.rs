use std::collections::HashSet;

use tracing::debug;

use crate::core::snarl::LeafSnarl;
use crate::core::types::SnarlId;
use crate::graph::{GraphError, GraphIndex};

/// Counters gathered while walking the snarl tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Snarls visited, leaves and non-leaves
    pub visited: usize,
    /// Leaf snarls yielded, degenerate ones included
    pub leaves: usize,
    /// Leaf snarls with an empty interior
    pub degenerate: usize,
    /// Leaf snarls whose start and end share a node id (not yielded)
    pub unary: usize,
}

/// Post-order walk of the snarl tree yielding leaf snarls.
///
/// The walk is lazy and single-use. Order is fixed by the tree: roots in
/// order, children in order, so two walks over the same index agree.
/// A snarl reached twice, or a snarl unreachable from the roots, means the
/// parent links form a cycle; the walk then yields one
/// `GraphError::SnarlTreeCycle` and stops.
pub struct SnarlEnumerator<'a, G: GraphIndex + ?Sized> {
    graph: &'a G,
    /// (snarl, children already pushed)
    stack: Vec<(SnarlId, bool)>,
    visited: HashSet<SnarlId>,
    finished: bool,
    stats: EnumerationStats,
}

impl<'a, G: GraphIndex + ?Sized> SnarlEnumerator<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        let stack = graph
            .snarl_roots()
            .iter()
            .rev()
            .map(|&root| (root, false))
            .collect();
        Self {
            graph,
            stack,
            visited: HashSet::new(),
            finished: false,
            stats: EnumerationStats::default(),
        }
    }

    pub fn stats(&self) -> EnumerationStats {
        self.stats
    }

    fn fail(&mut self, error: GraphError) -> Option<Result<LeafSnarl, GraphError>> {
        self.finished = true;
        Some(Err(error))
    }

    /// Boundaries and interior of a leaf; `None` for unary snarls
    fn resolve_leaf(&mut self, id: SnarlId) -> Result<Option<LeafSnarl>, GraphError> {
        let (start, end) = self.graph.snarl_boundaries(id)?;
        if start.id == end.id {
            debug!("Skipping unary snarl {id} at node {}", start.id);
            self.stats.unary += 1;
            return Ok(None);
        }
        let interior = self.graph.snarl_interior(id)?;
        let leaf = LeafSnarl::new(id, start, end, interior);
        self.stats.leaves += 1;
        if leaf.is_degenerate() {
            self.stats.degenerate += 1;
        }
        Ok(Some(leaf))
    }

    fn first_unvisited(&self) -> Option<SnarlId> {
        (0..self.graph.snarl_count())
            .filter_map(|index| u32::try_from(index).ok().map(SnarlId))
            .find(|id| !self.visited.contains(id))
    }
}

impl<G: GraphIndex + ?Sized> Iterator for SnarlEnumerator<'_, G> {
    type Item = Result<LeafSnarl, GraphError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let graph = self.graph;

        loop {
            let Some((id, expanded)) = self.stack.pop() else {
                self.finished = true;
                // Snarls that only hang off other snarls in a loop are never reached
                return self
                    .first_unvisited()
                    .map(|id| Err(GraphError::SnarlTreeCycle(id)));
            };

            let children = match graph.snarl_children(id) {
                Ok(children) => children,
                Err(e) => return self.fail(e),
            };

            if expanded {
                if !children.is_empty() {
                    continue;
                }
                match self.resolve_leaf(id) {
                    Ok(Some(leaf)) => return Some(Ok(leaf)),
                    Ok(None) => continue,
                    Err(e) => return self.fail(e),
                }
            }

            if !self.visited.insert(id) {
                return self.fail(GraphError::SnarlTreeCycle(id));
            }
            self.stats.visited += 1;
            self.stack.push((id, true));
            self.stack
                .extend(children.iter().rev().map(|&child| (child, false)));
        }
    }
}
