//! Anchor dictionary builder.
//!
//! The `AnchorDictionaryBuilder` turns leaf snarls into anchors. Each anchor's
//! canonical path is chosen by one fixed rule, tried in order:
//!
//! 1. The first crossing of the snarl by a reference path (configured names
//!    in order, or every graph path in load order). Backward crossings are
//!    reversed. Not used when read votes are supplied.
//! 2. With read votes: the walk most alignments took, ties going to the
//!    lexicographically least walk.
//! 3. The lexicographically least simple walk from the start boundary to the
//!    end boundary through the interior, searched depth-first over sorted
//!    successors within a step budget.
//!
//! Snarls where no rule finds a walk are skipped and counted as unreachable.

use tracing::{debug, info, warn};

use crate::core::anchor::Anchor;
use crate::core::snarl::LeafSnarl;
use crate::core::types::OrientedNode;
use crate::dictionary::enumerator::{EnumerationStats, SnarlEnumerator};
use crate::dictionary::store::{AnchorDictionary, DictionaryError};
use crate::dictionary::votes::ReadPathVotes;
use crate::graph::{GraphError, GraphIndex};

/// Default step budget for the fallback walk search
pub const DEFAULT_MAX_SEARCH_STEPS: usize = 10_000;

/// Configuration for dictionary builds
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Reference paths tried by rule 1; empty means every graph path
    pub reference_paths: Vec<String>,

    /// Nodes the fallback search may expand per snarl
    pub max_search_steps: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            reference_paths: Vec::new(),
            max_search_steps: DEFAULT_MAX_SEARCH_STEPS,
        }
    }
}

/// How a canonical path was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSource {
    Reference,
    Reads,
    Search,
}

/// Counters for one build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub leaf_snarls: usize,
    pub degenerate: usize,
    pub anchors: usize,
    pub unreachable: usize,
    pub from_reference: usize,
    pub from_reads: usize,
    pub from_search: usize,
    pub shared_sentinels: usize,
}

/// Result of a build: the dictionary plus the leaf snarls it was built from
#[derive(Debug)]
pub struct BuildOutput {
    pub dictionary: AnchorDictionary,
    pub leaf_snarls: Vec<LeafSnarl>,
    pub stats: BuildStats,
}

/// Builds an `AnchorDictionary` from the leaf snarls of a graph
pub struct AnchorDictionaryBuilder<'a, G: GraphIndex + ?Sized> {
    graph: &'a G,
    config: BuildConfig,
    votes: Option<ReadPathVotes>,
}

impl<'a, G: GraphIndex + ?Sized> AnchorDictionaryBuilder<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            config: BuildConfig::default(),
            votes: None,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: BuildConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose canonical paths from alignment support instead of reference paths
    #[must_use]
    pub fn with_read_votes(mut self, votes: ReadPathVotes) -> Self {
        self.votes = Some(votes);
        self
    }

    /// Collect every leaf snarl of the graph, in post-order
    ///
    /// # Errors
    ///
    /// Returns the first `GraphError` met while walking the snarl tree.
    pub fn leaf_snarls(&self) -> Result<(Vec<LeafSnarl>, EnumerationStats), GraphError> {
        let mut enumerator = SnarlEnumerator::new(self.graph);
        let leaves = enumerator.by_ref().collect::<Result<Vec<_>, _>>()?;
        let stats = enumerator.stats();
        info!(
            "Snarl tree: {} snarls visited, {} leaf snarls ({} degenerate, {} unary skipped)",
            stats.visited, stats.leaves, stats.degenerate, stats.unary
        );
        Ok((leaves, stats))
    }

    /// Enumerate the leaf snarls and build the dictionary from them
    ///
    /// # Errors
    ///
    /// Returns `DictionaryError::Graph` for snarl-tree or graph failures and
    /// `DictionaryError::AnchorIdCollision` if id allocation breaks.
    pub fn build(&self) -> Result<BuildOutput, DictionaryError> {
        let (leaves, _) = self.leaf_snarls()?;
        self.build_from_snarls(leaves)
    }

    /// Build the dictionary from already enumerated leaf snarls
    ///
    /// # Errors
    ///
    /// See [`AnchorDictionaryBuilder::build`].
    pub fn build_from_snarls(
        &self,
        leaf_snarls: Vec<LeafSnarl>,
    ) -> Result<BuildOutput, DictionaryError> {
        let reference_paths = self.reference_paths();
        let mut dictionary = AnchorDictionary::new();
        let mut stats = BuildStats {
            leaf_snarls: leaf_snarls.len(),
            ..BuildStats::default()
        };

        for leaf in &leaf_snarls {
            if leaf.is_degenerate() {
                warn!(
                    "Skipping degenerate snarl {} ({} {}): empty interior",
                    leaf.id, leaf.start, leaf.end
                );
                stats.degenerate += 1;
                continue;
            }

            let Some((path, source)) = self.canonical_path(leaf, &reference_paths) else {
                warn!(
                    "Skipping snarl {} ({} {}): no walk between its boundaries",
                    leaf.id, leaf.start, leaf.end
                );
                stats.unreachable += 1;
                continue;
            };
            match source {
                PathSource::Reference => stats.from_reference += 1,
                PathSource::Reads => stats.from_reads += 1,
                PathSource::Search => stats.from_search += 1,
            }

            let length_bp = self.interior_length(&path)?;
            let anchor = Anchor::new(dictionary.next_id(), leaf.id, path, length_bp);
            debug!("Anchor {} for snarl {}: {}", anchor.id, leaf.id, anchor.walk_string());
            dictionary.insert(anchor)?;
        }

        stats.anchors = dictionary.len();
        stats.shared_sentinels = dictionary.shared_sentinels();
        if self.votes.is_none() {
            dictionary.set_reference_paths(reference_paths);
        }

        info!(
            "Built {} anchors from {} leaf snarls ({} degenerate, {} unreachable)",
            stats.anchors, stats.leaf_snarls, stats.degenerate, stats.unreachable
        );

        Ok(BuildOutput {
            dictionary,
            leaf_snarls,
            stats,
        })
    }

    fn reference_paths(&self) -> Vec<String> {
        if self.config.reference_paths.is_empty() {
            self.graph
                .path_names()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            self.config.reference_paths.clone()
        }
    }

    fn canonical_path(
        &self,
        leaf: &LeafSnarl,
        reference_paths: &[String],
    ) -> Option<(Vec<OrientedNode>, PathSource)> {
        let preferred = match &self.votes {
            Some(votes) => votes
                .winner(leaf.id)
                .map(|walk| (walk.to_vec(), PathSource::Reads)),
            None => self
                .reference_crossing(leaf, reference_paths)
                .map(|walk| (walk, PathSource::Reference)),
        };
        preferred.or_else(|| self.least_walk(leaf).map(|walk| (walk, PathSource::Search)))
    }

    fn reference_crossing(
        &self,
        leaf: &LeafSnarl,
        reference_paths: &[String],
    ) -> Option<Vec<OrientedNode>> {
        reference_paths.iter().find_map(|name| {
            let Some(path) = self.graph.path(name) else {
                debug!("Reference path {name} is not in the graph");
                return None;
            };
            leaf.crossings(path).next()
        })
    }

    /// Depth-first search over sorted successors; the first walk to reach the
    /// end boundary is the lexicographically least one
    fn least_walk(&self, leaf: &LeafSnarl) -> Option<Vec<OrientedNode>> {
        let mut walk = vec![leaf.start];
        // Next successor to try for each node on `walk`
        let mut cursors = vec![0usize];
        let mut steps = 0;

        while let Some(&current) = walk.last() {
            let successors = self.graph.successors(current);
            let cursor = cursors.last_mut()?;
            let Some(&next) = successors.get(*cursor) else {
                walk.pop();
                cursors.pop();
                continue;
            };
            *cursor += 1;

            if next == leaf.end {
                walk.push(next);
                return Some(walk);
            }
            if !leaf.contains(next.id) || walk.iter().any(|node| node.id == next.id) {
                continue;
            }

            steps += 1;
            if steps > self.config.max_search_steps {
                debug!("Walk search in snarl {} hit the step limit", leaf.id);
                return None;
            }
            walk.push(next);
            cursors.push(0);
        }
        None
    }

    fn interior_length(&self, path: &[OrientedNode]) -> Result<u64, GraphError> {
        let interior = &path[1..path.len() - 1];
        interior.iter().try_fold(0u64, |total, node| {
            let length = self
                .graph
                .node_length(node.id)
                .ok_or(GraphError::UnknownNode(node.id))?;
            Ok(total + length as u64)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::anchor::Direction;
    use crate::core::types::{AnchorId, SnarlId};
    use crate::graph::{SnarlTree, VariationGraph};
    use crate::test_support::{fwd, nested_graph};

    #[test]
    fn test_single_snarl_anchor() {
        let graph = nested_graph();
        let output = AnchorDictionaryBuilder::new(&graph)
            .with_config(BuildConfig {
                reference_paths: vec!["ref".to_string()],
                ..BuildConfig::default()
            })
            .build()
            .unwrap();
        let dictionary = &output.dictionary;

        let anchor = dictionary.get(AnchorId(0)).unwrap();
        assert_eq!(anchor.snarl, SnarlId(1));
        assert_eq!(anchor.canonical_path, fwd(&[1, 2, 3, 4, 5]));
        // C + GG + T
        assert_eq!(anchor.length_bp, 4);

        let entry = dictionary.lookup(OrientedNode::forward(1)).unwrap();
        let exit = dictionary.lookup(OrientedNode::reverse(5)).unwrap();
        assert_eq!(entry.anchor, anchor.id);
        assert_eq!(exit.anchor, anchor.id);
        assert_eq!(exit.direction, Direction::Reverse);
    }

    #[test]
    fn test_build_stats_and_degenerate_skip() {
        let graph = nested_graph();
        let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();
        assert_eq!(output.leaf_snarls.len(), 3);
        assert_eq!(output.dictionary.len(), 2);
        assert_eq!(
            output.stats,
            BuildStats {
                leaf_snarls: 3,
                degenerate: 1,
                anchors: 2,
                unreachable: 0,
                from_reference: 2,
                from_reads: 0,
                from_search: 0,
                shared_sentinels: 0,
            }
        );
        assert_eq!(output.dictionary.reference_paths(), &["ref", "alt"]);
    }

    #[test]
    fn test_reference_order_decides_path() {
        let graph = nested_graph();
        let output = AnchorDictionaryBuilder::new(&graph)
            .with_config(BuildConfig {
                reference_paths: vec!["alt".to_string(), "ref".to_string()],
                ..BuildConfig::default()
            })
            .build()
            .unwrap();
        let paths: Vec<_> = output
            .dictionary
            .anchors()
            .iter()
            .map(|anchor| anchor.walk_string())
            .collect();
        assert_eq!(paths, vec![">1>2>4>5", ">5>8>9"]);
    }

    #[test]
    fn test_build_is_deterministic() {
        let graph = nested_graph();
        let first = AnchorDictionaryBuilder::new(&graph).build().unwrap();
        let second = AnchorDictionaryBuilder::new(&graph).build().unwrap();
        assert_eq!(first.dictionary, second.dictionary);
        assert_eq!(first.dictionary.sentinel_map(), second.dictionary.sentinel_map());
    }

    #[test]
    fn test_search_fallback_without_paths() {
        let mut graph = nested_graph();
        graph.clear_paths();
        let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();
        assert_eq!(output.stats.from_search, 2);
        // 3 < 4 at the first branch, 7 < 8 at the second
        assert_eq!(output.dictionary.anchors()[0].canonical_path, fwd(&[1, 2, 3, 4, 5]));
        assert_eq!(output.dictionary.anchors()[1].canonical_path, fwd(&[5, 7, 9]));
    }

    #[test]
    fn test_read_votes_override_reference() {
        let graph = nested_graph();
        let mut votes = ReadPathVotes::new();
        votes.add(SnarlId(1), fwd(&[1, 2, 4, 5]));
        let output = AnchorDictionaryBuilder::new(&graph)
            .with_read_votes(votes)
            .build()
            .unwrap();
        assert_eq!(output.stats.from_reads, 1);
        assert_eq!(output.stats.from_search, 1);
        assert_eq!(output.dictionary.anchors()[0].canonical_path, fwd(&[1, 2, 4, 5]));
        assert_eq!(output.dictionary.anchors()[0].length_bp, 2);
        assert!(output.dictionary.reference_paths().is_empty());
    }

    #[test]
    fn test_unreachable_snarl_skipped() {
        let mut graph = VariationGraph::new();
        for id in 1..=3 {
            graph.add_node(id, b"ACGT");
        }
        // 2 hangs off 1 but never reaches 3
        graph.add_edge(OrientedNode::forward(1), OrientedNode::forward(2));
        let tree = SnarlTree::from_links(
            vec![(OrientedNode::forward(1), OrientedNode::forward(3))],
            vec![None],
        )
        .unwrap();
        let graph = graph.with_snarls(tree);

        let output = AnchorDictionaryBuilder::new(&graph).build().unwrap();
        assert!(output.dictionary.is_empty());
        assert_eq!(output.stats.unreachable, 1);
    }

    #[test]
    fn test_search_step_limit() {
        let mut graph = nested_graph();
        graph.clear_paths();
        let output = AnchorDictionaryBuilder::new(&graph)
            .with_config(BuildConfig {
                max_search_steps: 1,
                ..BuildConfig::default()
            })
            .build()
            .unwrap();
        // (5, 9) needs one step, (1, 5) needs three
        assert_eq!(output.stats.unreachable, 1);
        assert_eq!(output.dictionary.anchors()[0].snarl, SnarlId(2));
    }
}
