use std::collections::HashMap;

use tracing::{info, warn};

use crate::core::types::{GenomicCoord, NodeId};
use crate::dictionary::store::AnchorDictionary;
use crate::graph::{GraphError, GraphIndex};

/// Attaches a reference coordinate to every anchor that touches a reference path.
///
/// The coordinate is the offset of the earliest canonical-path node on the
/// reference path. Annotation replaces every position, so running it again
/// gives the same snapshot.
pub struct PositionAnnotator<'a, G: GraphIndex + ?Sized> {
    graph: &'a G,
    reference: Option<String>,
}

impl<'a, G: GraphIndex + ?Sized> PositionAnnotator<'a, G> {
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            reference: None,
        }
    }

    /// Use `name` instead of the dictionary's first reference path
    #[must_use]
    pub fn with_reference(mut self, name: impl Into<String>) -> Self {
        self.reference = Some(name.into());
        self
    }

    fn reference_name(&self, dictionary: &AnchorDictionary) -> Option<String> {
        if let Some(name) = &self.reference {
            return Some(name.clone());
        }
        dictionary
            .reference_paths()
            .iter()
            .find(|name| self.graph.path(name).is_some())
            .cloned()
            .or_else(|| self.graph.path_names().first().map(|name| (*name).to_string()))
    }

    /// Offset of the first visit to each node on the named path
    fn first_offsets(&self, name: &str) -> Result<HashMap<NodeId, u64>, GraphError> {
        let mut offsets = HashMap::new();
        let Some(path) = self.graph.path(name) else {
            return Ok(offsets);
        };
        let mut offset = 0u64;
        for node in path {
            offsets.entry(node.id).or_insert(offset);
            let length = self
                .graph
                .node_length(node.id)
                .ok_or(GraphError::UnknownNode(node.id))?;
            offset += length as u64;
        }
        Ok(offsets)
    }

    /// New snapshot of `dictionary` with positions on the reference path
    ///
    /// # Errors
    ///
    /// Returns `GraphError::UnknownNode` if the reference path visits a node
    /// the graph does not have.
    pub fn annotate(&self, dictionary: &AnchorDictionary) -> Result<AnchorDictionary, GraphError> {
        let Some(name) = self.reference_name(dictionary) else {
            warn!("No reference path available; anchors keep no position");
            return Ok(dictionary.with_positions(vec![None; dictionary.len()]));
        };
        if self.graph.path(&name).is_none() {
            warn!("Reference path {name} is not in the graph; anchors keep no position");
        }

        let offsets = self.first_offsets(&name)?;
        let positions: Vec<Option<GenomicCoord>> = dictionary
            .anchors()
            .iter()
            .map(|anchor| {
                anchor
                    .canonical_path
                    .iter()
                    .filter_map(|node| offsets.get(&node.id).copied())
                    .min()
                    .map(|offset| GenomicCoord {
                        path: name.clone(),
                        offset,
                    })
            })
            .collect();

        let placed = positions.iter().filter(|position| position.is_some()).count();
        info!("Placed {placed} of {} anchors on {name}", dictionary.len());
        Ok(dictionary.with_positions(positions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::anchor::Anchor;
    use crate::core::types::{AnchorId, SnarlId};
    use crate::dictionary::builder::AnchorDictionaryBuilder;
    use crate::test_support::{fwd, nested_graph};

    #[test]
    fn test_positions_on_reference() {
        let graph = nested_graph();
        let dictionary = AnchorDictionaryBuilder::new(&graph).build().unwrap().dictionary;
        let annotated = PositionAnnotator::new(&graph).annotate(&dictionary).unwrap();

        // ref: 10 (AC) then 1 starts at 2; 5 starts at 2 + 7 + 1 + 2 + 1
        let offsets: Vec<_> = annotated
            .anchors()
            .iter()
            .map(|anchor| anchor.position.as_ref().map(|p| (p.path.as_str(), p.offset)))
            .collect();
        assert_eq!(offsets, vec![Some(("ref", 2)), Some(("ref", 13))]);

        // The input snapshot is untouched
        assert!(dictionary.anchors().iter().all(|anchor| anchor.position.is_none()));
    }

    #[test]
    fn test_annotation_is_idempotent() {
        let graph = nested_graph();
        let dictionary = AnchorDictionaryBuilder::new(&graph).build().unwrap().dictionary;
        let annotator = PositionAnnotator::new(&graph).with_reference("alt");
        let once = annotator.annotate(&dictionary).unwrap();
        let twice = annotator.annotate(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_anchor_off_reference_has_no_position() {
        let graph = nested_graph();
        let mut dictionary = AnchorDictionary::new();
        dictionary
            .insert(Anchor::new(AnchorId(0), SnarlId(0), fwd(&[20, 21, 22]), 1))
            .unwrap();
        let annotated = PositionAnnotator::new(&graph).annotate(&dictionary).unwrap();
        assert!(annotated.anchors()[0].position.is_none());

        let missing = PositionAnnotator::new(&graph)
            .with_reference("chr1")
            .annotate(&dictionary)
            .unwrap();
        assert!(missing.anchors()[0].position.is_none());
    }
}
