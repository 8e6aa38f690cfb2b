//! Loader for GFA 1.x graphs.
//!
//! Reads `S` (segments), `L` (links), `P` (paths) and `W` (walks) records.
//! Other record types are ignored. Segment names must be numeric because
//! alignments refer to nodes by integer id.

use std::io::BufRead;
use std::path::Path;

use crate::core::types::{parse_walk, NodeId, Orientation, OrientedNode};
use crate::graph::{GraphError, VariationGraph};
use crate::utils::io::open_input;

/// Load a GFA file (optionally gzipped)
///
/// # Errors
///
/// Returns `GraphError::Io` if the file cannot be read, `GraphError::InvalidGfa`
/// for malformed records, `GraphError::UnknownNode` if a link or path refers
/// to a missing segment, or `GraphError::EmptyGraph` if there are no segments.
pub fn parse_gfa_file(path: &Path) -> Result<VariationGraph, GraphError> {
    parse_gfa_reader(open_input(path)?)
}

/// Load a GFA graph from any buffered reader
///
/// # Errors
///
/// See [`parse_gfa_file`].
pub fn parse_gfa_reader<R: BufRead>(reader: R) -> Result<VariationGraph, GraphError> {
    let mut graph = VariationGraph::new();
    let mut referenced: Vec<NodeId> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = i + 1;
        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        let invalid = |message: String| GraphError::InvalidGfa {
            line: line_num,
            message,
        };

        match fields[0] {
            "S" => {
                if fields.len() < 3 {
                    return Err(invalid("segment with fewer than 3 fields".to_string()));
                }
                let id = parse_node_id(fields[1]).map_err(&invalid)?;
                if fields[2] == "*" {
                    let length = fields[3..]
                        .iter()
                        .find_map(|tag| tag.strip_prefix("LN:i:"))
                        .ok_or_else(|| invalid(format!("segment {id} has no sequence and no LN tag")))?
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("invalid LN tag on segment {id}")))?;
                    graph.add_node_with_length(id, length);
                } else {
                    graph.add_node(id, fields[2].as_bytes());
                }
            }
            "L" => {
                if fields.len() < 5 {
                    return Err(invalid("link with fewer than 5 fields".to_string()));
                }
                let from = parse_segment(fields[1], fields[2]).map_err(&invalid)?;
                let to = parse_segment(fields[3], fields[4]).map_err(&invalid)?;
                referenced.extend([from.id, to.id]);
                graph.add_edge(from, to);
            }
            "P" => {
                if fields.len() < 3 {
                    return Err(invalid("path with fewer than 3 fields".to_string()));
                }
                let walk = fields[2]
                    .split(',')
                    .map(parse_path_step)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(&invalid)?;
                referenced.extend(walk.iter().map(|node| node.id));
                graph.add_path(fields[1], walk);
            }
            "W" => {
                if fields.len() < 7 {
                    return Err(invalid("walk with fewer than 7 fields".to_string()));
                }
                let walk = parse_walk(fields[6]).map_err(&invalid)?;
                referenced.extend(walk.iter().map(|node| node.id));
                let name = format!("{}#{}#{}", fields[1], fields[2], fields[3]);
                graph.add_path(name, walk);
            }
            _ => {}
        }
    }

    if graph.node_count() == 0 {
        return Err(GraphError::EmptyGraph);
    }
    if let Some(&missing) = referenced.iter().find(|id| !graph.has_node(**id)) {
        return Err(GraphError::UnknownNode(missing));
    }

    Ok(graph)
}

fn parse_node_id(field: &str) -> Result<NodeId, String> {
    field
        .parse()
        .map_err(|_| format!("non-numeric segment name '{field}'"))
}

fn parse_segment(id: &str, strand: &str) -> Result<OrientedNode, String> {
    let orientation =
        Orientation::from_strand(strand).ok_or_else(|| format!("invalid orientation '{strand}'"))?;
    Ok(OrientedNode::new(parse_node_id(id)?, orientation))
}

/// Parse a `12+` path step
fn parse_path_step(step: &str) -> Result<OrientedNode, String> {
    if step.len() < 2 || !step.is_char_boundary(step.len() - 1) {
        return Err(format!("invalid path step '{step}'"));
    }
    let (id, strand) = step.split_at(step.len() - 1);
    parse_segment(id, strand)
}
