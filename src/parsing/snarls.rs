//! Loader for snarl decompositions in JSON Lines form.
//!
//! Each line is one snarl, in the shape `vg view -R` prints:
//!
//! ```text
//! {"start": {"node_id": "1"}, "end": {"node_id": "5"}, "parent": {"start": {"node_id": "10"}, "end": {"node_id": "11"}}}
//! ```
//!
//! `node_id` may be a string or an integer and `backward` defaults to false.
//! The start visit is the orientation a traversal enters the snarl with, the
//! end visit the orientation it leaves with. Parents are matched by their
//! `(start, end)` pair and may appear before or after their children.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use serde::Deserialize;

use crate::core::types::{NodeId, Orientation, OrientedNode, SnarlId};
use crate::graph::{GraphError, SnarlTree};
use crate::utils::io::open_input;

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeIdRepr {
    Number(NodeId),
    Text(String),
}

#[derive(Deserialize)]
struct Visit {
    node_id: NodeIdRepr,
    #[serde(default)]
    backward: bool,
}

#[derive(Deserialize)]
struct SnarlBoundaries {
    start: Visit,
    end: Visit,
}

#[derive(Deserialize)]
struct SnarlLine {
    start: Visit,
    end: Visit,
    #[serde(default)]
    parent: Option<SnarlBoundaries>,
}

impl Visit {
    fn to_oriented(&self) -> Result<OrientedNode, String> {
        let id = match &self.node_id {
            NodeIdRepr::Number(id) => *id,
            NodeIdRepr::Text(text) => text
                .parse()
                .map_err(|_| format!("non-numeric node id '{text}'"))?,
        };
        let orientation = if self.backward {
            Orientation::Reverse
        } else {
            Orientation::Forward
        };
        Ok(OrientedNode::new(id, orientation))
    }
}

type Boundaries = (OrientedNode, OrientedNode);

/// Load a snarl file (optionally gzipped)
///
/// # Errors
///
/// Returns `GraphError::Io` if the file cannot be read, or
/// `GraphError::InvalidSnarl` for malformed lines, duplicate snarls, and
/// parents that are not in the file.
pub fn parse_snarls_file(path: &Path) -> Result<SnarlTree, GraphError> {
    parse_snarls_reader(open_input(path)?)
}

/// Load a snarl decomposition from any buffered reader
///
/// # Errors
///
/// See [`parse_snarls_file`].
pub fn parse_snarls_reader<R: BufRead>(reader: R) -> Result<SnarlTree, GraphError> {
    let mut boundaries: Vec<Boundaries> = Vec::new();
    let mut parent_links: Vec<Option<(usize, Boundaries)>> = Vec::new();
    let mut index: HashMap<Boundaries, SnarlId> = HashMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_num = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let invalid = |message: String| GraphError::InvalidSnarl {
            line: line_num,
            message,
        };

        let record: SnarlLine = serde_json::from_str(line).map_err(|e| invalid(e.to_string()))?;
        let start = record.start.to_oriented().map_err(&invalid)?;
        let end = record.end.to_oriented().map_err(&invalid)?;
        let parent = match &record.parent {
            Some(parent) => Some((
                line_num,
                (
                    parent.start.to_oriented().map_err(&invalid)?,
                    parent.end.to_oriented().map_err(&invalid)?,
                ),
            )),
            None => None,
        };

        #[allow(clippy::cast_possible_truncation)] // Snarl counts fit in u32
        let id = SnarlId(boundaries.len() as u32);
        if index.insert((start, end), id).is_some() {
            return Err(invalid(format!("duplicate snarl {start} {end}")));
        }
        boundaries.push((start, end));
        parent_links.push(parent);
    }

    let mut parents = Vec::with_capacity(parent_links.len());
    for link in parent_links {
        let parent = match link {
            Some((line, key)) => Some(*index.get(&key).ok_or_else(|| GraphError::InvalidSnarl {
                line,
                message: format!("parent snarl {} {} not found", key.0, key.1),
            })?),
            None => None,
        };
        parents.push(parent);
    }

    SnarlTree::from_links(boundaries, parents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_snarls() {
        let text = r#"{"start": {"node_id": "1"}, "end": {"node_id": "5"}, "parent": {"start": {"node_id": "10"}, "end": {"node_id": "11"}}, "type": 1}
{"start": {"node_id": 10}, "end": {"node_id": 11}}

{"start": {"node_id": "7", "backward": true}, "end": {"node_id": "6", "backward": true}}
"#;
        let tree = parse_snarls_reader(text.as_bytes()).unwrap();
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.roots(), &[SnarlId(1), SnarlId(2)]);

        let child = tree.get(SnarlId(0)).unwrap();
        assert_eq!(child.start, OrientedNode::forward(1));
        assert_eq!(child.parent, Some(SnarlId(1)));
        assert_eq!(tree.get(SnarlId(1)).unwrap().children, vec![SnarlId(0)]);

        let inverted = tree.get(SnarlId(2)).unwrap();
        assert_eq!(inverted.start, OrientedNode::reverse(7));
        assert_eq!(inverted.end, OrientedNode::reverse(6));
    }

    #[test]
    fn test_unknown_parent() {
        let text = r#"{"start": {"node_id": "1"}, "end": {"node_id": "5"}, "parent": {"start": {"node_id": "10"}, "end": {"node_id": "11"}}}"#;
        let result = parse_snarls_reader(text.as_bytes());
        assert!(matches!(result, Err(GraphError::InvalidSnarl { line: 1, .. })));
    }

    #[test]
    fn test_malformed_line() {
        let text = "{\"start\": {\"node_id\": \"1\"}}\n";
        assert!(matches!(
            parse_snarls_reader(text.as_bytes()),
            Err(GraphError::InvalidSnarl { line: 1, .. })
        ));
        let text = r#"{"start": {"node_id": "a"}, "end": {"node_id": "5"}}"#;
        assert!(parse_snarls_reader(text.as_bytes()).is_err());
    }

    #[test]
    fn test_duplicate_snarl() {
        let line = r#"{"start": {"node_id": "1"}, "end": {"node_id": "5"}}"#;
        let text = format!("{line}\n{line}\n");
        assert!(matches!(
            parse_snarls_reader(text.as_bytes()),
            Err(GraphError::InvalidSnarl { line: 2, .. })
        ));
    }
}
