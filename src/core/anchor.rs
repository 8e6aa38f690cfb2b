use serde::{Deserialize, Serialize};

use crate::core::types::{reverse_walk, AnchorId, GenomicCoord, OrientedNode, SnarlId};

/// Which way a traversal crosses an anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Entered through the start boundary, canonical path as written
    Forward,
    /// Entered through the end boundary, canonical path reversed
    Reverse,
}

/// A canonical walk through a leaf snarl
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: AnchorId,

    /// Leaf snarl the anchor was derived from
    pub snarl: SnarlId,

    /// Walk from the start boundary to the end boundary, boundaries included
    pub canonical_path: Vec<OrientedNode>,

    /// Total sequence length of the interior nodes on the canonical path
    pub length_bp: u64,

    /// First overlapping coordinate on a reference path, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GenomicCoord>,
}

impl Anchor {
    pub fn new(id: AnchorId, snarl: SnarlId, canonical_path: Vec<OrientedNode>, length_bp: u64) -> Self {
        Self {
            id,
            snarl,
            canonical_path,
            length_bp,
            position: None,
        }
    }

    /// Sentinel hit by a traversal crossing the anchor forward.
    ///
    /// Canonical paths always hold at least the two boundary nodes.
    pub fn entry_sentinel(&self) -> OrientedNode {
        self.canonical_path[0]
    }

    /// Sentinel hit by a traversal crossing the anchor backwards
    pub fn exit_sentinel(&self) -> OrientedNode {
        self.canonical_path[self.canonical_path.len() - 1].flip()
    }

    /// Interior part of the canonical path
    pub fn interior(&self) -> &[OrientedNode] {
        let len = self.canonical_path.len();
        if len < 2 {
            return &[];
        }
        &self.canonical_path[1..len - 1]
    }

    /// Number of nodes on the canonical path
    pub fn len(&self) -> usize {
        self.canonical_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_path.is_empty()
    }

    /// The walk a read must follow when crossing the anchor in `direction`
    pub fn walk(&self, direction: Direction) -> Vec<OrientedNode> {
        match direction {
            Direction::Forward => self.canonical_path.clone(),
            Direction::Reverse => reverse_walk(&self.canonical_path),
        }
    }

    /// Does `subpath` follow the canonical path in `direction`, node for node?
    pub fn matches_walk(&self, subpath: &[OrientedNode], direction: Direction) -> bool {
        if subpath.len() != self.canonical_path.len() {
            return false;
        }
        match direction {
            Direction::Forward => subpath == self.canonical_path.as_slice(),
            Direction::Reverse => subpath
                .iter()
                .zip(self.canonical_path.iter().rev())
                .all(|(read, canonical)| *read == canonical.flip()),
        }
    }

    /// Canonical path in walk notation, e.g. `>1>2<3>4`
    pub fn walk_string(&self) -> String {
        self.canonical_path.iter().map(ToString::to_string).collect()
    }
}
