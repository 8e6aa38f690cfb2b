use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a node (GFA segment) in the variation graph
pub type NodeId = u64;

/// Orientation of a node visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }

    /// Symbol used in GAF walks (`>` forward, `<` reverse)
    #[must_use]
    pub fn walk_symbol(self) -> char {
        match self {
            Self::Forward => '>',
            Self::Reverse => '<',
        }
    }

    /// Parse a `+`/`-` strand symbol
    pub fn from_strand(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Self::Forward),
            "-" => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// A node visited in a given orientation.
///
/// Also serves as the dictionary key for anchor lookups (a *sentinel*).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OrientedNode {
    pub id: NodeId,
    pub orientation: Orientation,
}

/// Oriented boundary node used as an anchor dictionary key
pub type Sentinel = OrientedNode;

impl OrientedNode {
    pub const fn new(id: NodeId, orientation: Orientation) -> Self {
        Self { id, orientation }
    }

    pub const fn forward(id: NodeId) -> Self {
        Self::new(id, Orientation::Forward)
    }

    pub const fn reverse(id: NodeId) -> Self {
        Self::new(id, Orientation::Reverse)
    }

    #[must_use]
    pub fn flip(self) -> Self {
        Self::new(self.id, self.orientation.flip())
    }
}

impl std::fmt::Display for OrientedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.orientation.walk_symbol(), self.id)
    }
}

impl FromStr for OrientedNode {
    type Err = String;

    /// Parse `>12` / `<12` walk notation
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let orientation = match chars.next() {
            Some('>') => Orientation::Forward,
            Some('<') => Orientation::Reverse,
            _ => return Err(format!("Invalid oriented node: '{s}'")),
        };
        let id = chars
            .as_str()
            .parse::<NodeId>()
            .map_err(|_| format!("Invalid node id in '{s}'"))?;
        Ok(Self::new(id, orientation))
    }
}

// Serialized as the walk string so dictionaries stay readable
impl Serialize for OrientedNode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for OrientedNode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Parse `>1<2>3` walk notation, as used by GAF paths and GFA walks
///
/// # Errors
///
/// Returns a description of the first invalid step.
pub fn parse_walk(walk: &str) -> Result<Vec<OrientedNode>, String> {
    if !walk.starts_with(['>', '<']) {
        return Err(format!("Invalid walk: '{walk}'"));
    }
    let mut result = Vec::new();
    let mut start = 0;
    while start < walk.len() {
        let end = walk[start + 1..]
            .find(['>', '<'])
            .map_or(walk.len(), |offset| start + 1 + offset);
        result.push(walk[start..end].parse()?);
        start = end;
    }
    Ok(result)
}

/// Reverse a walk: reversed order with every orientation flipped
#[must_use]
pub fn reverse_walk(walk: &[OrientedNode]) -> Vec<OrientedNode> {
    walk.iter().rev().map(|node| node.flip()).collect()
}

/// Dense identifier of an anchor; also its index in the dictionary arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

impl AnchorId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for AnchorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnchorId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identifier of a snarl in the snarl tree (its load order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnarlId(pub u32);

impl SnarlId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for SnarlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Approximate position of an anchor on a reference path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenomicCoord {
    /// Name of the reference path
    pub path: String,
    /// Zero-based offset of the first overlapping base
    pub offset: u64,
}

impl std::fmt::Display for GenomicCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.offset)
    }
}
