//! Core data types shared by every stage of the anchor pipeline.
//!
//! - [`OrientedNode`] / [`Sentinel`]: a node visit with orientation, and the
//!   dictionary key used to find anchors
//! - [`LeafSnarl`]: a snarl without children, the unit anchors are derived from
//! - [`Anchor`]: a canonical walk through a leaf snarl
//! - [`AnchorId`], [`SnarlId`], [`GenomicCoord`]: identifiers and positions
//!
//! ## Walk notation
//!
//! Walks are written the way GAF writes them: `>12` visits node 12 forward,
//! `<12` visits it in reverse. A walk read backwards visits the same nodes in
//! reverse order with every orientation flipped.
//!
//! [`OrientedNode`]: types::OrientedNode
//! [`Sentinel`]: types::Sentinel
//! [`LeafSnarl`]: snarl::LeafSnarl
//! [`Anchor`]: anchor::Anchor
//! [`AnchorId`]: types::AnchorId
//! [`SnarlId`]: types::SnarlId
//! [`GenomicCoord`]: types::GenomicCoord

pub mod anchor;
pub mod snarl;
pub mod types;
