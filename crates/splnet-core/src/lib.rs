//! Core data model for spline networks: the road, rail and sea graph of a
//! strategy-game map.
//!
//! A network holds three kinds of entity, each keyed by its identity:
//!
//! - [`Anchor`]: a node with a position on the map.
//! - [`Route`]: an ordered path through anchors.
//! - [`Strip`]: a directed edge between two anchors carrying one or more routes.
//!
//! Several identifiers are packed bitfields. The packing functions in
//! [`anchor`] and [`strip`] are part of the on-disk contract and preserve the
//! exact bit positions.

pub mod anchor;
pub mod network;
pub mod route;
pub mod strip;

pub use anchor::Anchor;
pub use network::{DanglingReference, EntityKind, Network, NetworkStats};
pub use route::Route;
pub use strip::{ParseStripKeyError, Strip, StripKey, StripType};
