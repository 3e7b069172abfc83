//! Error types for diffing, merging and applying.

use std::fmt;

use splnet_core::anchor::{is_water_anchor_id, nice_id};
use splnet_core::EntityKind;
use thiserror::Error;

/// A hub anchor id introduced by more than one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubCollision {
    pub id: u32,
}

impl HubCollision {
    pub fn nice_id(&self) -> u32 {
        nice_id(self.id)
    }

    pub fn is_water(&self) -> bool {
        is_water_anchor_id(self.id)
    }
}

impl fmt::Display for HubCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let medium = if self.is_water() { "water" } else { "land" };
        write!(f, "hub anchor #{} ({medium})", self.nice_id())
    }
}

/// Errors from merging or applying diffs.
#[derive(Debug, Error)]
pub enum DiffError {
    /// Hub anchors are never renumbered, so a shared hub id cannot be merged.
    #[error("refusing to merge networks with shared hub anchors: {}", list(.collisions))]
    HubAnchorConflict { collisions: Vec<HubCollision> },

    /// An addition's id is still taken after collision remapping.
    #[error("{kind} {key} already exists in the network; refusing to overwrite it")]
    DuplicateInsertion { kind: EntityKind, key: String },

    #[error("interchange document error: {0}")]
    Interchange(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn list(collisions: &[HubCollision]) -> String {
    collisions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
