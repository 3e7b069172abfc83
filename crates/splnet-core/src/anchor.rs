//! Anchors: the nodes of a spline network.
//!
//! ## Identifier layout
//!
//! ```text
//!  31      28        23                      0
//! ┌───┬───┬──┬───────┬──┬────────────────────┐
//! │ ? │ ? │S │   ?   │W │     index (23)     │
//! └───┴───┴──┴───────┴──┴────────────────────┘
//!  S = sub-anchor (bit 28)   W = water anchor (bit 23)
//! ```
//!
//! Only the sub-anchor and water bits are confirmed. Every other high bit is
//! carried through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bit 28: set on sub-anchors, clear on hub anchors.
pub const SUB_ANCHOR_BIT: u32 = 1 << 28;

/// Bit 23: set on anchors that sit on water.
pub const WATER_ANCHOR_BIT: u32 = 1 << 23;

/// Mask removing the two known flag bits from an anchor id.
pub const NICE_ID_MASK: u32 = !(SUB_ANCHOR_BIT | WATER_ANCHOR_BIT);

/// Whether `id` denotes a sub-anchor.
pub const fn is_sub_anchor_id(id: u32) -> bool {
    id & SUB_ANCHOR_BIT != 0
}

/// Whether `id` denotes a water anchor.
pub const fn is_water_anchor_id(id: u32) -> bool {
    id & WATER_ANCHOR_BIT != 0
}

/// The human-assigned index of `id`, i.e. the id without its class bits.
pub const fn nice_id(id: u32) -> u32 {
    id & NICE_ID_MASK
}

/// A graph node placed on the map.
///
/// Positions are pixel coordinates on the province map with the origin at the
/// bottom left.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub id: u32,
    pub pos_x: f32,
    pub pos_y: f32,
}

impl Anchor {
    pub fn new(id: u32, pos_x: f32, pos_y: f32) -> Self {
        Self { id, pos_x, pos_y }
    }

    pub fn is_sub_anchor(&self) -> bool {
        is_sub_anchor_id(self.id)
    }

    pub fn is_hub_anchor(&self) -> bool {
        !self.is_sub_anchor()
    }

    pub fn is_water_anchor(&self) -> bool {
        is_water_anchor_id(self.id)
    }

    pub fn nice_id(&self) -> u32 {
        nice_id(self.id)
    }
}

// Positions compare by bit pattern so that equality matches the encoded bytes.
impl PartialEq for Anchor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.pos_x.to_bits() == other.pos_x.to_bits()
            && self.pos_y.to_bits() == other.pos_y.to_bits()
    }
}

impl Eq for Anchor {}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = if self.is_sub_anchor() { "sub" } else { "hub" };
        let medium = if self.is_water_anchor() { "water" } else { "land" };
        write!(f, "Anchor #{} ({class}, {medium})", self.nice_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_land_anchor() {
        let a = Anchor::new(42, 1.0, 2.0);
        assert!(a.is_hub_anchor());
        assert!(!a.is_water_anchor());
        assert_eq!(a.nice_id(), 42);
    }

    #[test]
    fn sub_water_anchor() {
        let a = Anchor::new(SUB_ANCHOR_BIT | WATER_ANCHOR_BIT | 7, 0.0, 0.0);
        assert!(a.is_sub_anchor());
        assert!(a.is_water_anchor());
        assert_eq!(a.nice_id(), 7);
    }

    #[test]
    fn unknown_high_bits_pass_through() {
        let id = 0x8000_0000 | SUB_ANCHOR_BIT | 3;
        let a = Anchor::new(id, 0.0, 0.0);
        assert_eq!(a.id, id);
        assert_eq!(a.nice_id(), 0x8000_0003);
    }

    #[test]
    fn equality_is_bitwise_on_positions() {
        let a = Anchor::new(1, 0.0, 5.0);
        let b = Anchor::new(1, -0.0, 5.0);
        assert_ne!(a, b);
        assert_eq!(a, Anchor::new(1, 0.0, 5.0));
    }

    #[test]
    fn display_names_class() {
        let a = Anchor::new(SUB_ANCHOR_BIT | 12, 0.0, 0.0);
        assert_eq!(a.to_string(), "Anchor #12 (sub, land)");
    }

    #[test]
    fn json_field_names() {
        let a = Anchor::new(3, 1.5, 2.5);
        let json = serde_json::to_value(a).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["posX"], 1.5);
        assert_eq!(json["posY"], 2.5);
    }
}
