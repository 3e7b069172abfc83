//! Routes: ordered paths through anchors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered path through a sequence of anchors.
///
/// The low byte of the id behaves as a type discriminant and the remaining
/// bits as an incrementing index. Otherwise the id is opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: u64,
    /// Anchor ids in path order.
    pub anchors: Vec<u32>,
}

impl Route {
    pub fn new(id: u64, anchors: Vec<u32>) -> Self {
        Self { id, anchors }
    }

    /// The type discriminant stored in the low byte of the id.
    pub fn type_byte(&self) -> u8 {
        route_type_byte(self.id)
    }

    /// Rewrite every anchor reference found in `map`, leaving others alone.
    pub fn remap_anchors(&mut self, map: &BTreeMap<u32, u32>) {
        for anchor in &mut self.anchors {
            if let Some(&new_id) = map.get(anchor) {
                *anchor = new_id;
            }
        }
    }
}

/// Low byte of a route id.
pub const fn route_type_byte(id: u64) -> u8 {
    (id & 0xff) as u8
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Route #{} ({} anchors)", self.id, self.anchors.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_keeps_order_and_unmapped_ids() {
        let mut route = Route::new(5, vec![1, 2, 3, 2]);
        let map = BTreeMap::from([(2, 20), (9, 90)]);
        route.remap_anchors(&map);
        assert_eq!(route.anchors, vec![1, 20, 3, 20]);
    }

    #[test]
    fn type_byte_is_low_byte() {
        assert_eq!(Route::new(0x0102_0302, vec![]).type_byte(), 0x02);
    }

    #[test]
    fn order_is_significant_for_equality() {
        assert_ne!(Route::new(1, vec![1, 2]), Route::new(1, vec![2, 1]));
    }
}
