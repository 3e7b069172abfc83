//! The network store: anchors, routes and strips keyed by identity.
//!
//! Entities refer to each other by id only. A reference is resolved by a map
//! lookup at use time, so renumbering an entity is a key rewrite plus a pass
//! over the referencing fields.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::anchor::Anchor;
use crate::route::Route;
use crate::strip::{Strip, StripKey, DESTINATION_ANCHOR_MASK, SOURCE_ANCHOR_MASK};

/// The three entity kinds stored in a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Anchor,
    Route,
    Strip,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Anchor => "anchor",
            EntityKind::Route => "route",
            EntityKind::Strip => "strip",
        };
        f.write_str(name)
    }
}

/// A complete spline network.
///
/// Maps iterate in ascending key order, which is also the order entities are
/// written back to disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    anchors: BTreeMap<u32, Anchor>,
    routes: BTreeMap<u64, Route>,
    strips: BTreeMap<StripKey, Strip>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchors(&self) -> &BTreeMap<u32, Anchor> {
        &self.anchors
    }

    pub fn routes(&self) -> &BTreeMap<u64, Route> {
        &self.routes
    }

    pub fn strips(&self) -> &BTreeMap<StripKey, Strip> {
        &self.strips
    }

    pub fn anchors_mut(&mut self) -> &mut BTreeMap<u32, Anchor> {
        &mut self.anchors
    }

    pub fn routes_mut(&mut self) -> &mut BTreeMap<u64, Route> {
        &mut self.routes
    }

    pub fn strips_mut(&mut self) -> &mut BTreeMap<StripKey, Strip> {
        &mut self.strips
    }

    /// Insert an anchor under its own id, returning any anchor it replaced.
    pub fn insert_anchor(&mut self, anchor: Anchor) -> Option<Anchor> {
        self.anchors.insert(anchor.id, anchor)
    }

    /// Insert a route under its own id, returning any route it replaced.
    pub fn insert_route(&mut self, route: Route) -> Option<Route> {
        self.routes.insert(route.id, route)
    }

    /// Insert a strip under its identity key, returning any strip it replaced.
    pub fn insert_strip(&mut self, strip: Strip) -> Option<Strip> {
        self.strips.insert(strip.key(), strip)
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn strip_count(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty() && self.routes.is_empty() && self.strips.is_empty()
    }

    /// Count entities by kind and anchors by class.
    pub fn stats(&self) -> NetworkStats {
        let mut stats = NetworkStats {
            routes: self.routes.len(),
            strips: self.strips.len(),
            ..NetworkStats::default()
        };
        for anchor in self.anchors.values() {
            match (anchor.is_sub_anchor(), anchor.is_water_anchor()) {
                (false, false) => stats.hub_land_anchors += 1,
                (false, true) => stats.hub_water_anchors += 1,
                (true, false) => stats.sub_land_anchors += 1,
                (true, true) => stats.sub_water_anchors += 1,
            }
        }
        stats
    }

    /// List every cross-reference that does not resolve.
    ///
    /// Strip endpoints only hold the low bits of an anchor id, so they are
    /// matched against anchors within that width.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();

        for route in self.routes.values() {
            for &anchor in &route.anchors {
                if !self.anchors.contains_key(&anchor) {
                    dangling.push(DanglingReference::RouteAnchor {
                        route: route.id,
                        anchor,
                    });
                }
            }
        }

        let source_ids: BTreeSet<u32> = self
            .anchors
            .keys()
            .map(|id| id & SOURCE_ANCHOR_MASK)
            .collect();
        let destination_ids: BTreeSet<u32> = self
            .anchors
            .keys()
            .map(|id| id & DESTINATION_ANCHOR_MASK)
            .collect();

        for (key, strip) in &self.strips {
            if !source_ids.contains(&strip.source_id()) {
                dangling.push(DanglingReference::StripSource {
                    strip: *key,
                    anchor: strip.source_id(),
                });
            }
            if !destination_ids.contains(&strip.destination_id()) {
                dangling.push(DanglingReference::StripDestination {
                    strip: *key,
                    anchor: strip.destination_id(),
                });
            }
            for &route in &strip.route_ids {
                if !self.routes.contains_key(&route) {
                    dangling.push(DanglingReference::StripRoute { strip: *key, route });
                }
            }
        }

        dangling
    }
}

/// Entity counts of a network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetworkStats {
    pub hub_land_anchors: usize,
    pub hub_water_anchors: usize,
    pub sub_land_anchors: usize,
    pub sub_water_anchors: usize,
    pub routes: usize,
    pub strips: usize,
}

impl NetworkStats {
    pub fn anchors(&self) -> usize {
        self.hub_land_anchors + self.hub_water_anchors + self.sub_land_anchors + self.sub_water_anchors
    }
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} anchors ({} hub land, {} hub water, {} sub land, {} sub water), {} routes, {} strips",
            self.anchors(),
            self.hub_land_anchors,
            self.hub_water_anchors,
            self.sub_land_anchors,
            self.sub_water_anchors,
            self.routes,
            self.strips
        )
    }
}

/// A reference that points at an entity missing from the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DanglingReference {
    RouteAnchor { route: u64, anchor: u32 },
    StripSource { strip: StripKey, anchor: u32 },
    StripDestination { strip: StripKey, anchor: u32 },
    StripRoute { strip: StripKey, route: u64 },
}

impl fmt::Display for DanglingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RouteAnchor { route, anchor } => {
                write!(f, "route {route} references missing anchor {anchor:#x}")
            }
            Self::StripSource { strip, anchor } => {
                write!(f, "strip {strip} starts at missing anchor {anchor:#x}")
            }
            Self::StripDestination { strip, anchor } => {
                write!(f, "strip {strip} ends at missing anchor {anchor:#x}")
            }
            Self::StripRoute { strip, route } => {
                write!(f, "strip {strip} carries missing route {route}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::SUB_ANCHOR_BIT;
    use crate::strip::StripType;

    fn small_network() -> Network {
        let mut net = Network::new();
        net.insert_anchor(Anchor::new(1, 0.0, 0.0));
        net.insert_anchor(Anchor::new(2, 10.0, 0.0));
        net.insert_route(Route::new(0x101, vec![1, 2]));
        net.insert_strip(Strip::new(StripType::DirtRoad, 1, 2, vec![0x101]));
        net
    }

    #[test]
    fn inserts_key_by_identity() {
        let net = small_network();
        assert_eq!(net.anchor_count(), 2);
        assert_eq!(net.route_count(), 1);
        let strip = net.strips().values().next().unwrap();
        assert_eq!(net.strips().keys().next(), Some(&strip.key()));
    }

    #[test]
    fn complete_network_has_no_dangling_references() {
        assert!(small_network().dangling_references().is_empty());
    }

    #[test]
    fn dangling_references_are_reported() {
        let mut net = small_network();
        net.insert_route(Route::new(0x201, vec![1, 77]));
        net.insert_strip(Strip::new(StripType::Railroad, 2, 88, vec![0x999]));
        let dangling = net.dangling_references();
        assert_eq!(dangling.len(), 3);
        assert!(dangling.contains(&DanglingReference::RouteAnchor { route: 0x201, anchor: 77 }));
        assert!(dangling
            .iter()
            .any(|d| matches!(d, DanglingReference::StripDestination { anchor: 88, .. })));
        assert!(dangling
            .iter()
            .any(|d| matches!(d, DanglingReference::StripRoute { route: 0x999, .. })));
    }

    #[test]
    fn sub_anchor_endpoint_resolves_within_field_width() {
        let mut net = Network::new();
        let sub = SUB_ANCHOR_BIT | 5;
        net.insert_anchor(Anchor::new(sub, 0.0, 0.0));
        net.insert_anchor(Anchor::new(6, 0.0, 0.0));
        net.insert_strip(Strip::new(StripType::DirtRoad, sub, sub, vec![]));
        net.insert_strip(Strip::new(StripType::DirtRoad, 6, 6, vec![]));
        assert!(net.dangling_references().is_empty());
    }

    #[test]
    fn dangling_check_scales_to_large_networks() {
        let mut net = Network::new();
        for index in 1..=20_000u32 {
            net.insert_anchor(Anchor::new(index, 0.0, 0.0));
            net.insert_strip(Strip::new(StripType::DirtRoad, index, 20_001 - index, vec![]));
        }
        net.insert_strip(Strip::new(StripType::DirtRoad, 1, 30_000, vec![]));
        assert_eq!(net.dangling_references().len(), 1);
    }

    #[test]
    fn stats_split_anchor_classes() {
        let mut net = small_network();
        net.insert_anchor(Anchor::new(SUB_ANCHOR_BIT | 3, 0.0, 0.0));
        let stats = net.stats();
        assert_eq!(stats.hub_land_anchors, 2);
        assert_eq!(stats.sub_land_anchors, 1);
        assert_eq!(stats.anchors(), 3);
        assert_eq!(stats.routes, 1);
        assert_eq!(stats.strips, 1);
    }

    #[test]
    fn empty_network() {
        let net = Network::new();
        assert!(net.is_empty());
        assert_eq!(net.stats(), NetworkStats::default());
    }
}
