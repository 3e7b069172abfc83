//! Collision remapping of newly added sub-anchors and routes.
//!
//! Two sources edited independently may each add a sub-anchor or route under
//! the same numeric id. Before their additions can share one map, the
//! incoming side's colliding ids are renumbered and every reference to them
//! inside the incoming diff is rewritten.
//!
//! Only additions are renumbered. Deletions and edits name entities that
//! already existed in the source's base network, whose ids are shared by all
//! sources.
//!
//! | Entity      | On collision                                            |
//! |-------------|---------------------------------------------------------|
//! | hub anchor  | fatal: reported and the whole operation is refused      |
//! | sub-anchor  | next free id counting up from the land or water base    |
//! | route       | next free index for the id's type byte                  |

use std::collections::{BTreeMap, BTreeSet};

use splnet_core::anchor::{is_water_anchor_id, SUB_ANCHOR_BIT, WATER_ANCHOR_BIT};
use splnet_core::route::route_type_byte;
use splnet_core::strip::{DESTINATION_ANCHOR_MASK, SOURCE_ANCHOR_MASK};
use splnet_core::{Network, StripKey};
use tracing::{debug, error, warn};

use crate::diff::Diff;
use crate::error::{DiffError, HubCollision};

/// First id tried for a renumbered land sub-anchor.
pub const LAND_SUB_ANCHOR_BASE: u32 = SUB_ANCHOR_BIT | 1;

/// First id tried for a renumbered water sub-anchor.
pub const WATER_SUB_ANCHOR_BASE: u32 = SUB_ANCHOR_BIT | WATER_ANCHOR_BIT | 1;

/// First index tried for a renumbered route, per type byte.
pub const ROUTE_INDEX_BASE: u64 = 1;

/// Identifiers an incoming diff must not add under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedIds {
    pub anchors: BTreeSet<u32>,
    pub routes: BTreeSet<u64>,
}

impl ReservedIds {
    /// Ids added by an accumulated diff.
    pub fn from_additions(diff: &Diff) -> Self {
        Self {
            anchors: diff.anchor_changes.additions.keys().copied().collect(),
            routes: diff.route_changes.additions.keys().copied().collect(),
        }
    }

    /// Ids live in a network.
    pub fn from_network(network: &Network) -> Self {
        Self {
            anchors: network.anchors().keys().copied().collect(),
            routes: network.routes().keys().copied().collect(),
        }
    }
}

/// Old id to new id for every addition of a diff.
///
/// Untouched additions map to themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapTables {
    pub anchors: BTreeMap<u32, u32>,
    pub routes: BTreeMap<u64, u64>,
}

impl RemapTables {
    /// Work out new ids for the additions of `diff` that collide with
    /// `reserved`.
    ///
    /// Every colliding hub anchor is logged before the error is returned;
    /// `diff` itself is never modified.
    pub fn plan(diff: &Diff, reserved: ReservedIds) -> Result<Self, DiffError> {
        let ReservedIds {
            anchors: reserved_anchors,
            routes: reserved_routes,
        } = reserved;

        // New ids must avoid both the reserved ids and every id the diff
        // itself adds.
        let mut taken_anchors = reserved_anchors.clone();
        taken_anchors.extend(diff.anchor_changes.additions.keys().copied());

        let mut anchors = BTreeMap::new();
        let mut collisions = Vec::new();
        let mut next_land = LAND_SUB_ANCHOR_BASE;
        let mut next_water = WATER_SUB_ANCHOR_BASE;

        for (&id, anchor) in &diff.anchor_changes.additions {
            if !reserved_anchors.contains(&id) {
                anchors.insert(id, id);
                continue;
            }

            if anchor.is_hub_anchor() {
                let collision = HubCollision { id };
                error!(
                    nice_id = collision.nice_id(),
                    water = collision.is_water(),
                    "hub anchor is added by more than one source; which to keep is ambiguous"
                );
                collisions.push(collision);
                continue;
            }

            let next = if is_water_anchor_id(id) {
                &mut next_water
            } else {
                &mut next_land
            };
            while taken_anchors.contains(&*next) {
                *next += 1;
            }
            let new_id = *next;
            taken_anchors.insert(new_id);
            debug!(old = id, new = new_id, "renumbered sub-anchor");
            anchors.insert(id, new_id);
        }

        if !collisions.is_empty() {
            return Err(DiffError::HubAnchorConflict { collisions });
        }

        let mut taken_routes = reserved_routes.clone();
        taken_routes.extend(diff.route_changes.additions.keys().copied());

        let mut routes = BTreeMap::new();
        let mut next_index: BTreeMap<u8, u64> = BTreeMap::new();

        for &id in diff.route_changes.additions.keys() {
            if !reserved_routes.contains(&id) {
                routes.insert(id, id);
                continue;
            }

            let type_byte = route_type_byte(id);
            let index = next_index.entry(type_byte).or_insert(ROUTE_INDEX_BASE);
            while taken_routes.contains(&route_id(*index, type_byte)) {
                *index += 1;
            }
            let new_id = route_id(*index, type_byte);
            taken_routes.insert(new_id);
            debug!(old = id, new = new_id, "renumbered route");
            routes.insert(id, new_id);
        }

        Ok(Self { anchors, routes })
    }

    /// Whether no addition changes id.
    pub fn is_identity(&self) -> bool {
        self.anchors.iter().all(|(old, new)| old == new)
            && self.routes.iter().all(|(old, new)| old == new)
    }

    /// Anchors that received a new id, as `(old, new)`.
    pub fn renumbered_anchors(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.anchors
            .iter()
            .filter(|(old, new)| old != new)
            .map(|(&old, &new)| (old, new))
    }

    /// Routes that received a new id, as `(old, new)`.
    pub fn renumbered_routes(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.routes
            .iter()
            .filter(|(old, new)| old != new)
            .map(|(&old, &new)| (old, new))
    }

    /// Rewrite `diff` with these tables.
    ///
    /// Addition keys and ids are replaced, and the new ids are propagated to
    /// route anchor lists, strip endpoints and strip route lists. The new side
    /// of edits is rewritten too, since an edited route or strip may point at
    /// something its own source added.
    pub fn apply(&self, diff: &mut Diff) {
        let anchors = std::mem::take(&mut diff.anchor_changes.additions);
        diff.anchor_changes.additions = anchors
            .into_iter()
            .map(|(id, mut anchor)| {
                anchor.id = self.anchors.get(&id).copied().unwrap_or(id);
                (anchor.id, anchor)
            })
            .collect();

        let routes = std::mem::take(&mut diff.route_changes.additions);
        diff.route_changes.additions = routes
            .into_iter()
            .map(|(id, mut route)| {
                route.id = self.routes.get(&id).copied().unwrap_or(id);
                route.remap_anchors(&self.anchors);
                (route.id, route)
            })
            .collect();
        for (_, new) in diff.route_changes.edits.values_mut() {
            new.remap_anchors(&self.anchors);
        }

        let sources = endpoint_index(&self.anchors, SOURCE_ANCHOR_MASK);
        let destinations = endpoint_index(&self.anchors, DESTINATION_ANCHOR_MASK);
        let strips = std::mem::take(&mut diff.strip_changes.additions);
        let mut rekeyed: BTreeMap<StripKey, _> = BTreeMap::new();
        for (key, mut strip) in strips {
            if let Some(new_id) = remap_endpoint(&sources, strip.source_id(), key, "source") {
                strip.set_source_id(new_id);
            }
            if let Some(new_id) = remap_endpoint(&destinations, strip.destination_id(), key, "destination") {
                strip.set_destination_id(new_id);
            }
            strip.remap_routes(&self.routes);
            let key = strip.key();
            if rekeyed.insert(key, strip).is_some() {
                warn!(%key, "two added strips share an identity after remapping; keeping the later one");
            }
        }
        diff.strip_changes.additions = rekeyed;
        for (_, new) in diff.strip_changes.edits.values_mut() {
            new.remap_routes(&self.routes);
        }
    }
}

/// Anchor table entries grouped by the bits of their old id that fit in a
/// strip endpoint field of width `mask`.
fn endpoint_index(anchors: &BTreeMap<u32, u32>, mask: u32) -> BTreeMap<u32, Vec<(u32, u32)>> {
    let mut index: BTreeMap<u32, Vec<(u32, u32)>> = BTreeMap::new();
    for (&old, &new) in anchors {
        index.entry(old & mask).or_default().push((old, new));
    }
    index
}

/// New anchor id for a strip endpoint field, if it refers to a renumbered
/// anchor.
///
/// Endpoint fields drop the high bits of the anchor id, so several added
/// anchors can share one field value. That case is logged and the endpoint is
/// left as it is.
fn remap_endpoint(
    index: &BTreeMap<u32, Vec<(u32, u32)>>,
    field: u32,
    strip: StripKey,
    end: &str,
) -> Option<u32> {
    match index.get(&field).map(Vec::as_slice) {
        Some([(old, new)]) if old != new => Some(*new),
        Some(candidates) if candidates.len() > 1 && candidates.iter().any(|(old, new)| old != new) => {
            warn!(
                %strip,
                end,
                field,
                "strip endpoint matches several added anchors; leaving it unchanged"
            );
            None
        }
        _ => None,
    }
}

/// Compose a route id from an index and a type byte.
pub const fn route_id(index: u64, type_byte: u8) -> u64 {
    (index << 8) | type_byte as u64
}
