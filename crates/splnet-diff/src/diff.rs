//! Structural deltas between networks and the merging of several of them.

use std::fmt;

use serde::{Deserialize, Serialize};
use splnet_core::{Anchor, EntityKind, Network, Route, Strip, StripKey};
use tracing::{debug, info};

use crate::changes::{ChangeCounts, ItemChanges};
use crate::error::DiffError;
use crate::remap::{RemapTables, ReservedIds};

/// Additions, deletions and edits of every entity kind.
///
/// A diff is a plain value: computing one never touches the networks it was
/// computed from, and merging another diff in either fully succeeds or leaves
/// the accumulator as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diff {
    #[serde(default)]
    pub anchor_changes: ItemChanges<u32, Anchor>,
    #[serde(default)]
    pub strip_changes: ItemChanges<StripKey, Strip>,
    #[serde(default)]
    pub route_changes: ItemChanges<u64, Route>,
}

impl Diff {
    /// Compute the changes that turn `from` into `to`.
    pub fn between(from: &Network, to: &Network) -> Self {
        let diff = Self {
            anchor_changes: ItemChanges::between(from.anchors(), to.anchors()),
            strip_changes: ItemChanges::between(from.strips(), to.strips()),
            route_changes: ItemChanges::between(from.routes(), to.routes()),
        };
        debug!(summary = %diff.summary(), "computed diff");
        diff
    }

    /// The changes that build `network` from nothing: everything is an addition.
    pub fn from_empty(network: &Network) -> Self {
        Self::between(&Network::new(), network)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor_changes.is_empty() && self.strip_changes.is_empty() && self.route_changes.is_empty()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            anchors: self.anchor_changes.counts(),
            routes: self.route_changes.counts(),
            strips: self.strip_changes.counts(),
        }
    }

    /// Renumber the additions of `self` that collide with `reserved`.
    ///
    /// On a hub anchor collision nothing is modified.
    pub fn remap_collisions(&mut self, reserved: ReservedIds) -> Result<RemapTables, DiffError> {
        let tables = RemapTables::plan(self, reserved)?;
        tables.apply(self);
        Ok(tables)
    }

    /// Fold `incoming` into this accumulated diff.
    ///
    /// Additions of `incoming` that reuse an id this diff already adds are
    /// renumbered first, then each bucket is unioned in. Where both diffs hold
    /// an entry for the same key, the one already accumulated is kept.
    pub fn merge(&mut self, mut incoming: Diff) -> Result<RemapTables, DiffError> {
        let tables = incoming.remap_collisions(ReservedIds::from_additions(self))?;
        for (old, new) in tables.renumbered_anchors() {
            info!(old, new, "renumbered colliding sub-anchor");
        }
        for (old, new) in tables.renumbered_routes() {
            info!(old, new, "renumbered colliding route");
        }

        let Diff {
            anchor_changes,
            strip_changes,
            route_changes,
        } = incoming;
        self.anchor_changes.absorb(anchor_changes, EntityKind::Anchor);
        self.route_changes.absorb(route_changes, EntityKind::Route);
        self.strip_changes.absorb(strip_changes, EntityKind::Strip);
        Ok(tables)
    }

    /// Merge several diffs in order into one.
    pub fn merge_all<I>(diffs: I) -> Result<Diff, DiffError>
    where
        I: IntoIterator<Item = Diff>,
    {
        let mut accumulator = Diff::default();
        for (index, diff) in diffs.into_iter().enumerate() {
            debug!(source = index, summary = %diff.summary(), "merging diff");
            accumulator.merge(diff)?;
        }
        Ok(accumulator)
    }
}

/// Per-kind change counts of a [`Diff`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub anchors: ChangeCounts,
    pub routes: ChangeCounts,
    pub strips: ChangeCounts,
}

impl fmt::Display for DiffSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "anchors {}, routes {}, strips {}",
            self.anchors, self.routes, self.strips
        )
    }
}

#[cfg(test)]
mod tests {
    use splnet_core::anchor::SUB_ANCHOR_BIT;
    use splnet_core::StripType;

    use super::*;
    use crate::error::HubCollision;
    use crate::remap::LAND_SUB_ANCHOR_BASE;

    const SUB: u32 = SUB_ANCHOR_BIT | 2;

    fn network(anchors: &[Anchor], routes: &[Route], strips: &[Strip]) -> Network {
        let mut network = Network::new();
        for anchor in anchors {
            network.insert_anchor(*anchor);
        }
        for route in routes {
            network.insert_route(route.clone());
        }
        for strip in strips {
            network.insert_strip(strip.clone());
        }
        network
    }

    #[test]
    fn diff_of_a_network_with_itself_is_empty() {
        let n = network(
            &[Anchor::new(1, 1.0, 2.0), Anchor::new(SUB, 3.0, 4.0)],
            &[Route::new(0x101, vec![1, SUB])],
            &[Strip::new(StripType::DirtRoad, 1, SUB, vec![0x101])],
        );
        let diff = Diff::between(&n, &n);
        assert!(diff.is_empty());
        assert_eq!(diff.summary(), DiffSummary::default());
    }

    #[test]
    fn between_classifies_each_kind() {
        let from = network(&[Anchor::new(1, 0.0, 0.0), Anchor::new(2, 0.0, 0.0)], &[Route::new(0x101, vec![1])], &[]);
        let to = network(&[Anchor::new(1, 5.0, 0.0), Anchor::new(3, 0.0, 0.0)], &[Route::new(0x101, vec![1])], &[]);
        let diff = Diff::between(&from, &to);

        assert_eq!(diff.anchor_changes.edits.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(diff.anchor_changes.deletions.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(diff.anchor_changes.additions.keys().copied().collect::<Vec<_>>(), vec![3]);
        assert!(diff.route_changes.is_empty());
        assert_eq!(diff.summary().to_string(), "anchors +1 -1 ~1, routes +0 -0 ~0, strips +0 -0 ~0");
    }

    #[test]
    fn from_empty_adds_everything() {
        let n = network(&[Anchor::new(1, 0.0, 0.0)], &[Route::new(0x101, vec![1])], &[]);
        let diff = Diff::from_empty(&n);
        assert_eq!(diff.anchor_changes.additions.len(), 1);
        assert_eq!(diff.route_changes.additions.len(), 1);
        assert!(diff.anchor_changes.deletions.is_empty());
    }

    #[test]
    fn merge_renumbers_colliding_sub_anchor_and_its_references() {
        let mut acc = Diff::from_empty(&network(
            &[Anchor::new(SUB, 1.0, 1.0)],
            &[Route::new(0x501, vec![SUB])],
            &[],
        ));
        let incoming = Diff::from_empty(&network(
            &[Anchor::new(SUB, 9.0, 9.0)],
            &[Route::new(0x701, vec![SUB])],
            &[],
        ));

        let tables = acc.merge(incoming).unwrap();
        assert_eq!(tables.anchors[&SUB], LAND_SUB_ANCHOR_BASE);
        assert_eq!(acc.anchor_changes.additions.len(), 2);
        assert_eq!(acc.anchor_changes.additions[&SUB].pos_x, 1.0);
        assert_eq!(acc.anchor_changes.additions[&LAND_SUB_ANCHOR_BASE].pos_x, 9.0);
        assert_eq!(acc.route_changes.additions[&0x501].anchors, vec![SUB]);
        assert_eq!(acc.route_changes.additions[&0x701].anchors, vec![LAND_SUB_ANCHOR_BASE]);
    }

    #[test]
    fn merge_with_shared_hub_fails_and_leaves_accumulator_alone() {
        let mut acc = Diff::from_empty(&network(&[Anchor::new(1, 0.0, 0.0), Anchor::new(SUB, 0.0, 0.0)], &[], &[]));
        let before = acc.clone();
        let incoming = Diff::from_empty(&network(&[Anchor::new(1, 0.0, 0.0), Anchor::new(SUB, 7.0, 0.0)], &[], &[]));

        match acc.merge(incoming) {
            Err(DiffError::HubAnchorConflict { collisions }) => {
                assert_eq!(collisions, vec![HubCollision { id: 1 }]);
                assert_eq!(collisions[0].nice_id(), 1);
            }
            other => panic!("expected hub conflict, got {other:?}"),
        }
        assert_eq!(acc, before);
    }

    #[test]
    fn merge_all_accumulates_in_order() {
        let a = Diff::from_empty(&network(&[Anchor::new(1, 0.0, 0.0)], &[], &[]));
        let b = Diff::from_empty(&network(&[Anchor::new(2, 0.0, 0.0)], &[], &[]));
        let merged = Diff::merge_all([a, b]).unwrap();
        assert_eq!(merged.anchor_changes.additions.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert!(Diff::merge_all(Vec::new()).unwrap().is_empty());
    }
}
