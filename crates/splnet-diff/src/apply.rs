//! Applying a diff to a live network.
//!
//! Application runs on a staged copy of the network, in three passes per
//! entity kind: edits, then deletions, then additions. Stale state found along
//! the way is reported as an [`ApplyWarning`] and does not stop the run; a
//! hub anchor conflict or an addition whose id is still taken aborts it, and
//! the caller's network is left untouched.

use std::collections::BTreeMap;
use std::fmt;

use splnet_core::{EntityKind, Network};
use tracing::{info, warn};

use crate::changes::ItemChanges;
use crate::diff::Diff;
use crate::error::DiffError;
use crate::remap::{RemapTables, ReservedIds};

/// What went wrong with one stale entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleState {
    /// An edited entity was not in the network; the new value was inserted.
    EditedMissing,
    /// An edited entity differed from the recorded old value; it was
    /// overwritten anyway.
    EditedDrifted,
    /// A deleted entity was not in the network.
    DeletedMissing,
    /// A deleted entity differed from the recorded old value; it was kept.
    DeletedDrifted,
}

impl fmt::Display for StaleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StaleState::EditedMissing => "edited entry is missing from the network, inserting the new value",
            StaleState::EditedDrifted => "edited entry changed since the diff was made, overwriting it",
            StaleState::DeletedMissing => "deleted entry is already gone, skipping",
            StaleState::DeletedDrifted => "deleted entry changed since the diff was made, keeping it",
        };
        f.write_str(text)
    }
}

/// A non-fatal mismatch between a diff and the network it was applied to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyWarning {
    pub kind: EntityKind,
    /// The entity's key as it appears in interchange documents.
    pub key: String,
    /// One-line description of the entity.
    pub entity: String,
    pub issue: StaleState,
}

impl fmt::Display for ApplyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.entity, self.issue)
    }
}

/// Outcome of a successful [`apply_diff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Renumbering applied to the diff's additions before insertion.
    pub remap: RemapTables,
    pub warnings: Vec<ApplyWarning>,
}

/// Apply `diff` to `network`.
///
/// Additions are first renumbered against the ids live in `network`. On
/// error `network` is unchanged.
pub fn apply_diff(network: &mut Network, mut diff: Diff) -> Result<ApplyReport, DiffError> {
    let remap = diff.remap_collisions(ReservedIds::from_network(network))?;

    let mut staged = network.clone();
    let mut warnings = Vec::new();

    let Diff {
        anchor_changes,
        strip_changes,
        route_changes,
    } = diff;
    apply_changes(staged.anchors_mut(), anchor_changes, EntityKind::Anchor, &mut warnings)?;
    apply_changes(staged.routes_mut(), route_changes, EntityKind::Route, &mut warnings)?;
    apply_changes(staged.strips_mut(), strip_changes, EntityKind::Strip, &mut warnings)?;

    *network = staged;
    info!(
        warnings = warnings.len(),
        anchors = network.anchor_count(),
        routes = network.route_count(),
        strips = network.strip_count(),
        "applied diff"
    );
    Ok(ApplyReport { remap, warnings })
}

fn apply_changes<K, T>(
    live: &mut BTreeMap<K, T>,
    changes: ItemChanges<K, T>,
    kind: EntityKind,
    warnings: &mut Vec<ApplyWarning>,
) -> Result<(), DiffError>
where
    K: Ord + fmt::Display,
    T: PartialEq + fmt::Display,
{
    let mut stale = |key: &K, entity: &T, issue: StaleState| {
        let warning = ApplyWarning {
            kind,
            key: key.to_string(),
            entity: entity.to_string(),
            issue,
        };
        warn!(%kind, key = %warning.key, "{warning}");
        warnings.push(warning);
    };

    for (key, (old, new)) in changes.edits {
        match live.get(&key) {
            None => stale(&key, &new, StaleState::EditedMissing),
            Some(current) if *current != old => stale(&key, current, StaleState::EditedDrifted),
            Some(_) => {}
        }
        live.insert(key, new);
    }

    for (key, old) in changes.deletions {
        match live.get(&key) {
            None => stale(&key, &old, StaleState::DeletedMissing),
            Some(current) if *current != old => stale(&key, current, StaleState::DeletedDrifted),
            Some(_) => {
                live.remove(&key);
            }
        }
    }

    for (key, new) in changes.additions {
        if live.contains_key(&key) {
            return Err(DiffError::DuplicateInsertion {
                kind,
                key: key.to_string(),
            });
        }
        live.insert(key, new);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use splnet_core::anchor::SUB_ANCHOR_BIT;
    use splnet_core::strip::SOURCE_ANCHOR_MASK;
    use splnet_core::{Anchor, Route, Strip, StripType};

    use super::*;
    use crate::remap::LAND_SUB_ANCHOR_BASE;

    const SUB: u32 = SUB_ANCHOR_BIT | 2;

    fn base() -> Network {
        let mut network = Network::new();
        network.insert_anchor(Anchor::new(1, 0.0, 0.0));
        network.insert_anchor(Anchor::new(2, 10.0, 0.0));
        network.insert_route(Route::new(0x101, vec![1, 2]));
        network.insert_strip(Strip::new(StripType::DirtRoad, 1, 2, vec![0x101]));
        network
    }

    #[test]
    fn applying_a_diff_reproduces_the_target() {
        let from = base();
        let mut to = base();
        to.anchors_mut().remove(&2);
        to.insert_anchor(Anchor::new(3, 5.0, 5.0));
        to.insert_anchor(Anchor::new(1, 1.0, 1.0));
        to.insert_route(Route::new(0x101, vec![1, 3]));
        to.strips_mut().clear();
        to.insert_strip(Strip::new(StripType::Railroad, 1, 3, vec![0x101]));

        let mut network = from.clone();
        let report = apply_diff(&mut network, Diff::between(&from, &to)).unwrap();
        assert_eq!(network, to);
        assert!(report.warnings.is_empty());
        assert!(report.remap.is_identity());
    }

    #[test]
    fn missing_edit_target_is_inserted_with_a_warning() {
        let mut diff = Diff::default();
        diff.anchor_changes
            .edits
            .insert(9, (Anchor::new(9, 0.0, 0.0), Anchor::new(9, 1.0, 1.0)));

        let mut network = base();
        let report = apply_diff(&mut network, diff).unwrap();
        assert_eq!(network.anchors()[&9], Anchor::new(9, 1.0, 1.0));
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].issue, StaleState::EditedMissing);
        assert_eq!(report.warnings[0].kind, EntityKind::Anchor);
        assert_eq!(report.warnings[0].key, "9");
    }

    #[test]
    fn drifted_edit_overwrites_with_a_warning() {
        let mut diff = Diff::default();
        diff.route_changes.edits.insert(
            0x101,
            (Route::new(0x101, vec![2, 1]), Route::new(0x101, vec![1])),
        );

        let mut network = base();
        let report = apply_diff(&mut network, diff).unwrap();
        assert_eq!(network.routes()[&0x101].anchors, vec![1]);
        assert_eq!(report.warnings[0].issue, StaleState::EditedDrifted);
    }

    #[test]
    fn stale_deletions_are_skipped() {
        let mut diff = Diff::default();
        diff.anchor_changes.deletions.insert(2, Anchor::new(2, 99.0, 0.0));
        diff.anchor_changes.deletions.insert(7, Anchor::new(7, 0.0, 0.0));

        let mut network = base();
        let report = apply_diff(&mut network, diff).unwrap();
        assert!(network.anchors().contains_key(&2));
        let issues: Vec<_> = report.warnings.iter().map(|w| w.issue).collect();
        assert_eq!(issues, vec![StaleState::DeletedDrifted, StaleState::DeletedMissing]);
    }

    #[test]
    fn edit_runs_before_deletion_of_the_same_id() {
        let original = Anchor::new(2, 10.0, 0.0);
        let edited = Anchor::new(2, 11.0, 0.0);
        let mut diff = Diff::default();
        diff.anchor_changes.edits.insert(2, (original, edited));
        diff.anchor_changes.deletions.insert(2, original);

        let mut network = base();
        let report = apply_diff(&mut network, diff).unwrap();

        // The deletion now sees the edited value and is skipped.
        assert_eq!(network.anchors()[&2], edited);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].issue, StaleState::DeletedDrifted);
    }

    #[test]
    fn addition_reusing_an_edited_route_id_is_renumbered() {
        let mut diff = Diff::default();
        diff.route_changes.edits.insert(
            0x101,
            (Route::new(0x101, vec![1, 2]), Route::new(0x101, vec![2, 1])),
        );
        diff.route_changes.additions.insert(0x101, Route::new(0x101, vec![1]));

        let mut network = base();
        // The addition collides with the live route and is renumbered first.
        let report = apply_diff(&mut network, diff).unwrap();
        let renumbered = report.remap.routes[&0x101];
        assert_ne!(renumbered, 0x101);
        assert_eq!(network.routes()[&0x101].anchors, vec![2, 1]);
        assert_eq!(network.routes()[&renumbered].anchors, vec![1]);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn sub_anchor_strip_source_is_renumbered_against_the_network() {
        let mut network = base();
        network.insert_anchor(Anchor::new(SUB, 0.0, 0.0));

        let mut diff = Diff::default();
        diff.anchor_changes.additions.insert(SUB, Anchor::new(SUB, 4.0, 4.0));
        let strip = Strip::new(StripType::Railroad, SUB, 2, vec![]);
        diff.strip_changes.additions.insert(strip.key(), strip);

        apply_diff(&mut network, diff).unwrap();
        assert_eq!(network.strip_count(), 2);
        assert!(network
            .strips()
            .values()
            .any(|s| s.strip_type() == Some(StripType::Railroad)
                && s.source_id() == LAND_SUB_ANCHOR_BASE & SOURCE_ANCHOR_MASK));
        assert!(network.dangling_references().is_empty());
    }

    #[test]
    fn colliding_sub_anchor_addition_is_renumbered_against_the_network() {
        let mut network = base();
        network.insert_anchor(Anchor::new(SUB, 0.0, 0.0));

        let mut diff = Diff::default();
        diff.anchor_changes.additions.insert(SUB, Anchor::new(SUB, 4.0, 4.0));
        diff.route_changes
            .additions
            .insert(0x201, Route::new(0x201, vec![1, SUB]));

        let report = apply_diff(&mut network, diff).unwrap();
        assert_eq!(network.anchors()[&LAND_SUB_ANCHOR_BASE].pos_x, 4.0);
        assert_eq!(network.routes()[&0x201].anchors, vec![1, LAND_SUB_ANCHOR_BASE]);
        assert!(network.dangling_references().is_empty());
        assert!(!report.remap.is_identity());
    }

    #[test]
    fn hub_collision_leaves_network_untouched() {
        let mut network = base();
        let before = network.clone();
        let mut diff = Diff::default();
        diff.anchor_changes.edits.insert(2, (Anchor::new(2, 10.0, 0.0), Anchor::new(2, 0.0, 0.0)));
        diff.anchor_changes.additions.insert(1, Anchor::new(1, 3.0, 3.0));

        let err = apply_diff(&mut network, diff).unwrap_err();
        assert!(matches!(err, DiffError::HubAnchorConflict { .. }));
        assert_eq!(network, before);
    }

    #[test]
    fn strip_addition_still_taken_is_a_duplicate_insertion() {
        // Strips are never renumbered, so re-adding an existing strip collides.
        let mut network = base();
        let before = network.clone();
        let strip = Strip::new(StripType::DirtRoad, 1, 2, vec![]);
        let mut diff = Diff::default();
        diff.anchor_changes.additions.insert(5, Anchor::new(5, 0.0, 0.0));
        diff.strip_changes.additions.insert(strip.key(), strip);

        let err = apply_diff(&mut network, diff).unwrap_err();
        assert!(matches!(err, DiffError::DuplicateInsertion { kind: EntityKind::Strip, .. }));
        assert_eq!(network, before);
    }

    #[test]
    fn warning_display_names_the_entity() {
        let warning = ApplyWarning {
            kind: EntityKind::Anchor,
            key: "3".into(),
            entity: Anchor::new(3, 0.0, 0.0).to_string(),
            issue: StaleState::DeletedMissing,
        };
        assert_eq!(warning.to_string(), "Anchor #3 (hub, land): deleted entry is already gone, skipping");
    }
}
