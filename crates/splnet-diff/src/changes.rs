//! Per-kind change sets.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use splnet_core::EntityKind;
use tracing::warn;

/// Every change to one entity kind between two networks.
///
/// Old values are kept alongside new ones so that applying the changes can
/// check it is replacing the version the diff was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize, T: Serialize",
    deserialize = "K: Ord + Deserialize<'de>, T: Deserialize<'de>"
))]
pub struct ItemChanges<K: Ord, T> {
    #[serde(default)]
    pub deletions: BTreeMap<K, T>,
    #[serde(default)]
    pub additions: BTreeMap<K, T>,
    /// `(old, new)` pairs.
    #[serde(default)]
    pub edits: BTreeMap<K, (T, T)>,
}

impl<K: Ord, T> Default for ItemChanges<K, T> {
    fn default() -> Self {
        Self {
            deletions: BTreeMap::new(),
            additions: BTreeMap::new(),
            edits: BTreeMap::new(),
        }
    }
}

impl<K, T> ItemChanges<K, T>
where
    K: Ord + Clone + Display,
    T: Clone + PartialEq,
{
    /// Classify every key of `from` and `to`.
    ///
    /// Keys in both maps with unequal values become edits, keys only in
    /// `from` deletions, and keys only in `to` additions.
    pub fn between(from: &BTreeMap<K, T>, to: &BTreeMap<K, T>) -> Self {
        let mut changes = Self::default();

        for (key, old) in from {
            match to.get(key) {
                Some(new) if new != old => {
                    changes.edits.insert(key.clone(), (old.clone(), new.clone()));
                }
                Some(_) => {}
                None => {
                    changes.deletions.insert(key.clone(), old.clone());
                }
            }
        }
        for (key, new) in to {
            if !from.contains_key(key) {
                changes.additions.insert(key.clone(), new.clone());
            }
        }

        changes
    }

    /// Union `other` into `self`, bucket by bucket.
    ///
    /// Where both sides hold the same key the existing entry is kept. Keys
    /// whose values disagree are logged and dropped from `other`.
    pub fn absorb(&mut self, other: Self, kind: EntityKind) {
        absorb_bucket(&mut self.deletions, other.deletions, kind, "deletion");
        absorb_bucket(&mut self.additions, other.additions, kind, "addition");
        absorb_bucket(&mut self.edits, other.edits, kind, "edit");
    }
}

impl<K: Ord, T> ItemChanges<K, T> {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.additions.is_empty() && self.edits.is_empty()
    }

    pub fn counts(&self) -> ChangeCounts {
        ChangeCounts {
            deletions: self.deletions.len(),
            additions: self.additions.len(),
            edits: self.edits.len(),
        }
    }
}

fn absorb_bucket<K, V>(into: &mut BTreeMap<K, V>, from: BTreeMap<K, V>, kind: EntityKind, bucket: &str)
where
    K: Ord + Display,
    V: PartialEq,
{
    for (key, value) in from {
        match into.get(&key) {
            None => {
                into.insert(key, value);
            }
            Some(existing) if *existing != value => {
                warn!(%kind, %key, bucket, "conflicting change from a later source dropped");
            }
            Some(_) => {}
        }
    }
}

/// Sizes of the three buckets of an [`ItemChanges`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub deletions: usize,
    pub additions: usize,
    pub edits: usize,
}

impl std::fmt::Display for ChangeCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "+{} -{} ~{}",
            self.additions, self.deletions, self.edits
        )
    }
}
