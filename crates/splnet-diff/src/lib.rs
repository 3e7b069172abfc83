//! Diff, merge and apply for spline networks.
//!
//! A [`Diff`] records, per entity kind, which entries one network adds,
//! removes and changes relative to another. Diffs from independently edited
//! copies of a base network can be merged into one and applied back to the
//! base; additions from different sources that happen to reuse the same
//! sub-anchor or route id are renumbered on the way (see [`remap`]).
//!
//! ```text
//! base ──┬── edited A ──> diff(base, A) ──┐
//!        └── edited B ──> diff(base, B) ──┴─> merge ──> apply(base) ──> merged
//! ```

pub mod apply;
pub mod changes;
pub mod diff;
pub mod error;
pub mod interchange;
pub mod remap;

pub use apply::{apply_diff, ApplyReport, ApplyWarning, StaleState};
pub use changes::{ChangeCounts, ItemChanges};
pub use diff::{Diff, DiffSummary};
pub use error::{DiffError, HubCollision};
pub use interchange::{from_json, read_diff, to_json_pretty, write_diff, DEFAULT_INDENT};
pub use remap::{RemapTables, ReservedIds};
