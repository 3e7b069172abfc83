//! `splnet apply` — apply a diff document to a network.

use std::path::Path;

use anyhow::{Context, Result};
use splnet_diff::{apply_diff, read_diff};

use super::{check_inputs, load_network, output_path, save_network};

/// Apply the diff at `diff_path` to `base`, overwriting `base` unless
/// `output` is given.
pub fn run(base: &Path, diff_path: &Path, output: Option<&Path>) -> Result<()> {
    check_inputs(&[base, diff_path])?;
    let mut network = load_network(base)?;
    let diff = read_diff(diff_path).with_context(|| format!("reading {}", diff_path.display()))?;

    let report = apply_diff(&mut network, diff)
        .with_context(|| format!("applying {} to {}", diff_path.display(), base.display()))?;
    if !report.warnings.is_empty() {
        println!("Applied with {} warning(s)", report.warnings.len());
    }

    save_network(network, &output_path(output, base))
}

#[cfg(test)]
mod tests {
    use splnet_core::Anchor;
    use splnet_diff::{write_diff, Diff, DEFAULT_INDENT};

    use super::*;
    use crate::commands::testing;

    #[test]
    fn overwrites_base_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let base = testing::write(dir.path(), "base.splnet", testing::base());
        let diff_path = dir.path().join("diff.json");
        let diff = Diff::between(&testing::base(), &testing::edited(3.0, 0x201));
        write_diff(&diff_path, &diff, DEFAULT_INDENT).unwrap();

        run(&base, &diff_path, None).unwrap();
        assert_eq!(testing::read(&base), testing::edited(3.0, 0x201));
    }

    #[test]
    fn writes_to_output_and_leaves_base_alone() {
        let dir = tempfile::tempdir().unwrap();
        let base = testing::write(dir.path(), "base.splnet", testing::base());
        let out = dir.path().join("out.splnet");
        let diff_path = dir.path().join("diff.json");
        let diff = Diff::between(&testing::base(), &testing::edited(3.0, 0x201));
        write_diff(&diff_path, &diff, DEFAULT_INDENT).unwrap();

        run(&base, &diff_path, Some(out.as_path())).unwrap();
        assert_eq!(testing::read(&base), testing::base());
        assert_eq!(testing::read(&out), testing::edited(3.0, 0x201));
    }

    #[test]
    fn hub_conflict_aborts_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let base = testing::write(dir.path(), "base.splnet", testing::base());
        let out = dir.path().join("out.splnet");
        let diff_path = dir.path().join("diff.json");
        let mut diff = Diff::default();
        diff.anchor_changes.additions.insert(1, Anchor::new(1, 9.0, 9.0));
        write_diff(&diff_path, &diff, DEFAULT_INDENT).unwrap();

        let err = run(&base, &diff_path, Some(out.as_path())).unwrap_err();
        assert!(format!("{err:#}").contains("hub anchor #1"));
        assert!(!out.exists());
    }

    #[test]
    fn malformed_diff_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = testing::write(dir.path(), "base.splnet", testing::base());
        let diff_path = dir.path().join("diff.json");
        std::fs::write(&diff_path, "{").unwrap();

        let err = run(&base, &diff_path, None).unwrap_err();
        assert!(format!("{err:#}").contains("diff.json"));
    }
}
