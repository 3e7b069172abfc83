//! `splnet merge` — fold several edited copies of a network back into it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use splnet_diff::{apply_diff, Diff};
use tracing::debug;

use super::{check_inputs, load_network, output_path, save_network};

/// Diff every edited copy against `base`, merge the diffs in order and apply
/// the result to `base`. `base` is overwritten unless `output` is given.
pub fn run(base: &Path, edited: &[PathBuf], output: Option<&Path>) -> Result<()> {
    let mut inputs = vec![base.to_path_buf()];
    inputs.extend_from_slice(edited);
    check_inputs(&inputs)?;

    let mut network = load_network(base)?;

    let mut merged = Diff::default();
    for path in edited {
        let diff = Diff::between(&network, &load_network(path)?);
        debug!(path = %path.display(), summary = %diff.summary(), "diffed against base");
        merged
            .merge(diff)
            .with_context(|| format!("merging changes from {}", path.display()))?;
    }
    println!("Changes: {}", merged.summary());

    apply_diff(&mut network, merged).context("applying merged changes")?;
    save_network(network, &output_path(output, base))
}
