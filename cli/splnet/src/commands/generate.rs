//! `splnet generate` — write the diff between two networks.

use std::path::Path;

use anyhow::{Context, Result};
use splnet_diff::{write_diff, Diff};

use super::{check_inputs, load_network, output_path};
use crate::config::SplnetConfig;

pub fn run(base: &Path, edited: &Path, output: Option<&Path>, config: &SplnetConfig) -> Result<()> {
    check_inputs(&[base, edited])?;
    let from = load_network(base)?;
    let to = load_network(edited)?;

    let diff = Diff::between(&from, &to);
    println!("Changes: {}", diff.summary());

    let output = output_path(output, &config.output.diff);
    write_diff(&output, &diff, config.interchange.indent)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {}", output.display());
    Ok(())
}
