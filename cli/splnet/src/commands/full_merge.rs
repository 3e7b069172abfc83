//! `splnet full-merge` — combine whole networks into a new one.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use splnet_core::Network;
use splnet_diff::{apply_diff, Diff};

use super::{check_inputs, load_network, output_path, save_network};
use crate::config::SplnetConfig;

/// Merge every network in `networks`, in order, into an empty one.
pub fn run(networks: &[PathBuf], output: Option<&Path>, config: &SplnetConfig) -> Result<()> {
    check_inputs(networks)?;

    let mut merged = Diff::default();
    for path in networks {
        let diff = Diff::from_empty(&load_network(path)?);
        merged
            .merge(diff)
            .with_context(|| format!("merging {}", path.display()))?;
    }
    println!("Changes: {}", merged.summary());

    let mut network = Network::new();
    apply_diff(&mut network, merged).context("building merged network")?;
    save_network(network, &output_path(output, &config.output.network))
}
