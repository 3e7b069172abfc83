//! CLI command implementations.

pub mod apply;
pub mod full_merge;
pub mod generate;
pub mod merge;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use splnet_core::Network;
use splnet_format::NetworkFile;
use tracing::{info, warn};

/// Fail if any input is missing, naming every missing path.
///
/// Runs before anything is parsed.
pub(crate) fn check_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    let mut missing = Vec::new();
    for path in paths {
        let path: &Path = path.as_ref();
        if !path.is_file() {
            missing.push(path.display().to_string());
        }
    }
    if !missing.is_empty() {
        bail!("input file not found: {}", missing.join(", "));
    }
    Ok(())
}

pub(crate) fn load_network(path: &Path) -> Result<Network> {
    let file = NetworkFile::load(path).with_context(|| format!("loading {}", path.display()))?;
    info!(path = %path.display(), stats = %file.network.stats(), "loaded network");
    Ok(file.network)
}

/// Write `network` to `path`, reporting any references that do not resolve.
pub(crate) fn save_network(network: Network, path: &Path) -> Result<()> {
    for dangling in network.dangling_references() {
        warn!(%dangling, "unresolved reference in output network");
    }
    let stats = network.stats();
    NetworkFile::new(network)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} ({stats})", path.display());
    Ok(())
}

/// `explicit` if given, else `fallback`.
pub(crate) fn output_path(explicit: Option<&Path>, fallback: &Path) -> PathBuf {
    explicit.unwrap_or(fallback).to_path_buf()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_inputs_names_every_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let present = testing::write(dir.path(), "present.splnet", Network::new());
        let first = dir.path().join("first.splnet");
        let second = dir.path().join("second.splnet");

        check_inputs(&[&present]).unwrap();
        let err = check_inputs(&[&first, &present, &second]).unwrap_err().to_string();
        assert!(err.contains("first.splnet"));
        assert!(err.contains("second.splnet"));
        assert!(!err.contains("present.splnet"));
    }

    #[test]
    fn load_failure_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.splnet");
        std::fs::write(&path, [0xee, 0x00, 0x01]).unwrap();
        let err = load_network(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.splnet"));
    }

    #[test]
    fn output_path_prefers_explicit() {
        let fallback = Path::new("fallback.json");
        assert_eq!(output_path(None, fallback), PathBuf::from("fallback.json"));
        assert_eq!(output_path(Some(Path::new("x.json")), fallback), PathBuf::from("x.json"));
    }
}
