//! `splnet.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use splnet_diff::DEFAULT_INDENT;

pub const CONFIG_FILE_NAME: &str = "splnet.toml";

/// Tool configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplnetConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub interchange: InterchangeConfig,
}

/// Default output paths, used when `-o` is not given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Written by `generate`.
    #[serde(default = "default_diff_output")]
    pub diff: PathBuf,
    /// Written by `full-merge`.
    #[serde(default = "default_network_output")]
    pub network: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            diff: default_diff_output(),
            network: default_network_output(),
        }
    }
}

fn default_diff_output() -> PathBuf {
    PathBuf::from("diff.json")
}

fn default_network_output() -> PathBuf {
    PathBuf::from("merged.splnet")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Level filter used when neither `RUST_LOG` nor a verbosity flag is set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterchangeConfig {
    /// Spaces per indent level in diff documents.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

impl Default for InterchangeConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
        }
    }
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

impl SplnetConfig {
    /// Search upward from `start_dir` for `splnet.toml`, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// The discovered configuration, or the defaults if there is none.
    pub fn load_or_default(start_dir: &Path) -> Result<Self> {
        Ok(Self::find_and_load(start_dir)?
            .map(|(config, _)| config)
            .unwrap_or_default())
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
