//! `exportpub.toml` manifest parsing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE: &str = "exportpub.toml";

/// The top-level manifest structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportpubManifest {
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExportConfig {
    /// Globs over qualified names; empty exports every public declaration.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Segment separator the globs are written against.
    #[serde(default = "default_separator")]
    pub separator: char,
    /// Validate property value types, not just getter receivers.
    #[serde(default = "default_true")]
    pub check_property_types: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            separator: default_separator(),
            check_property_types: true,
        }
    }
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level when neither `RUST_LOG` nor a verbosity flag is given.
    #[serde(default)]
    pub level: Option<String>,
}

fn default_separator() -> char {
    '.'
}

fn default_true() -> bool {
    true
}

impl ExportpubManifest {
    /// Search upward from `start_dir` for an `exportpub.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest = Self::parse(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub fn parse(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Split a pattern list joined with the platform path separator (`:` on
/// Unix, `;` on Windows), dropping blank entries.
pub fn split_pattern_option(value: &str) -> Vec<String> {
    std::env::split_paths(value)
        .map(|p| p.to_string_lossy().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}
