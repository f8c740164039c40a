//! Configuration stored under `.prd/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::prd_store::DocumentFormat;
use super::write_atomic;
use crate::core::merge::MergeOptions;
use crate::core::vocabulary::SIMILARITY_THRESHOLD;

/// Project configuration (TOML).
///
/// Edited by humans; missing fields fall back to defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PrdConfig {
    /// Format for a newly created document when none exists.
    pub format: DocumentFormat,

    pub merge: MergeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MergeConfig {
    /// Jaccard score a completed item must exceed to match a baseline entry.
    pub similarity_threshold: f64,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: SIMILARITY_THRESHOLD,
        }
    }
}

impl Default for PrdConfig {
    fn default() -> Self {
        Self {
            format: DocumentFormat::Json,
            merge: MergeConfig::default(),
        }
    }
}

impl PrdConfig {
    pub fn validate(&self) -> Result<()> {
        let threshold = self.merge.similarity_threshold;
        if !(0.0..1.0).contains(&threshold) {
            return Err(anyhow!(
                "merge.similarity_threshold must be in [0, 1) (got {threshold})"
            ));
        }
        Ok(())
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            similarity_threshold: self.merge.similarity_threshold,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `PrdConfig::default()`.
pub fn load_config(path: &Path) -> Result<PrdConfig> {
    if !path.exists() {
        return Ok(PrdConfig::default());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: PrdConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &PrdConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}
