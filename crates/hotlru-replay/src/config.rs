//! Replay configuration file

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hotlru::DEFAULT_CAPACITY;
use serde::Deserialize;

/// Settings loaded from a TOML file, then overridden by command-line flags.
///
/// ```toml
/// [cache]
/// capacity = 1000
///
/// [report]
/// json = true
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReplayConfig {
    pub cache: CacheSection,
    pub report: ReportSection,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CacheSection {
    pub capacity: usize,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSection {
    pub json: bool,
}

impl ReplayConfig {
    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Apply command-line overrides; flags win over the file
    pub fn apply_overrides(&mut self, capacity: Option<usize>, json: bool) {
        if let Some(capacity) = capacity {
            self.cache.capacity = capacity;
        }
        if json {
            self.report.json = true;
        }
    }

    /// Per-command replies are suppressed by `--quiet` and in JSON mode, so
    /// stdout carries only the report
    pub fn echo_replies(&self, quiet: bool) -> bool {
        !quiet && !self.report.json
    }
}
