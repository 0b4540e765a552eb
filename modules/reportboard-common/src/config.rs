use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::error::{ReportBoardError, Result};
use crate::types::parse_timestamp;

pub const RECORDS_ENV: &str = "REPORTBOARD_RECORDS";
pub const NOW_ENV: &str = "REPORTBOARD_NOW";

/// Environment-specific settings. Everything here is optional; the
/// dashboard runs on the reference dataset and the real clock without it.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Records snapshot to load instead of the reference dataset.
    pub records_path: Option<PathBuf>,
    /// Frozen "now" for reproducible time-window filtering.
    pub frozen_now: Option<NaiveDateTime>,
}

impl Config {
    /// Load from the process environment (and a `.env` file, if present).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let records_path = lookup(RECORDS_ENV)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let frozen_now = match lookup(NOW_ENV).filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(parse_timestamp(&raw).ok_or_else(|| {
                ReportBoardError::Config(format!("{NOW_ENV} is not a timestamp: {raw:?}"))
            })?),
            None => None,
        };

        let config = Self {
            records_path,
            frozen_now,
        };
        config.log_summary();
        Ok(config)
    }

    fn log_summary(&self) {
        tracing::debug!(
            records_path = ?self.records_path,
            frozen_now = ?self.frozen_now,
            "Environment config loaded"
        );
    }
}

/// TOML-backed dashboard settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub records_path: Option<PathBuf>,
}

/// Initial filter selection, as the raw labels the filter controls use.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    #[serde(default)]
    pub search: String,
    #[serde(default = "all_label")]
    pub category: String,
    #[serde(default = "all_label")]
    pub window: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: all_label(),
            window: all_label(),
        }
    }
}

fn all_label() -> String {
    "All".to_string()
}

impl FileConfig {
    /// Load and parse a TOML config file. Relative `records_path` values
    /// are resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(dir) = path.parent() {
            config.data.records_path = config.data.records_path.take().map(|records| {
                if records.is_relative() {
                    dir.join(records)
                } else {
                    records
                }
            });
        }

        Ok(config)
    }
}
