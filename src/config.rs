//! Optional YAML configuration (`sheetboard.yml`).
//!
//! ```yaml
//! timeout_secs: 15
//! quotations:
//!   url: https://docs.google.com/spreadsheets/d/e/.../pub?output=csv
//! events:
//!   url: https://docs.google.com/spreadsheets/d/e/.../pub?output=csv
//! ```

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "sheetboard.yml";
pub const CONFIG_ENV_VAR: &str = "SHEETBOARD_CONFIG";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub timeout_secs: u64,
    pub quotations: SourceConfig,
    pub events: SourceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            quotations: SourceConfig::default(),
            events: SourceConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config from `explicit`, then `$SHEETBOARD_CONFIG`, then
    /// `./sheetboard.yml`. Only the last one may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR).filter(|value| !value.is_empty()) {
            return Self::from_path(&PathBuf::from(path));
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Self::from_path(default_path)
        } else {
            debug!("No {DEFAULT_CONFIG_FILE} found; using built-in defaults");
            Ok(Config::default())
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Reading config file {path:?}"))?;
        let config =
            Self::from_yaml(&raw).with_context(|| format!("Parsing config file {path:?}"))?;
        debug!("Loaded config from {path:?}");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured URL for a dataset key (`quotations` or `events`).
    pub fn url_for(&self, key: &str) -> Option<&str> {
        let source = match key {
            "quotations" => &self.quotations,
            "events" => &self.events,
            _ => return None,
        };
        source.url.as_deref().map(str::trim).filter(|url| !url.is_empty())
    }
}
