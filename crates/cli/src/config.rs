// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command line configuration.
//!
//! Configuration is read from `config.toml`, found in this order:
//! - the `--config` argument
//! - `NOWQ_CONFIG`
//! - `<state_dir>/config.toml`, if it exists
//!
//! ```toml
//! catalog = "catalog.json"   # relative to the config file
//! filters = "filters.json"
//!
//! [builder]
//! advanced_date_picker = false
//! search_debounce_ms = 150
//! ```

use nowq_core::BuilderConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "nowq";
const CONFIG_FILE_NAME: &str = "config.toml";
const CATALOG_FILE_NAME: &str = "catalog.json";
const FILTERS_FILE_NAME: &str = "filters.json";
const LOG_FILE_NAME: &str = "nowq.log";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Table metadata and records (default: `<state_dir>/catalog.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    /// Saved filters (default: `<state_dir>/filters.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<PathBuf>,
    #[serde(default)]
    pub builder: BuilderConfig,
    #[serde(skip)]
    state_dir: PathBuf,
}

impl Config {
    /// Loads configuration from an explicit path, `NOWQ_CONFIG`, or the
    /// state directory. A missing default file yields the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let state_dir = state_dir();
        let path = explicit.map(Path::to_path_buf).or_else(env::config_path);
        let mut config = match path {
            Some(path) => Config::load_file(&path)?,
            None => {
                let default = state_dir.join(CONFIG_FILE_NAME);
                if default.exists() {
                    Config::load_file(&default)?
                } else {
                    Config::default()
                }
            }
        };
        config.state_dir = state_dir;
        Ok(config)
    }

    /// Parses one config file. Relative paths inside it resolve against
    /// the file's directory.
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("failed to parse {}: {}", path.display(), e))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.catalog = config.catalog.map(|p| base.join(p));
        config.filters = config.filters.map(|p| base.join(p));
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.catalog
            .clone()
            .unwrap_or_else(|| self.state_dir.join(CATALOG_FILE_NAME))
    }

    pub fn filters_path(&self) -> PathBuf {
        self.filters
            .clone()
            .unwrap_or_else(|| self.state_dir.join(FILTERS_FILE_NAME))
    }

    pub fn log_path(&self) -> PathBuf {
        self.state_dir.join(LOG_FILE_NAME)
    }
}

/// The per-user state directory.
///
/// `NOWQ_STATE_DIR`, else `$XDG_STATE_HOME/nowq`, else the platform state
/// directory, else `~/.local/state/nowq`.
pub fn state_dir() -> PathBuf {
    if let Some(dir) = env::state_dir() {
        return dir;
    }
    if let Some(xdg) = env::xdg_state_home() {
        return xdg.join(APP_DIR_NAME);
    }
    if let Some(dir) = dirs::state_dir() {
        return dir.join(APP_DIR_NAME);
    }
    dirs::home_dir()
        .map(|home| home.join(".local/state").join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
