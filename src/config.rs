//! Provider configuration, loaded from TOML.
//!
//! Lookup order for the config file:
//! 1. Explicit path
//! 2. `HAPPILENS_CONFIG` environment variable
//! 3. `<config dir>/happilens/config.toml`
//!
//! A file that does not exist yields [`Config::default`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_ENV: &str = "HAPPILENS_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// The happiness report has no reachable API, so only its location is configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HappinessEndpoint {
    pub base_url: String,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub world_bank: EndpointConfig,
    pub happiness: HappinessEndpoint,
    /// Announce mock fallbacks at `info` instead of `debug`.
    pub development_mode: bool,
    /// Seed for mock jitter. Unset means a fresh entropy seed per provider.
    pub mock_seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_bank: EndpointConfig {
                base_url: "https://api.worldbank.org/v2".into(),
                timeout_secs: 15,
            },
            happiness: HappinessEndpoint {
                base_url: "https://data.worldhappiness.report".into(),
            },
            development_mode: true,
            mock_seed: None,
        }
    }
}

impl Config {
    /// Load from the first path in the lookup order.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match resolve_path(explicit) {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("happilens").join("config.toml"))
    }
}

fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(env_path));
    }
    Config::default_path()
}
