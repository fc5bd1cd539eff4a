use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::memory::RecallOptions;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MnemosConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub recall: RecallConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RecallConfig {
    /// `0` returns every match.
    pub max_results: usize,
    /// Child hops of spreading activation; `0` disables it.
    pub activation_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_mnemos_dir()
            .join("engrams.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl RecallConfig {
    pub fn options(&self) -> RecallOptions {
        RecallOptions {
            max_results: self.max_results,
            activation_depth: self.activation_depth,
        }
    }
}

/// Returns `~/.mnemos/`, falling back to `./.mnemos` without a home directory.
pub fn default_mnemos_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mnemos")
}

/// Returns the default config file path: `~/.mnemos/config.toml`
pub fn default_config_path() -> PathBuf {
    default_mnemos_dir().join("config.toml")
}

impl MnemosConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MnemosConfig::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply environment variable overrides (MNEMOS_DB, MNEMOS_LOG_LEVEL,
    /// MNEMOS_MAX_RESULTS).
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("MNEMOS_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("MNEMOS_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("MNEMOS_MAX_RESULTS") {
            self.recall.max_results = val
                .parse()
                .with_context(|| format!("MNEMOS_MAX_RESULTS must be a number, got {val:?}"))?;
        }
        Ok(())
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
