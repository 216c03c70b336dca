use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ThingsConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub log_level: String,
    pub static_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Maximum number of rows a single query renders.
    pub default_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "localhost:5000".into(),
            log_level: "info".into(),
            static_dir: "./static".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_things_dir()
            .join("things.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            default_limit: 100,
        }
    }
}

/// Returns `~/.things/`, or `./.things/` when no home directory is known.
pub fn default_things_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".things")
}

/// Returns the default config file path: `~/.things/config.toml`
pub fn default_config_path() -> PathBuf {
    default_things_dir().join("config.toml")
}

impl ThingsConfig {
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
            ThingsConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    /// (THINGS_ADDR, THINGS_DB, THINGS_STATIC_DIR, THINGS_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("THINGS_ADDR") {
            self.server.addr = val;
        }
        if let Ok(val) = std::env::var("THINGS_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("THINGS_STATIC_DIR") {
            self.server.static_dir = val;
        }
        if let Ok(val) = std::env::var("THINGS_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    pub fn resolved_static_dir(&self) -> PathBuf {
        expand_tilde(&self.server.static_dir)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
