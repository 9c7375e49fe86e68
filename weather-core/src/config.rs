use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, fs, path::PathBuf, time::Duration};

use crate::{cache::DEFAULT_TTL, provider::QueryMode};

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";

/// Older deployments keep the key under this name.
pub const LEGACY_API_KEY_ENV: &str = "SECRET_KEY";

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8000";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// mode = "coordinates"
/// listen = "0.0.0.0:8000"
/// cache_ttl_secs = 20
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// API key used when the environment does not provide one.
    pub api_key: Option<String>,

    /// Weather endpoint addressing: "city" (default) or "coordinates".
    pub mode: Option<String>,

    /// Socket address the HTTP endpoint binds to.
    pub listen: Option<String>,

    /// Override for the provider base URL, e.g. a caching proxy.
    pub base_url: Option<String>,

    /// Result cache lifetime in seconds; 0 disables caching.
    pub cache_ttl_secs: Option<u64>,
}

impl Config {
    pub fn query_mode(&self) -> Result<QueryMode> {
        match self.mode.as_deref() {
            Some(mode) => QueryMode::try_from(mode),
            None => Ok(QueryMode::default()),
        }
    }

    pub fn listen_addr(&self) -> &str {
        self.listen.as_deref().unwrap_or(DEFAULT_LISTEN)
    }

    /// `None` when caching is switched off.
    pub fn cache_ttl(&self) -> Option<Duration> {
        match self.cache_ttl_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_TTL),
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        if let Some(mode) = cfg.mode.as_deref() {
            QueryMode::try_from(mode)?;
        }
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-relay", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_query_mode(&mut self, mode: QueryMode) {
        self.mode = Some(mode.as_str().to_string());
    }
}

/// Source of the provider credential. Returning `None` is reported to the
/// caller as a generic internal error.
pub trait ApiKeySource: Send + Sync + Debug {
    fn api_key(&self) -> Option<String>;
}

/// Reads the key from the process environment on every call, trying each
/// variable in order, then falling back to a key from the config file.
#[derive(Debug, Clone)]
pub struct EnvApiKey {
    vars: Vec<String>,
    fallback: Option<String>,
}

impl EnvApiKey {
    pub fn new(var: &str) -> Self {
        Self { vars: vec![var.to_string()], fallback: None }
    }

    /// `OPENWEATHERMAP_API_KEY`, then `SECRET_KEY`, then `api_key` from the file.
    pub fn from_config(config: &Config) -> Self {
        Self {
            vars: vec![API_KEY_ENV.to_string(), LEGACY_API_KEY_ENV.to_string()],
            fallback: config.api_key.clone(),
        }
    }
}

impl ApiKeySource for EnvApiKey {
    fn api_key(&self) -> Option<String> {
        self.vars
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|key| !key.trim().is_empty())
            .or_else(|| self.fallback.clone())
    }
}

/// A fixed key, or none at all.
#[derive(Debug, Clone, Default)]
pub struct StaticApiKey(pub Option<String>);

impl StaticApiKey {
    pub fn new(key: &str) -> Self {
        Self(Some(key.to_string()))
    }
}

impl ApiKeySource for StaticApiKey {
    fn api_key(&self) -> Option<String> {
        self.0.clone()
    }
}
