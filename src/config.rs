use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_URL_ENV: &str = "ORGADMIN_API_URL";
pub const TIMEOUT_ENV: &str = "ORGADMIN_TIMEOUT_SECS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON from '{path}': {source}")]
    ParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{name} must be a positive number of seconds, got '{value}'")]
    InvalidTimeout { name: &'static str, value: String },
}

/// Client settings, layered as defaults < config file < environment < command-line flags.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// `<config_dir>/orgadmin/config.json`, when the platform has a config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orgadmin").join("config.json"))
    }

    /// Reads a config file that must exist.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content, path)
    }

    /// Like [`Config::from_file`], but a missing file yields the defaults.
    pub fn from_optional_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Overrides fields from environment variables looked up through `lookup`.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(api_url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_url = api_url.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = parse_timeout(TIMEOUT_ENV, &raw)?;
        }

        Ok(self)
    }

    /// File then process environment. An explicit path must exist; the
    /// default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        Self::from_location(explicit, Self::default_path().as_deref())?
            .with_env(|name| std::env::var(name).ok())
    }

    fn from_location(
        explicit: Option<&Path>,
        fallback: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        match (explicit, fallback) {
            (Some(path), _) => Self::from_file(path),
            (None, Some(path)) => Self::from_optional_file(path),
            (None, None) => Ok(Self::default()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_timeout(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidTimeout {
            name,
            value: raw.to_string(),
        }),
    }
}
