//! Client configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file
//! exists. Environment variables override file values:
//!
//!   TERNION_URL            base URL of the remote service
//!   TERNION_TIMEOUT_SECS   per-request timeout

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_URL: &str = "TERNION_URL";
pub const ENV_TIMEOUT: &str = "TERNION_TIMEOUT_SECS";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the remote execution service.
    pub base_url: String,
    /// Per-request timeout. Also the upper bound for each source of a
    /// consensus call; there is no overall deadline.
    pub timeout_secs: u64,
    /// Subject sent with run/compile tasks.
    pub client_subject: String,
    /// Model used by `ask` when none is given.
    pub default_model: String,
    /// Sources used by a consensus call when the caller names none.
    pub default_sources: Vec<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7293".to_string(),
            timeout_secs: 30,
            client_subject: "sdk-rs".to_string(),
            default_model: "claude".to_string(),
            default_sources: vec!["claude".into(), "gpt4".into(), "gemini".into()],
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Strict load from a specific path: missing or malformed files are errors.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Lenient load: any problem is logged and defaults are used.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("No config at {} — using defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {} — using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Discover from ~/.ternion/config.toml, then apply environment overrides.
    pub fn discover() -> Self {
        let mut config = Self::load(&Self::default_path());
        config.apply_env();
        config
    }

    /// Default path: ~/.ternion/config.toml
    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        PathBuf::from(home).join(".ternion").join("config.toml")
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_URL).ok(),
            std::env::var(ENV_TIMEOUT).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, timeout: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        if let Some(raw) = timeout {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => tracing::warn!("Ignoring invalid {}={:?}", ENV_TIMEOUT, raw),
            }
        }
    }

    /// Check values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(Error::config(format!(
                "base_url must start with http:// or https://, got {}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL without trailing slashes.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }
}
