//! Configuration loading for the signal mailbox
//!
//! Values come from, in increasing precedence:
//! - built-in defaults
//! - an optional JSON configuration file
//! - environment variables (`HOST`, `PORT`, `SIGNALS_FILE`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::application::ExpirationPolicy;
use crate::application::registry::DEFAULT_CLOSE_RETENTION_SECS;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SIGNALS_FILE: &str = "signals.json";

/// Root configuration for the signal mailbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailboxConfig {
    /// Bind address
    pub host: String,

    /// Listen port
    pub port: u16,

    /// Where the signal collection is persisted
    pub signals_file: PathBuf,

    /// Seconds a closed signal survives before reads sweep it
    pub close_retention_secs: u64,

    /// Run the expiration sweep on a timer as well as on reads. Disabled
    /// when absent.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for MailboxConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            signals_file: PathBuf::from(DEFAULT_SIGNALS_FILE),
            close_retention_secs: DEFAULT_CLOSE_RETENTION_SECS,
            sweep_interval_secs: None,
        }
    }
}

impl MailboxConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply `HOST`, `PORT` and `SIGNALS_FILE` from `lookup`.
    ///
    /// An unparseable port is ignored with a warning.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.port = port,
                Err(e) => tracing::warn!(
                    value = %port,
                    error = %e,
                    fallback = self.port,
                    "Ignoring invalid PORT"
                ),
            }
        }
        if let Some(path) = lookup("SIGNALS_FILE") {
            self.signals_file = PathBuf::from(path);
        }
        self
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn expiration_policy(&self) -> ExpirationPolicy {
        ExpirationPolicy::new(Duration::from_secs(self.close_retention_secs))
    }

    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),
}
