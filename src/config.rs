//! # Configuration Module
//!
//! Router settings, read from an optional TOML file and then overridden by
//! environment variables.
//!
//! ## File format
//!
//! ```toml
//! slow_dispatch_threshold_us = 2000
//!
//! [log]
//! format = "pretty"
//! filter = "routegate=debug,info"
//! ```
//!
//! Every key is optional.
//!
//! ## Environment Variables
//!
//! | Variable                     | Overrides                   |
//! |------------------------------|-----------------------------|
//! | `ROUTEGATE_SLOW_DISPATCH_US` | `slow_dispatch_threshold_us` |
//! | `ROUTEGATE_LOG_FORMAT`       | `log.format`                |
//! | `ROUTEGATE_LOG_FILTER`       | `log.filter`                |
//!
//! Unparseable numeric values are ignored with a warning and the file (or
//! default) value is kept.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::warn;

const ENV_SLOW_DISPATCH_US: &str = "ROUTEGATE_SLOW_DISPATCH_US";
const ENV_LOG_FORMAT: &str = "ROUTEGATE_LOG_FORMAT";
const ENV_LOG_FILTER: &str = "ROUTEGATE_LOG_FILTER";

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    /// Lenient parse; anything other than `pretty` means JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `tracing_subscriber::EnvFilter` directive string
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "info".to_string(),
        }
    }
}

/// Settings for a [`Dispatcher`](crate::dispatcher::Dispatcher) and its
/// logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Dispatches slower than this are logged at WARN.
    pub slow_dispatch_threshold_us: u64,
    pub log: LogConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            slow_dispatch_threshold_us: 1_000,
            log: LogConfig::default(),
        }
    }
}

impl RouterConfig {
    /// Load the file at `path` (if any), then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not valid TOML for this shape.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML file without looking at the environment.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    /// # Errors
    ///
    /// Fails if `raw` is not valid TOML for this shape.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse router config")
    }

    /// Environment variables win over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var(ENV_SLOW_DISPATCH_US) {
            match val.trim().parse() {
                Ok(us) => self.slow_dispatch_threshold_us = us,
                Err(_) => warn!(
                    variable = ENV_SLOW_DISPATCH_US,
                    value = %val,
                    "Ignoring unparseable environment override"
                ),
            }
        }
        if let Ok(val) = env::var(ENV_LOG_FORMAT) {
            self.log.format = LogFormat::parse(&val);
        }
        if let Ok(val) = env::var(ENV_LOG_FILTER) {
            if !val.trim().is_empty() {
                self.log.filter = val;
            }
        }
    }

    #[must_use]
    pub fn slow_dispatch_threshold(&self) -> Duration {
        Duration::from_micros(self.slow_dispatch_threshold_us)
    }
}
