//! Tracing subscriber initialization.
//!
//! The router itself only emits `tracing` events and spans; a binary decides
//! where they go. [`init_logging`] installs a global subscriber with an
//! `EnvFilter` and either JSON (production) or pretty (development) output on
//! stderr.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::{LogConfig, LogFormat};

/// Build the filter: `RUST_LOG` if set and valid, else the configured
/// directive string, else `info`.
fn build_filter(config: &LogConfig) -> EnvFilter {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    resolve_filter(from_env.as_deref(), config)
}

fn resolve_filter(env_directives: Option<&str>, config: &LogConfig) -> EnvFilter {
    env_directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_new(&config.filter).ok())
        .unwrap_or_else(|| {
            eprintln!(
                "Warning: Invalid log filter {:?}, falling back to info",
                config.filter
            );
            EnvFilter::new("info")
        })
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directives(filter: &str) -> String {
        EnvFilter::new(filter).to_string()
    }

    fn config_with_filter(filter: &str) -> LogConfig {
        LogConfig {
            format: LogFormat::Pretty,
            filter: filter.to_string(),
        }
    }

    #[test]
    fn test_invalid_filter_falls_back_to_info() {
        let filter = resolve_filter(None, &config_with_filter("routegate=notalevel"));
        assert_eq!(filter.to_string(), directives("info"));
    }

    #[test]
    fn test_configured_filter_used_without_env() {
        let filter = resolve_filter(None, &config_with_filter("warn"));
        assert_eq!(filter.to_string(), directives("warn"));

        let filter = resolve_filter(Some("  "), &config_with_filter("warn"));
        assert_eq!(filter.to_string(), directives("warn"));
    }

    #[test]
    fn test_env_directives_win_when_valid() {
        let config = config_with_filter("warn");
        assert_eq!(
            resolve_filter(Some("debug"), &config).to_string(),
            directives("debug")
        );
        assert_eq!(
            resolve_filter(Some("routegate=notalevel"), &config).to_string(),
            directives("warn")
        );
    }

    #[test]
    fn test_second_init_fails() {
        let config = LogConfig::default();
        let first = init_logging(&config);
        let second = init_logging(&config);
        // Another test binary may have installed a subscriber first, so only
        // the second call is guaranteed to fail.
        assert!(second.is_err());
        drop(first);
    }
}
