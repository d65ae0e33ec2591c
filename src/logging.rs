// ABOUTME: Logging configuration and structured logging setup
// ABOUTME: Configures tracing subscriber level and output format from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured logging setup over `tracing`
//!
//! The level comes from `RUST_LOG` (default `info`), the format from
//! `LOG_FORMAT` (`pretty` by default, `compact` for space-constrained
//! environments). Call [`LoggingConfig::init`] once at process start.

use std::env;

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::errors::{AppError, AppResult};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line format for development
    Pretty,
    /// Single-line format for space-constrained environments
    Compact,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level / filter directive (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };
        Self { level, format }
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a subscriber is already installed or the
    /// filter directive is invalid.
    pub fn init(&self) -> AppResult<()> {
        let env_filter = EnvFilter::try_new(&self.level)
            .map_err(|e| AppError::config(format!("invalid log filter '{}': {e}", self.level)))?;

        let registry = tracing_subscriber::registry().with(env_filter);
        let result = match self.format {
            LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
            LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
        };

        result.map_err(|e| AppError::internal(format!("failed to initialize logging: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
    }

    #[test]
    fn test_invalid_filter_is_a_config_error() {
        let config = LoggingConfig {
            level: "not=a=filter".into(),
            format: LogFormat::Compact,
        };
        assert!(config.init().is_err());
    }
}
