//! # DSES Telemetry
//!
//! Structured logging for the DSES registry and its tools.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dses_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Registry events are now written to stderr
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `dses-registry` | Service name in logs |
//! | `DSES_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `DSES_CONSOLE_OUTPUT` | `true` | Write events to stderr |
//! | `DSES_JSON_LOGS` | `false` (`true` in containers) | JSON formatted events |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::{TelemetryConfig, DEFAULT_SERVICE_NAME};
pub use logging::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    /// The configuration cannot be applied.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install structured logging.
///
/// Returns a guard that should be held for the lifetime of the application.
/// Calling this a second time in the same process fails with
/// [`TelemetryError::SubscriberInit`].
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    logging::init_logging(&config)?;

    tracing::info!(service = %config.service_name, "telemetry initialized");

    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
#[derive(Debug)]
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "shutting down telemetry");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_fails() {
        let config = TelemetryConfig {
            console_output: false,
            ..TelemetryConfig::default()
        };
        // The first call may lose to another test in this process.
        let _first = init_telemetry(config.clone());
        let second = init_telemetry(config);
        assert!(matches!(second, Err(TelemetryError::SubscriberInit(_))));
    }

    #[test]
    fn test_bad_level_rejected_before_install() {
        let config = TelemetryConfig {
            log_level: "registry=loud".to_string(),
            ..TelemetryConfig::default()
        };
        assert!(matches!(
            init_telemetry(config),
            Err(TelemetryError::Config(_))
        ));
    }
}
