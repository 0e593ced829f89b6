//! Structured logging setup.
//!
//! Installs a global `tracing` subscriber with an `EnvFilter` and either a
//! pretty (development) or JSON (containers) formatter writing to stderr.
//! JSON events carry consistent fields:
//! - `timestamp`
//! - `level`
//! - `target`
//! - `fields.message` and any structured context fields
//!
//! Invocation outcomes additionally carry `component`, `function`, `invoker`
//! and `status` (see [`log_invocation!`](crate::log_invocation)).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{TelemetryConfig, TelemetryError};

/// Build the level filter for `config`.
pub fn env_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::Config(format!("invalid log level {}: {e}", config.log_level)))
}

/// Install the global subscriber.
///
/// Fails with [`TelemetryError::SubscriberInit`] if a global subscriber is
/// already set.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;

    if config.json_logs {
        // JSON output for containers/production
        let json_layer = config.console_output.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    } else {
        // Pretty output for development
        let fmt_layer = config.console_output.then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true)
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))?;
    }

    tracing::debug!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "structured logging initialized"
    );

    Ok(())
}

/// Log an invocation outcome with standard fields.
#[macro_export]
macro_rules! log_invocation {
    ($level:ident, $function:expr, $invoker:expr, $status:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = "dispatcher",
            function = %$function,
            invoker = %$invoker,
            status = $status,
            $($($field)*,)?
            "invocation finished"
        )
    };
}
