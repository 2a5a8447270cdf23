use lease_cashflow_core::error::LeaseCashflowError;
use tracing_subscriber::EnvFilter;

use crate::config::{TelemetryConfig, ENV_LOG_LEVEL};

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &TelemetryConfig) -> Result<(), LeaseCashflowError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|source| {
            LeaseCashflowError::Configuration {
                key: ENV_LOG_LEVEL.to_string(),
                reason: format!("invalid log level/filter '{}': {source}", config.log_level),
            }
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| LeaseCashflowError::Configuration {
            key: ENV_LOG_LEVEL.to_string(),
            reason: format!("telemetry error: {err}"),
        })
}
