use std::env;

use lease_cashflow_core::error::LeaseCashflowError;
use lease_cashflow_core::scenario::lenient;
use lease_cashflow_core::{EngineConfig, LeaseCashflowResult};
use rust_decimal::Decimal;

pub const ENV_DISCOUNT_RATE: &str = "LEASECF_DEFAULT_DISCOUNT_RATE";
pub const ENV_HOLDOVER_MULTIPLIER: &str = "LEASECF_HOLDOVER_MULTIPLIER";
pub const ENV_LOG_LEVEL: &str = "LEASECF_LOG_LEVEL";

/// Top-level configuration for the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineConfig,
    pub telemetry: TelemetryConfig,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl AppConfig {
    /// Load `.env` (when present) and the `LEASECF_*` environment variables.
    pub fn load() -> LeaseCashflowResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LeaseCashflowResult<Self> {
        let mut engine = EngineConfig::default();
        if let Some(raw) = lookup(ENV_DISCOUNT_RATE) {
            engine.default_discount_rate = parse_non_negative(ENV_DISCOUNT_RATE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_HOLDOVER_MULTIPLIER) {
            let multiplier = parse_non_negative(ENV_HOLDOVER_MULTIPLIER, &raw)?;
            if multiplier.is_zero() {
                return Err(invalid(ENV_HOLDOVER_MULTIPLIER, &raw, "must be greater than zero"));
            }
            engine.default_holdover_multiplier = multiplier;
        }
        let log_level = lookup(ENV_LOG_LEVEL)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| "warn".to_string());

        Ok(Self {
            engine,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn parse_non_negative(key: &str, raw: &str) -> LeaseCashflowResult<Decimal> {
    let value = lenient::parse_decimal(raw)
        .ok_or_else(|| invalid(key, raw, "expected a decimal number"))?;
    if value < Decimal::ZERO {
        return Err(invalid(key, raw, "must not be negative"));
    }
    Ok(value)
}

fn invalid(key: &str, raw: &str, reason: &str) -> LeaseCashflowError {
    LeaseCashflowError::Configuration {
        key: key.to_string(),
        reason: format!("'{raw}' {reason}"),
    }
}
