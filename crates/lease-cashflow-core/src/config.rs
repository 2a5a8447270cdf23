use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::scenario::Scenario;
use crate::types::Rate;

/// Annual discount rate applied when a scenario carries no usable override.
pub const DEFAULT_DISCOUNT_RATE: Rate = dec!(0.08);

/// Holdover rent multiplier applied when a scenario leaves it unset.
pub const DEFAULT_HOLDOVER_MULTIPLIER: Decimal = dec!(1.5);

/// Engine-wide defaults shared by every scenario in a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub default_discount_rate: Rate,
    pub default_holdover_multiplier: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_discount_rate: DEFAULT_DISCOUNT_RATE,
            default_holdover_multiplier: DEFAULT_HOLDOVER_MULTIPLIER,
        }
    }
}

impl EngineConfig {
    /// Config with a caller-supplied global discount rate. Non-positive values
    /// keep the built-in default.
    pub fn with_discount_rate(rate: Rate) -> Self {
        let mut config = Self::default();
        if rate > Decimal::ZERO {
            config.default_discount_rate = rate;
        }
        config
    }
}

/// Effective annual discount rate for a scenario: its own override when
/// present and positive, otherwise the configured default.
pub fn resolve_discount_rate(scenario: &Scenario, config: &EngineConfig) -> Rate {
    match scenario.discount_rate_annual {
        Some(rate) if rate > Decimal::ZERO => rate,
        _ => config.default_discount_rate,
    }
}
