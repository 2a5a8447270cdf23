use clap::Args;
use serde_json::Value;

use lease_cashflow_core::config::resolve_discount_rate;
use lease_cashflow_core::engine::run_monthly_engine_with_config;
use lease_cashflow_core::Scenario;

use super::parse_rate;
use crate::config::AppConfig;
use crate::input;

/// Arguments for a single-scenario monthly cash flow run
#[derive(Args)]
pub struct MonthlyArgs {
    /// Path to a scenario file (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual discount rate, e.g. 0.08 or 8%. Overrides the scenario's rate.
    #[arg(long)]
    pub discount_rate: Option<String>,
}

pub fn run_monthly(args: MonthlyArgs, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let document = input::read_document(args.input.as_deref(), "the monthly engine")?;
    let scenario: Scenario = serde_json::from_value(document)?;
    let rate = match args.discount_rate.as_deref() {
        Some(raw) => parse_rate(raw)?,
        None => resolve_discount_rate(&scenario, &config.engine),
    };
    let output = run_monthly_engine_with_config(&scenario, rate, &config.engine);
    Ok(serde_json::to_value(output)?)
}
