use clap::Args;
use serde::Deserialize;
use serde_json::Value;

use lease_cashflow_core::equalization::{compute_equalized_comparison_with_config, DateWindow};
use lease_cashflow_core::Scenario;

use super::parse_rate;
use crate::config::AppConfig;
use crate::input;

/// Arguments for an equalized comparison across scenarios
#[derive(Args)]
pub struct EqualizeArgs {
    /// Path to a scenarios file: an array, or an object with a `scenarios` array
    #[arg(long)]
    pub input: Option<String>,

    /// Default annual discount rate for scenarios without their own
    #[arg(long)]
    pub discount_rate: Option<String>,

    /// Custom comparison window start (YYYY-MM-DD or MM/DD/YYYY)
    #[arg(long, requires = "window_end")]
    pub window_start: Option<String>,

    /// Custom comparison window end
    #[arg(long, requires = "window_start")]
    pub window_end: Option<String>,
}

#[derive(Deserialize)]
struct ComparisonDocument {
    scenarios: Vec<Scenario>,
    #[serde(default)]
    custom_window: Option<WindowDocument>,
}

#[derive(Deserialize)]
struct WindowDocument {
    start: String,
    end: String,
}

pub fn run_equalize(args: EqualizeArgs, config: &AppConfig) -> Result<Value, Box<dyn std::error::Error>> {
    let document = input::read_document(args.input.as_deref(), "equalization")?;
    let comparison: ComparisonDocument = match document {
        Value::Array(items) => ComparisonDocument {
            scenarios: serde_json::from_value(Value::Array(items))?,
            custom_window: None,
        },
        other => serde_json::from_value(other)?,
    };
    if comparison.scenarios.len() < 2 {
        tracing::warn!(
            scenarios = comparison.scenarios.len(),
            "equalization is most useful with two or more scenarios"
        );
    }

    let mut engine = config.engine.clone();
    if let Some(raw) = args.discount_rate.as_deref() {
        engine.default_discount_rate = parse_rate(raw)?;
    }

    // Flags win over a window embedded in the document
    let window = match (args.window_start.as_deref(), args.window_end.as_deref()) {
        (Some(start), Some(end)) => Some(DateWindow::parse(start, end)?),
        _ => match comparison.custom_window {
            Some(w) => Some(DateWindow::parse(&w.start, &w.end)?),
            None => None,
        },
    };

    let output = compute_equalized_comparison_with_config(&comparison.scenarios, &engine, window);
    Ok(serde_json::to_value(output)?)
}
