use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use lease_cashflow_core::config::{resolve_discount_rate, EngineConfig};
use lease_cashflow_core::equalization::{self, DateWindow};
use lease_cashflow_core::scenario::edit::{apply_edits, ScenarioEdit};
use lease_cashflow_core::scenario::lenient;
use lease_cashflow_core::{calendar, engine, LeaseCashflowError, Scenario};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Rates cross the boundary as strings ("0.08", "8%") to keep decimal precision.
fn parse_rate(raw: Option<String>) -> NapiResult<Option<Decimal>> {
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => lenient::parse_decimal(&s).map(Some).ok_or_else(|| {
            to_napi_error(LeaseCashflowError::InvalidInput {
                field: "discount_rate".into(),
                reason: format!("'{s}' is not a number"),
            })
        }),
    }
}

// ---------------------------------------------------------------------------
// Monthly engine
// ---------------------------------------------------------------------------

#[napi]
pub fn run_monthly_engine(scenario_json: String, discount_rate: Option<String>) -> NapiResult<String> {
    let scenario = Scenario::from_json(&scenario_json).map_err(to_napi_error)?;
    let rate = match parse_rate(discount_rate)? {
        Some(rate) => rate,
        None => resolve_discount_rate(&scenario, &EngineConfig::default()),
    };
    let output = engine::run_monthly_engine(&scenario, rate);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Equalization
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_equalized_comparison(
    scenarios_json: String,
    default_discount_rate: Option<String>,
    window_start: Option<String>,
    window_end: Option<String>,
) -> NapiResult<String> {
    let scenarios: Vec<Scenario> = serde_json::from_str(&scenarios_json).map_err(to_napi_error)?;
    let rate = parse_rate(default_discount_rate)?.unwrap_or(EngineConfig::default().default_discount_rate);
    let window = match (window_start, window_end) {
        (Some(start), Some(end)) => Some(DateWindow::parse(&start, &end).map_err(to_napi_error)?),
        (None, None) => None,
        _ => {
            return Err(to_napi_error(LeaseCashflowError::InvalidInput {
                field: "window".into(),
                reason: "window start and end must be supplied together".into(),
            }))
        }
    };
    let output = equalization::compute_equalized_comparison(&scenarios, rate, window);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenario editing
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum EditsPayload {
    Many(Vec<ScenarioEdit>),
    One(ScenarioEdit),
}

/// Apply one edit or an array of edits; returns the updated scenario JSON.
#[napi]
pub fn apply_scenario_edits(scenario_json: String, edits_json: String) -> NapiResult<String> {
    let scenario = Scenario::from_json(&scenario_json).map_err(to_napi_error)?;
    let edits = match serde_json::from_str::<EditsPayload>(&edits_json).map_err(to_napi_error)? {
        EditsPayload::Many(edits) => edits,
        EditsPayload::One(edit) => vec![edit],
    };
    let edited = apply_edits(&scenario, edits);
    serde_json::to_string(&edited).map_err(to_napi_error)
}

/// Lease term in months for two dates (ISO or MM/DD/YYYY).
#[napi]
pub fn term_months(commencement: String, expiration: String) -> NapiResult<u32> {
    let parse = |raw: &str| {
        lenient::parse_date(raw).ok_or_else(|| {
            to_napi_error(LeaseCashflowError::DateError(format!("unrecognised date '{raw}'")))
        })
    };
    Ok(calendar::term_months(parse(&commencement)?, parse(&expiration)?))
}
