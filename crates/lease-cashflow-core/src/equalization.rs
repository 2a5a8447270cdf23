//! Equalized comparison of competing lease scenarios.
//!
//! Scenarios with different commencement dates and terms are compared over a
//! shared calendar window: the overlap of all terms, or a window the user
//! supplies. Each scenario's monthly schedule is restricted to months whose
//! start date falls inside the window and re-discounted so that the window
//! start is period 0 for every scenario.
//!
//! A scenario contributes nothing for window months outside its own term; it
//! does not exist there. Averages always divide by the full window length,
//! so a lease that covers only half the window shows half the monthly
//! average. This differs from clipping the window to each lease.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calendar;
use crate::config::{resolve_discount_rate, EngineConfig};
use crate::engine::{build_schedule, discount_overflow_warning};
use crate::error::LeaseCashflowError;
use crate::limits;
use crate::rollup::per_sf_per_year;
use crate::scenario::{lenient, Scenario};
use crate::time_value::{annual_to_monthly_rate, DiscountCurve};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, SquareFeet};
use crate::LeaseCashflowResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parse a window from two date strings in any accepted layout.
    pub fn parse(start: &str, end: &str) -> LeaseCashflowResult<Self> {
        let parse = |field: &str, raw: &str| {
            lenient::parse_date(raw).ok_or_else(|| {
                LeaseCashflowError::DateError(format!("{field}: unrecognised date '{raw}'"))
            })
        };
        Ok(Self {
            start: parse("window start", start)?,
            end: parse("window end", end)?,
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Window length in lease-style months (trailing partial month counts).
    pub fn months(&self) -> u32 {
        calendar::term_months(self.start, self.end)
    }
}

/// Where the comparison window came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSource {
    /// Latest commencement to earliest expiration across scenarios
    Overlap,
    /// Supplied by the caller
    Custom,
}

/// Metrics for one scenario restricted to the comparison window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizedMetrics {
    pub scenario_name: String,
    /// Lease months of this scenario that start inside the window
    pub months_in_window: u32,
    pub avg_gross_rent_psf_year: Money,
    pub avg_gross_rent_month: Money,
    pub avg_cost_psf_year: Money,
    pub avg_cost_month: Money,
    pub total_cost: Money,
    /// Discounted to the window start
    pub npv: Money,
    pub discount_rate_annual: Rate,
}

/// Result of an equalized comparison.
///
/// When `needs_custom_window` is true, the window fields are empty, `message`
/// explains why and `metrics_by_scenario` is empty. Callers check the flag
/// before reading metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizedComparisonResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_end: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window_source: Option<WindowSource>,
    pub window_months: u32,
    pub needs_custom_window: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub metrics_by_scenario: BTreeMap<String, EqualizedMetrics>,
}

impl EqualizedComparisonResult {
    fn needs_window(message: String) -> Self {
        Self {
            window_start: None,
            window_end: None,
            window_source: None,
            window_months: 0,
            needs_custom_window: true,
            message: Some(message),
            metrics_by_scenario: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compare scenarios over their common window (or `custom_window`), using
/// `default_discount_rate` for scenarios without their own rate.
pub fn compute_equalized_comparison(
    scenarios: &[Scenario],
    default_discount_rate: Rate,
    custom_window: Option<DateWindow>,
) -> ComputationOutput<EqualizedComparisonResult> {
    let config = EngineConfig::with_discount_rate(default_discount_rate);
    compute_equalized_comparison_with_config(scenarios, &config, custom_window)
}

pub fn compute_equalized_comparison_with_config(
    scenarios: &[Scenario],
    config: &EngineConfig,
    custom_window: Option<DateWindow>,
) -> ComputationOutput<EqualizedComparisonResult> {
    let mut warnings: Vec<String> = Vec::new();

    let dated: Vec<(usize, Scenario)> = scenarios
        .iter()
        .enumerate()
        .filter_map(|(i, s)| {
            if s.commencement.is_none() || s.expiration.is_none() {
                warnings.push(format!(
                    "Scenario '{}' has no commencement or expiration date and is excluded",
                    s.key(i)
                ));
                return None;
            }
            let mut bound_warnings = Vec::new();
            let bounded = limits::bound_scenario(s, &mut bound_warnings);
            let key = s.key(i);
            warnings.extend(bound_warnings.into_iter().map(|w| format!("[{key}] {w}")));
            Some((i, bounded))
        })
        .collect();

    let result = match resolve_window(&dated, custom_window) {
        Ok((window, source)) => {
            debug!(
                start = %window.start,
                end = %window.end,
                source = ?source,
                scenarios = dated.len(),
                "equalization window resolved"
            );
            let mut metrics_by_scenario = BTreeMap::new();
            for (position, scenario) in &dated {
                let key = unique_key(&metrics_by_scenario, scenario.key(*position), &mut warnings);
                let rate = resolve_discount_rate(scenario, config);
                let metrics = equalize_scenario(scenario, &key, rate, &window, &mut warnings);
                metrics_by_scenario.insert(key, metrics);
            }
            EqualizedComparisonResult {
                window_start: Some(window.start),
                window_end: Some(window.end),
                window_source: Some(source),
                window_months: window.months(),
                needs_custom_window: false,
                message: None,
                metrics_by_scenario,
            }
        }
        Err(message) => {
            debug!(%message, "equalization needs a custom window");
            EqualizedComparisonResult::needs_window(message)
        }
    };

    for w in &warnings {
        warn!("{w}");
    }

    with_metadata(
        "Equalized lease comparison over a common calendar window (discounted to window start)",
        &serde_json::json!({
            "scenario_count": scenarios.len(),
            "default_discount_rate": config.default_discount_rate,
            "custom_window": custom_window,
        }),
        warnings,
        result,
    )
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn resolve_window(
    dated: &[(usize, Scenario)],
    custom_window: Option<DateWindow>,
) -> Result<(DateWindow, WindowSource), String> {
    if let Some(window) = custom_window {
        if window.end < window.start {
            return Err(format!(
                "Custom window ends ({}) before it starts ({}); choose a valid window",
                window.end, window.start
            ));
        }
        return Ok((window, WindowSource::Custom));
    }

    let start = dated.iter().filter_map(|(_, s)| s.commencement).max();
    let end = dated.iter().filter_map(|(_, s)| s.expiration).min();
    match (start, end) {
        (Some(start), Some(end)) if start <= end => {
            Ok((DateWindow::new(start, end), WindowSource::Overlap))
        }
        (Some(start), Some(end)) => Err(format!(
            "Lease terms do not overlap: the latest commencement ({start}) is after the earliest \
             expiration ({end}). Supply a custom comparison window."
        )),
        _ => Err("No scenario has both a commencement and an expiration date. \
                  Supply a custom comparison window."
            .to_string()),
    }
}

fn unique_key(
    existing: &BTreeMap<String, EqualizedMetrics>,
    key: String,
    warnings: &mut Vec<String>,
) -> String {
    if !existing.contains_key(&key) {
        return key;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{key}-{n}");
        if !existing.contains_key(&candidate) {
            warnings.push(format!(
                "Duplicate scenario id '{key}'; reported as '{candidate}'"
            ));
            return candidate;
        }
        n += 1;
    }
}

/// `scenario` must already be bounded.
fn equalize_scenario(
    scenario: &Scenario,
    key: &str,
    discount_rate_annual: Rate,
    window: &DateWindow,
    warnings: &mut Vec<String>,
) -> EqualizedMetrics {
    let mut scenario_warnings = Vec::new();
    let discount_rate_annual = limits::bound_discount_rate(discount_rate_annual, &mut scenario_warnings);
    let monthly_rate = annual_to_monthly_rate(discount_rate_annual);
    let schedule = build_schedule(scenario, monthly_rate, &mut scenario_warnings);

    let mut curve = DiscountCurve::new(monthly_rate);
    let mut months_in_window = 0u32;
    let mut total_cost = Decimal::ZERO;
    let mut gross_rent = Decimal::ZERO;
    let mut npv = Decimal::ZERO;

    for row in &schedule.rows {
        let Some(date) = row.date else { continue };
        if !window.contains(date) {
            continue;
        }
        let period = calendar::whole_months_between(window.start, date);
        months_in_window += 1;
        total_cost += row.total_cost;
        gross_rent += row.gross_rent();
        npv += curve.present_value(row.total_cost, period);
    }
    if let Some(limit) = curve.overflow_at() {
        scenario_warnings.push(discount_overflow_warning(limit));
    }
    warnings.extend(scenario_warnings.into_iter().map(|w| format!("[{key}] {w}")));

    let window_months = window.months();
    let rsf: SquareFeet = scenario.rsf.max(Decimal::ZERO);
    let per_month = |amount: Money| -> Money {
        if window_months == 0 {
            Decimal::ZERO
        } else {
            amount / Decimal::from(window_months)
        }
    };

    EqualizedMetrics {
        scenario_name: scenario.name.clone(),
        months_in_window,
        avg_gross_rent_psf_year: per_sf_per_year(gross_rent, rsf, window_months),
        avg_gross_rent_month: per_month(gross_rent),
        avg_cost_psf_year: per_sf_per_year(total_cost, rsf, window_months),
        avg_cost_month: per_month(total_cost),
        total_cost,
        npv,
        discount_rate_annual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::RentStep;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn flat(id: &str, start: NaiveDate, end: NaiveDate, rate: Decimal) -> Scenario {
        let term = calendar::term_months(start, end);
        Scenario {
            id: id.into(),
            name: id.to_uppercase(),
            rsf: dec!(1200),
            commencement: Some(start),
            expiration: Some(end),
            rent_steps: vec![RentStep::new(0, term - 1, rate)],
            ..Scenario::default()
        }
    }

    #[test]
    fn test_window_parse() {
        let w = DateWindow::parse("2026-03-01", "10/31/2026").unwrap();
        assert_eq!(w, DateWindow::new(d(2026, 3, 1), d(2026, 10, 31)));
        assert_eq!(w.months(), 8);
        assert!(DateWindow::parse("soon", "2026-01-01").is_err());
    }

    #[test]
    fn test_invalid_custom_window_needs_input() {
        let a = flat("a", d(2026, 1, 1), d(2026, 12, 31), dec!(30));
        let window = DateWindow::new(d(2026, 6, 1), d(2026, 2, 1));
        let out = compute_equalized_comparison(&[a], dec!(0.08), Some(window));
        assert!(out.result.needs_custom_window);
        assert!(out.result.metrics_by_scenario.is_empty());
    }

    #[test]
    fn test_undated_scenarios_excluded() {
        let a = flat("a", d(2026, 1, 1), d(2026, 12, 31), dec!(30));
        let undated = Scenario {
            id: "x".into(),
            ..Scenario::default()
        };
        let out = compute_equalized_comparison(&[a, undated], dec!(0.08), None);
        assert!(!out.result.needs_custom_window);
        assert_eq!(out.result.metrics_by_scenario.len(), 1);
        assert!(out.warnings.iter().any(|w| w.contains("'x'")));
    }

    #[test]
    fn test_all_undated_needs_window() {
        let out = compute_equalized_comparison(&[Scenario::default()], dec!(0.08), None);
        assert!(out.result.needs_custom_window);
    }

    #[test]
    fn test_duplicate_ids_disambiguated() {
        let a = flat("same", d(2026, 1, 1), d(2026, 12, 31), dec!(30));
        let b = flat("same", d(2026, 1, 1), d(2026, 12, 31), dec!(32));
        let out = compute_equalized_comparison(&[a, b], dec!(0.08), None);
        let keys: Vec<&String> = out.result.metrics_by_scenario.keys().collect();
        assert_eq!(keys, vec!["same", "same-2"]);
    }

    #[test]
    fn test_rebased_discounting_starts_at_window() {
        // Window starts at B's commencement; A's month 2 is period 0.
        let a = flat("a", d(2026, 1, 1), d(2026, 12, 31), dec!(30));
        let b = flat("b", d(2026, 3, 1), d(2026, 10, 31), dec!(30));
        let out = compute_equalized_comparison(&[a, b], dec!(0.08), None);
        let m = &out.result.metrics_by_scenario;
        // Same rate, same RSF, same window → identical equalized metrics
        assert_eq!(m["a"].total_cost, m["b"].total_cost);
        assert_eq!(m["a"].npv, m["b"].npv);
        assert_eq!(m["a"].months_in_window, 8);
        assert_eq!(m["a"].avg_cost_month, dec!(3000));
        assert_eq!(m["a"].avg_cost_psf_year, dec!(30));
    }
}
