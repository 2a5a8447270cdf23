//! Canonical lease description consumed by the cash flow engine.
//!
//! A [`Scenario`] is an immutable value: editing surfaces build a new one
//! per change (see [`edit`]) and hand it to the engine. Decoding is lenient
//! so that partially extracted or half-typed leases still produce a
//! computable scenario.

pub mod edit;
pub mod lenient;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::calendar;
use crate::schedule::{normalize_free_rent, FreeRentWindow};
use crate::types::{Money, Rate, SquareFeet};
use crate::LeaseCashflowResult;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How operating expenses are passed through to the tenant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpexMode {
    /// Tenant pays the full escalated opex.
    #[default]
    Nnn,
    /// Tenant pays only growth above the base-year stop.
    BaseYear,
}

impl<'de> Deserialize<'de> for OpexMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value.as_str().map(lenient::normalize_tag).unwrap_or_default();
        Ok(match tag.as_str() {
            "base_year" | "baseyear" | "base" | "full_service" | "gross" => OpexMode::BaseYear,
            _ => OpexMode::Nnn,
        })
    }
}

/// What a free-rent month waives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbatementType {
    /// Base rent only.
    #[default]
    Base,
    /// Base rent, opex and parking.
    Gross,
}

impl<'de> Deserialize<'de> for AbatementType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let tag = value.as_str().map(lenient::normalize_tag).unwrap_or_default();
        Ok(match tag.as_str() {
            "gross" | "full" => AbatementType::Gross,
            _ => AbatementType::Base,
        })
    }
}

// ---------------------------------------------------------------------------
// Schedule entries
// ---------------------------------------------------------------------------

/// A base rent step covering months `start..=end` (0-based, inclusive).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentStep {
    #[serde(deserialize_with = "lenient::count")]
    pub start: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub end: u32,
    /// Annual base rent per rentable square foot
    #[serde(deserialize_with = "lenient::decimal")]
    pub rate_psf_yr: Money,
}

impl RentStep {
    pub fn new(start: u32, end: u32, rate_psf_yr: Money) -> Self {
        Self {
            start,
            end,
            rate_psf_yr,
        }
    }

    pub fn contains(&self, month: u32) -> bool {
        self.start <= month && month <= self.end
    }
}

/// Occupied square footage for months `start_month..=end_month`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseInStep {
    #[serde(deserialize_with = "lenient::count")]
    pub start_month: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub end_month: u32,
    #[serde(deserialize_with = "lenient::decimal")]
    pub rsf: SquareFeet,
}

impl PhaseInStep {
    pub fn contains(&self, month: u32) -> bool {
        self.start_month <= month && month <= self.end_month
    }
}

/// A named upfront cost placed at a lease month or calendar date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneTimeCost {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::decimal")]
    pub amount: Money,
    #[serde(deserialize_with = "lenient::opt_count")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(deserialize_with = "lenient::date")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// One competing lease option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    #[serde(deserialize_with = "lenient::text")]
    pub id: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub building_name: String,
    #[serde(deserialize_with = "lenient::text")]
    pub suite: String,
    #[serde(deserialize_with = "lenient::text")]
    pub floor: String,

    /// Rentable square feet
    #[serde(deserialize_with = "lenient::decimal")]
    pub rsf: SquareFeet,
    #[serde(deserialize_with = "lenient::list")]
    pub phase_in_steps: Vec<PhaseInStep>,

    #[serde(deserialize_with = "lenient::date")]
    pub commencement: Option<NaiveDate>,
    #[serde(deserialize_with = "lenient::date")]
    pub expiration: Option<NaiveDate>,

    #[serde(deserialize_with = "lenient::list")]
    pub rent_steps: Vec<RentStep>,

    #[serde(deserialize_with = "lenient::count")]
    pub free_rent_months: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub free_rent_start_month: u32,
    #[serde(deserialize_with = "lenient::count")]
    pub free_rent_end_month: u32,
    pub free_rent_abatement_type: AbatementType,

    pub opex_mode: OpexMode,
    #[serde(deserialize_with = "lenient::decimal")]
    pub base_opex_psf_yr: Money,
    /// Expense stop; only read in base-year mode
    #[serde(deserialize_with = "lenient::opt_decimal")]
    pub base_year_opex_psf_yr: Option<Money>,
    #[serde(deserialize_with = "lenient::decimal")]
    pub opex_growth: Rate,

    #[serde(deserialize_with = "lenient::count")]
    pub parking_spaces: u32,
    #[serde(deserialize_with = "lenient::decimal")]
    pub parking_cost_monthly_per_space: Money,

    #[serde(deserialize_with = "lenient::decimal")]
    pub ti_allowance_psf: Money,
    #[serde(deserialize_with = "lenient::list")]
    pub one_time_costs: Vec<OneTimeCost>,
    #[serde(deserialize_with = "lenient::decimal")]
    pub broker_fee: Money,
    #[serde(deserialize_with = "lenient::decimal")]
    pub security_deposit_months: Decimal,

    #[serde(deserialize_with = "lenient::count")]
    pub holdover_months: u32,
    #[serde(deserialize_with = "lenient::opt_decimal")]
    pub holdover_rent_multiplier: Option<Decimal>,

    #[serde(deserialize_with = "lenient::decimal")]
    pub sublease_income_monthly: Money,
    #[serde(deserialize_with = "lenient::count")]
    pub sublease_start_month: u32,
    /// `None` runs the sublease through the end of the term
    #[serde(deserialize_with = "lenient::opt_count")]
    pub sublease_duration_months: Option<u32>,

    #[serde(deserialize_with = "lenient::opt_decimal")]
    pub discount_rate_annual: Option<Rate>,
}

impl Scenario {
    /// Decode a scenario from JSON. Only structurally broken JSON fails;
    /// malformed field values fall back to defaults.
    pub fn from_json(json: &str) -> LeaseCashflowResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Lease term in months, derived from the dates (minimum 1).
    pub fn term_months(&self) -> u32 {
        calendar::term_months_opt(self.commencement, self.expiration)
    }

    /// Free-rent length. When only the start and end months are given, the
    /// length is the inclusive span between them.
    pub fn effective_free_rent_months(&self) -> u32 {
        if self.free_rent_months == 0 && self.free_rent_end_month > self.free_rent_start_month {
            (self.free_rent_end_month - self.free_rent_start_month).saturating_add(1)
        } else {
            self.free_rent_months
        }
    }

    /// Free-rent window reconciled against the current term.
    pub fn free_rent_window(&self) -> FreeRentWindow {
        normalize_free_rent(
            self.free_rent_start_month,
            self.effective_free_rent_months(),
            self.term_months() as i64,
        )
    }

    /// Identifier used to key comparison results: `id`, else `name`, else
    /// the scenario's position.
    pub fn key(&self, position: usize) -> String {
        if !self.id.trim().is_empty() {
            self.id.clone()
        } else if !self.name.trim().is_empty() {
            self.name.clone()
        } else {
            format!("scenario-{}", position + 1)
        }
    }

    /// Display name derived from building and suite/floor.
    pub fn premises_name(&self) -> String {
        derive_premises_name(&self.building_name, &self.suite, &self.floor)
    }
}

/// `"<building> - Suite <suite>"`, falling back to floor, then to whichever
/// part is present.
pub fn derive_premises_name(building: &str, suite: &str, floor: &str) -> String {
    let building = building.trim();
    let unit = if !suite.trim().is_empty() {
        format!("Suite {}", suite.trim())
    } else if !floor.trim().is_empty() {
        format!("Floor {}", floor.trim())
    } else {
        String::new()
    };
    match (building.is_empty(), unit.is_empty()) {
        (false, false) => format!("{building} - {unit}"),
        (false, true) => building.to_string(),
        (true, false) => unit,
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decode_messy_scenario() {
        let json = r#"{
            "id": 7,
            "name": "Tower A",
            "rsf": "10,000",
            "commencement": "01/01/2026",
            "expiration": "2030-12-31",
            "rent_steps": [
                {"start": 0, "end": 11, "rate_psf_yr": "$30.00"},
                "garbage",
                {"start": 12, "end": 59, "rate_psf_yr": 31.5}
            ],
            "free_rent_months": "3",
            "free_rent_abatement_type": "GROSS",
            "opex_mode": "Base-Year",
            "base_opex_psf_yr": null,
            "opex_growth": "3%",
            "parking_spaces": -4,
            "discount_rate_annual": "abc",
            "unknown_field": true
        }"#;
        let s = Scenario::from_json(json).unwrap();
        assert_eq!(s.id, "7");
        assert_eq!(s.rsf, dec!(10000));
        assert_eq!(s.commencement, NaiveDate::from_ymd_opt(2026, 1, 1));
        assert_eq!(s.rent_steps.len(), 2);
        assert_eq!(s.rent_steps[0].rate_psf_yr, dec!(30.00));
        assert_eq!(s.free_rent_months, 3);
        assert_eq!(s.free_rent_abatement_type, AbatementType::Gross);
        assert_eq!(s.opex_mode, OpexMode::BaseYear);
        assert_eq!(s.base_opex_psf_yr, Decimal::ZERO);
        assert_eq!(s.opex_growth, dec!(0.03));
        assert_eq!(s.parking_spaces, 0);
        assert_eq!(s.discount_rate_annual, None);
        assert_eq!(s.term_months(), 60);
    }

    #[test]
    fn test_free_rent_span_without_length() {
        let json = r#"{
            "commencement": "2026-01-01",
            "expiration": "2026-12-31",
            "free_rent_start_month": 0,
            "free_rent_end_month": 2
        }"#;
        let s = Scenario::from_json(json).unwrap();
        assert_eq!(s.effective_free_rent_months(), 3);
        let w = s.free_rent_window();
        assert_eq!((w.start, w.end, w.months), (0, 2, 3));

        let explicit = Scenario {
            free_rent_months: 1,
            ..s.clone()
        };
        assert_eq!(explicit.effective_free_rent_months(), 1);

        let unset = Scenario {
            free_rent_end_month: 0,
            ..s
        };
        assert_eq!(unset.effective_free_rent_months(), 0);
    }

    #[test]
    fn test_decode_empty_object() {
        let s = Scenario::from_json("{}").unwrap();
        assert_eq!(s, Scenario::default());
        assert_eq!(s.term_months(), 1);
    }

    #[test]
    fn test_premises_name_derivation() {
        assert_eq!(derive_premises_name("One Market", "400", "4"), "One Market - Suite 400");
        assert_eq!(derive_premises_name("One Market", "", "12"), "One Market - Floor 12");
        assert_eq!(derive_premises_name("One Market", " ", ""), "One Market");
        assert_eq!(derive_premises_name("", "210", ""), "Suite 210");
        assert_eq!(derive_premises_name("", "", ""), "");
    }

    #[test]
    fn test_scenario_key_fallbacks() {
        let mut s = Scenario::default();
        assert_eq!(s.key(1), "scenario-2");
        s.name = "Option B".into();
        assert_eq!(s.key(1), "Option B");
        s.id = "b".into();
        assert_eq!(s.key(1), "b");
    }
}
