//! Tagged scenario edits.
//!
//! Every editable field has its own [`ScenarioEdit`] variant. Applying an
//! edit returns a new [`Scenario`] and re-derives the dependent fields: the
//! free-rent window is reconciled against the term after every edit, and the
//! premises name follows building/suite/floor changes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AbatementType, OneTimeCost, OpexMode, PhaseInStep, RentStep, Scenario};
use crate::calendar;
use crate::limits::{MAX_GROWTH, MAX_RATE_PSF, MAX_TERM_MONTHS};
use crate::types::{Money, Rate, SquareFeet};

/// A single field change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum ScenarioEdit {
    Name(String),
    BuildingName(String),
    Suite(String),
    Floor(String),
    Rsf(SquareFeet),
    Commencement(Option<NaiveDate>),
    Expiration(Option<NaiveDate>),
    /// Move expiration so the term spans exactly this many months
    TermMonths(u32),
    RentSteps(Vec<RentStep>),
    /// Replace rent steps with yearly steps escalating from a base rate
    GenerateRentSteps {
        base_rate_psf_yr: Money,
        annual_escalation: Rate,
    },
    PhaseInSteps(Vec<PhaseInStep>),
    FreeRentMonths(u32),
    FreeRentStartMonth(u32),
    FreeRentEndMonth(u32),
    FreeRentAbatementType(AbatementType),
    OpexMode(OpexMode),
    BaseOpexPsfYr(Money),
    BaseYearOpexPsfYr(Option<Money>),
    OpexGrowth(Rate),
    ParkingSpaces(u32),
    ParkingCostMonthlyPerSpace(Money),
    TiAllowancePsf(Money),
    BrokerFee(Money),
    SecurityDepositMonths(Decimal),
    AddOneTimeCost(OneTimeCost),
    RemoveOneTimeCost(usize),
    Holdover {
        months: u32,
        rent_multiplier: Option<Decimal>,
    },
    Sublease {
        income_monthly: Money,
        start_month: u32,
        duration_months: Option<u32>,
    },
    DiscountRateAnnual(Option<Rate>),
}

/// Apply one edit, returning the updated scenario.
pub fn apply_edit(scenario: &Scenario, edit: ScenarioEdit) -> Scenario {
    let mut next = scenario.clone();
    let mut premises_changed = false;

    match edit {
        ScenarioEdit::Name(name) => next.name = name,
        ScenarioEdit::BuildingName(v) => {
            next.building_name = v;
            premises_changed = true;
        }
        ScenarioEdit::Suite(v) => {
            next.suite = v;
            premises_changed = true;
        }
        ScenarioEdit::Floor(v) => {
            next.floor = v;
            premises_changed = true;
        }
        ScenarioEdit::Rsf(v) => next.rsf = v.max(Decimal::ZERO),
        ScenarioEdit::Commencement(v) => next.commencement = v,
        ScenarioEdit::Expiration(v) => next.expiration = v,
        ScenarioEdit::TermMonths(months) => {
            if let Some(commencement) = next.commencement {
                let months = months.max(calendar::MIN_TERM_MONTHS);
                if let Some(end) = calendar::month_end_date(commencement, months - 1) {
                    next.expiration = Some(end);
                }
            }
        }
        ScenarioEdit::RentSteps(steps) => next.rent_steps = steps,
        ScenarioEdit::GenerateRentSteps {
            base_rate_psf_yr,
            annual_escalation,
        } => {
            next.rent_steps =
                build_rent_steps(base_rate_psf_yr, annual_escalation, next.term_months());
        }
        ScenarioEdit::PhaseInSteps(steps) => next.phase_in_steps = steps,
        ScenarioEdit::FreeRentMonths(v) => {
            next.free_rent_months = v;
            next.free_rent_end_month = next.free_rent_start_month.saturating_add(v.saturating_sub(1));
        }
        ScenarioEdit::FreeRentStartMonth(v) => next.free_rent_start_month = v,
        ScenarioEdit::FreeRentEndMonth(end) => {
            if end < next.free_rent_start_month {
                next.free_rent_start_month = end;
            }
            next.free_rent_months = (end - next.free_rent_start_month).saturating_add(1);
        }
        ScenarioEdit::FreeRentAbatementType(v) => next.free_rent_abatement_type = v,
        ScenarioEdit::OpexMode(v) => next.opex_mode = v,
        ScenarioEdit::BaseOpexPsfYr(v) => next.base_opex_psf_yr = v.max(Decimal::ZERO),
        ScenarioEdit::BaseYearOpexPsfYr(v) => {
            next.base_year_opex_psf_yr = v.map(|stop| stop.max(Decimal::ZERO))
        }
        ScenarioEdit::OpexGrowth(v) => next.opex_growth = v.max(Decimal::ZERO),
        ScenarioEdit::ParkingSpaces(v) => next.parking_spaces = v,
        ScenarioEdit::ParkingCostMonthlyPerSpace(v) => {
            next.parking_cost_monthly_per_space = v.max(Decimal::ZERO)
        }
        ScenarioEdit::TiAllowancePsf(v) => next.ti_allowance_psf = v.max(Decimal::ZERO),
        ScenarioEdit::BrokerFee(v) => next.broker_fee = v.max(Decimal::ZERO),
        ScenarioEdit::SecurityDepositMonths(v) => next.security_deposit_months = v.max(Decimal::ZERO),
        ScenarioEdit::AddOneTimeCost(cost) => next.one_time_costs.push(cost),
        ScenarioEdit::RemoveOneTimeCost(index) => {
            if index < next.one_time_costs.len() {
                next.one_time_costs.remove(index);
            }
        }
        ScenarioEdit::Holdover {
            months,
            rent_multiplier,
        } => {
            next.holdover_months = months;
            next.holdover_rent_multiplier = rent_multiplier.filter(|m| *m > Decimal::ZERO);
        }
        ScenarioEdit::Sublease {
            income_monthly,
            start_month,
            duration_months,
        } => {
            next.sublease_income_monthly = income_monthly.max(Decimal::ZERO);
            next.sublease_start_month = start_month;
            next.sublease_duration_months = duration_months;
        }
        ScenarioEdit::DiscountRateAnnual(v) => next.discount_rate_annual = v,
    }

    reconcile_free_rent(&mut next);
    if premises_changed {
        let derived = next.premises_name();
        if !derived.is_empty() {
            next.name = derived;
        }
    }
    next
}

/// Apply edits in order.
pub fn apply_edits(scenario: &Scenario, edits: impl IntoIterator<Item = ScenarioEdit>) -> Scenario {
    edits
        .into_iter()
        .fold(scenario.clone(), |current, edit| apply_edit(&current, edit))
}

/// Write the reconciled free-rent window back into the scenario's
/// start/end/months fields.
pub fn reconcile_free_rent(scenario: &mut Scenario) {
    let window = scenario.free_rent_window();
    scenario.free_rent_start_month = window.start;
    scenario.free_rent_end_month = window.end;
    scenario.free_rent_months = window.months;
}

/// Yearly rent steps covering `term_months`, escalating by
/// `annual_escalation` each lease year. Rates round to cents and stop
/// growing at [`MAX_RATE_PSF`].
pub fn build_rent_steps(base_rate_psf_yr: Money, annual_escalation: Rate, term_months: u32) -> Vec<RentStep> {
    let term_months = term_months.clamp(calendar::MIN_TERM_MONTHS, MAX_TERM_MONTHS);
    let growth = Decimal::ONE + annual_escalation.clamp(Decimal::ZERO, MAX_GROWTH);
    let mut rate = base_rate_psf_yr.clamp(Decimal::ZERO, MAX_RATE_PSF);
    let mut steps = Vec::new();
    let mut start = 0;
    while start < term_months {
        let end = (start + 11).min(term_months - 1);
        steps.push(RentStep::new(start, end, rate.round_dp(2)));
        rate = rate
            .checked_mul(growth)
            .map_or(MAX_RATE_PSF, |next| next.min(MAX_RATE_PSF));
        start += 12;
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base() -> Scenario {
        Scenario {
            id: "s1".into(),
            name: "Draft".into(),
            rsf: dec!(5000),
            commencement: NaiveDate::from_ymd_opt(2026, 1, 1),
            expiration: NaiveDate::from_ymd_opt(2028, 12, 31),
            ..Scenario::default()
        }
    }

    #[test]
    fn test_free_rent_months_sets_end() {
        let s = apply_edit(&base(), ScenarioEdit::FreeRentMonths(4));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (0, 3, 4));

        let s = apply_edit(&s, ScenarioEdit::FreeRentStartMonth(2));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (2, 5, 4));
    }

    #[test]
    fn test_free_rent_end_edit_recomputes_months() {
        let s = apply_edits(
            &base(),
            [ScenarioEdit::FreeRentStartMonth(3), ScenarioEdit::FreeRentEndMonth(8)],
        );
        assert_eq!(s.free_rent_months, 6);
        assert_eq!(s.free_rent_end_month, 8);

        let s = apply_edit(&s, ScenarioEdit::FreeRentEndMonth(1));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (1, 1, 1));
    }

    #[test]
    fn test_free_rent_end_at_max_month_clamps_to_term() {
        let s = apply_edit(&base(), ScenarioEdit::FreeRentEndMonth(u32::MAX));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (0, 35, 36));

        let s = apply_edits(
            &base(),
            [ScenarioEdit::FreeRentStartMonth(u32::MAX), ScenarioEdit::FreeRentEndMonth(u32::MAX)],
        );
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (35, 35, 1));
    }

    #[test]
    fn test_clearing_free_rent_months_stays_cleared() {
        let s = apply_edits(
            &base(),
            [ScenarioEdit::FreeRentStartMonth(2), ScenarioEdit::FreeRentEndMonth(5)],
        );
        assert_eq!(s.free_rent_months, 4);
        let s = apply_edit(&s, ScenarioEdit::FreeRentMonths(0));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (2, 2, 0));
        assert_eq!(s.free_rent_window().months, 0);
    }

    #[test]
    fn test_shortening_term_clamps_free_rent() {
        let s = apply_edits(
            &base(),
            [ScenarioEdit::FreeRentStartMonth(30), ScenarioEdit::FreeRentMonths(6)],
        );
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (30, 35, 6));

        let s = apply_edit(&s, ScenarioEdit::TermMonths(24));
        assert_eq!(s.expiration, NaiveDate::from_ymd_opt(2027, 12, 31));
        assert_eq!((s.free_rent_start_month, s.free_rent_end_month, s.free_rent_months), (23, 23, 1));
    }

    #[test]
    fn test_premises_name_follows_building_edits() {
        let s = apply_edits(
            &base(),
            [
                ScenarioEdit::BuildingName("Harbor Point".into()),
                ScenarioEdit::Floor("9".into()),
            ],
        );
        assert_eq!(s.name, "Harbor Point - Floor 9");
        let s = apply_edit(&s, ScenarioEdit::Suite("910".into()));
        assert_eq!(s.name, "Harbor Point - Suite 910");
        let s = apply_edit(&s, ScenarioEdit::Name("Preferred".into()));
        assert_eq!(s.name, "Preferred");
    }

    #[test]
    fn test_generate_rent_steps() {
        let s = apply_edit(
            &base(),
            ScenarioEdit::GenerateRentSteps {
                base_rate_psf_yr: dec!(40),
                annual_escalation: dec!(0.03),
            },
        );
        assert_eq!(
            s.rent_steps,
            vec![
                RentStep::new(0, 11, dec!(40)),
                RentStep::new(12, 23, dec!(41.20)),
                RentStep::new(24, 35, dec!(42.44)),
            ]
        );
    }

    #[test]
    fn test_build_rent_steps_partial_final_year() {
        let steps = build_rent_steps(dec!(30), Decimal::ZERO, 30);
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[2], RentStep::new(24, 29, dec!(30)));
    }

    #[test]
    fn test_build_rent_steps_runaway_escalation_caps() {
        let steps = build_rent_steps(dec!(900000), dec!(5000), 20_000);
        assert_eq!(steps.len(), 100);
        assert_eq!(steps[0].rate_psf_yr, dec!(900000));
        assert_eq!(steps[1].rate_psf_yr, MAX_RATE_PSF);
        assert_eq!(steps[99], RentStep::new(1188, 1199, MAX_RATE_PSF));
    }

    #[test]
    fn test_edit_does_not_mutate_original() {
        let original = base();
        let edited = apply_edit(&original, ScenarioEdit::Rsf(dec!(9000)));
        assert_eq!(original.rsf, dec!(5000));
        assert_eq!(edited.rsf, dec!(9000));
    }

    #[test]
    fn test_edit_json_shape() {
        let edit: ScenarioEdit =
            serde_json::from_str(r#"{"field": "free_rent_months", "value": 3}"#).unwrap();
        assert_eq!(edit, ScenarioEdit::FreeRentMonths(3));
        let edit: ScenarioEdit = serde_json::from_str(
            r#"{"field": "holdover", "value": {"months": 2, "rent_multiplier": "1.25"}}"#,
        )
        .unwrap();
        assert_eq!(
            edit,
            ScenarioEdit::Holdover {
                months: 2,
                rent_multiplier: Some(dec!(1.25))
            }
        );
    }

    #[test]
    fn test_remove_one_time_cost_out_of_range_is_noop() {
        let s = apply_edit(&base(), ScenarioEdit::RemoveOneTimeCost(4));
        assert_eq!(s, base());
    }
}
