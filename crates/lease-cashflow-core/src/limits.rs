//! Input ceilings applied before any schedule arithmetic.
//!
//! Every monetary product in the engine is formed from a handful of bounded
//! inputs, so capping those inputs keeps each monthly amount, every annual
//! sum and the term totals inside `Decimal` range. Values above a ceiling are
//! clamped with an advisory warning; nothing here fails.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calendar;
use crate::scenario::Scenario;
use crate::types::{Money, Rate};

/// 100 years.
pub const MAX_TERM_MONTHS: u32 = 1200;
pub const MAX_HOLDOVER_MONTHS: u32 = 120;
/// 1000% a year.
pub const MAX_DISCOUNT_RATE: Rate = dec!(10);
pub const MAX_RSF: Decimal = dec!(1_000_000_000);
/// Rent, opex, expense stop and TI rates per square foot per year.
pub const MAX_RATE_PSF: Money = dec!(1_000_000);
/// Lump sums and monthly flat amounts.
pub const MAX_AMOUNT: Money = dec!(1_000_000_000_000);
/// 100% a year.
pub const MAX_GROWTH: Rate = dec!(1);
pub const MAX_PARKING_SPACES: u32 = 1_000_000;
pub const MAX_DEPOSIT_MONTHS: Decimal = dec!(120);
pub const MAX_HOLDOVER_MULTIPLIER: Decimal = dec!(100);
/// Ceiling on cumulative opex escalation.
pub const MAX_ESCALATION_FACTOR: Decimal = dec!(1_000_000);

/// Clamp the annual discount rate to `[0, MAX_DISCOUNT_RATE]`.
pub fn bound_discount_rate(rate: Rate, warnings: &mut Vec<String>) -> Rate {
    if rate < Decimal::ZERO {
        warnings.push(format!(
            "Discount rate {rate} is negative; cash flows are left undiscounted"
        ));
        Decimal::ZERO
    } else if rate > MAX_DISCOUNT_RATE {
        warnings.push(format!(
            "Discount rate {rate} exceeds the maximum of {MAX_DISCOUNT_RATE}; capped"
        ));
        MAX_DISCOUNT_RATE
    } else {
        rate
    }
}

fn cap(value: Decimal, max: Decimal, label: &str, warnings: &mut Vec<String>) -> Decimal {
    if value > max {
        warnings.push(format!("{label} {value} exceeds the maximum of {max}; capped"));
        max
    } else {
        value
    }
}

fn cap_count(value: u32, max: u32, label: &str, warnings: &mut Vec<String>) -> u32 {
    if value > max {
        warnings.push(format!("{label} {value} exceeds the maximum of {max}; capped"));
        max
    } else {
        value
    }
}

/// Copy of `scenario` with every input inside its ceiling.
///
/// Lower bounds (negative amounts and the like) are left to the components
/// that read each field.
pub fn bound_scenario(scenario: &Scenario, warnings: &mut Vec<String>) -> Scenario {
    let mut s = scenario.clone();

    if let Some(commencement) = s.commencement {
        let term = s.term_months();
        if term > MAX_TERM_MONTHS {
            if let Some(end) = calendar::month_end_date(commencement, MAX_TERM_MONTHS - 1) {
                warnings.push(format!(
                    "Term of {term} months exceeds the maximum of {MAX_TERM_MONTHS}; expiration moved to {end}"
                ));
                s.expiration = Some(end);
            }
        }
    }

    s.rsf = cap(s.rsf, MAX_RSF, "Rentable square feet", warnings);
    for (i, step) in s.phase_in_steps.iter_mut().enumerate() {
        step.rsf = cap(step.rsf, MAX_RSF, &format!("Phase-in step {} square feet", i + 1), warnings);
    }
    for (i, step) in s.rent_steps.iter_mut().enumerate() {
        step.rate_psf_yr = cap(
            step.rate_psf_yr,
            MAX_RATE_PSF,
            &format!("Rent step {} rate", i + 1),
            warnings,
        );
    }

    s.base_opex_psf_yr = cap(s.base_opex_psf_yr, MAX_RATE_PSF, "Base opex", warnings);
    s.base_year_opex_psf_yr = s
        .base_year_opex_psf_yr
        .map(|stop| cap(stop, MAX_RATE_PSF, "Expense stop", warnings));
    s.opex_growth = cap(s.opex_growth, MAX_GROWTH, "Opex growth", warnings);

    s.parking_spaces = cap_count(s.parking_spaces, MAX_PARKING_SPACES, "Parking spaces", warnings);
    s.parking_cost_monthly_per_space = cap(
        s.parking_cost_monthly_per_space,
        MAX_AMOUNT,
        "Parking cost",
        warnings,
    );

    s.ti_allowance_psf = cap(s.ti_allowance_psf, MAX_RATE_PSF, "TI allowance", warnings);
    s.broker_fee = cap(s.broker_fee, MAX_AMOUNT, "Broker fee", warnings);
    for cost in &mut s.one_time_costs {
        let label = format!("One-time cost '{}'", cost.name);
        cost.amount = if cost.amount < -MAX_AMOUNT {
            warnings.push(format!(
                "{label} {} is below the minimum of {}; capped",
                cost.amount, -MAX_AMOUNT
            ));
            -MAX_AMOUNT
        } else {
            cap(cost.amount, MAX_AMOUNT, &label, warnings)
        };
    }
    s.security_deposit_months = cap(
        s.security_deposit_months,
        MAX_DEPOSIT_MONTHS,
        "Security deposit months",
        warnings,
    );

    s.holdover_months = cap_count(s.holdover_months, MAX_HOLDOVER_MONTHS, "Holdover months", warnings);
    s.holdover_rent_multiplier = s
        .holdover_rent_multiplier
        .map(|m| cap(m, MAX_HOLDOVER_MULTIPLIER, "Holdover rent multiplier", warnings));

    s.sublease_income_monthly = cap(s.sublease_income_monthly, MAX_AMOUNT, "Sublease income", warnings);
    s
}
