//! Operating expense projection.
//!
//! Opex escalates once per calendar year, counted from the calendar year of
//! commencement, with discrete annual compounding. A lease commencing in
//! November sees its first increase two months in, on January 1st, which is
//! how landlords reconcile expenses in practice.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::calendar;
use crate::limits::MAX_ESCALATION_FACTOR;
use crate::scenario::{OpexMode, Scenario};
use crate::types::{Money, Rate};

/// Annualized opex per square foot for any month of one scenario.
#[derive(Debug, Clone)]
pub struct OpexProjector {
    mode: OpexMode,
    base_psf_yr: Money,
    expense_stop_psf_yr: Money,
    growth: Rate,
    commencement: Option<NaiveDate>,
}

impl OpexProjector {
    pub fn from_scenario(scenario: &Scenario) -> Self {
        let base_psf_yr = scenario.base_opex_psf_yr.max(Decimal::ZERO);
        Self {
            mode: scenario.opex_mode,
            base_psf_yr,
            expense_stop_psf_yr: scenario
                .base_year_opex_psf_yr
                .unwrap_or(base_psf_yr)
                .max(Decimal::ZERO),
            growth: scenario.opex_growth.max(Decimal::ZERO),
            commencement: scenario.commencement,
        }
    }

    /// Calendar years elapsed between commencement and lease month `month`.
    /// Zero when the commencement date is unknown.
    pub fn escalation_years(&self, month: u32) -> u32 {
        let Some(commencement) = self.commencement else {
            return 0;
        };
        let Some(date) = calendar::month_start_date(commencement, month) else {
            return 0;
        };
        (date.year() - commencement.year()).max(0) as u32
    }

    /// Cumulative growth multiplier for `month`, saturating at
    /// [`MAX_ESCALATION_FACTOR`].
    pub fn escalation_factor(&self, month: u32) -> Decimal {
        let step = Decimal::ONE + self.growth;
        let mut factor = Decimal::ONE;
        for _ in 0..self.escalation_years(month) {
            match factor.checked_mul(step) {
                Some(next) if next < MAX_ESCALATION_FACTOR => factor = next,
                _ => return MAX_ESCALATION_FACTOR,
            }
        }
        factor
    }

    /// True when escalation has hit the ceiling by `month`.
    pub fn escalation_capped(&self, month: u32) -> bool {
        self.escalation_factor(month) >= MAX_ESCALATION_FACTOR
    }

    /// Gross opex per square foot per year after escalation, before any
    /// expense stop.
    pub fn escalated_psf_yr(&self, month: u32) -> Money {
        self.base_psf_yr
            .checked_mul(self.escalation_factor(month))
            .unwrap_or(Decimal::MAX)
    }

    /// Tenant opex obligation per square foot per year for `month`.
    pub fn tenant_psf_yr(&self, month: u32) -> Money {
        let escalated = self.escalated_psf_yr(month);
        match self.mode {
            OpexMode::Nnn => escalated,
            OpexMode::BaseYear => (escalated - self.expense_stop_psf_yr).max(Decimal::ZERO),
        }
    }

    /// Tenant opex per square foot for the single month.
    pub fn tenant_psf_month(&self, month: u32) -> Money {
        self.tenant_psf_yr(month) / Decimal::from(12)
    }
}
