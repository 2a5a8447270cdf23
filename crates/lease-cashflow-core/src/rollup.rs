//! Annual rollup and summary metrics.
//!
//! Rows are grouped by the calendar year of their start date, the same
//! boundary the opex projector escalates on. Undated rows (no commencement)
//! fall back to 12-month lease years. Every annual figure is a plain sum of
//! monthly figures, so annual totals reconcile exactly with the monthly
//! total.

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::MonthlyRow;
use crate::types::{Money, SquareFeet};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of the cash flow schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRow {
    /// "2026", or "Lease Year 1" for undated schedules
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,
    pub first_month: u32,
    pub last_month: u32,
    pub months: u32,
    pub base_rent: Money,
    pub opex: Money,
    pub parking: Money,
    pub upfront_costs: Money,
    pub free_rent_value: Money,
    pub sublease_income: Money,
    pub total_cost: Money,
    pub discounted_cost: Money,
}

/// Summary metrics for one scenario's full term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineMetrics {
    pub rent_nominal: Money,
    pub opex_nominal: Money,
    pub parking_nominal: Money,
    /// Net of broker fee, one-time costs and TI credit
    pub upfront_costs_nominal: Money,
    pub free_rent_value: Money,
    pub sublease_income: Money,
    pub total_cost_nominal: Money,
    pub npv_cost: Money,
    pub avg_cost_year: Money,
    pub avg_cost_psf_year: Money,
    pub avg_gross_rent_psf_year: Money,
    /// TI allowance spread across the term, per square foot per year.
    /// Display only; never used for NPV.
    pub ti_amortized_psf_year: Money,
    /// Refundable; excluded from cost and NPV
    pub security_deposit: Money,
}

// ---------------------------------------------------------------------------
// Rollup
// ---------------------------------------------------------------------------

fn year_key(row: &MonthlyRow) -> (Option<i32>, u32) {
    match row.date {
        Some(date) => (Some(date.year()), 0),
        None => (None, row.month / 12),
    }
}

/// Group monthly rows into annual rows, preserving month order.
pub fn annual_rows(rows: &[MonthlyRow]) -> Vec<AnnualRow> {
    let mut out: Vec<AnnualRow> = Vec::new();
    let mut current_key: Option<(Option<i32>, u32)> = None;

    for row in rows {
        let key = year_key(row);
        if current_key != Some(key) {
            let label = match key {
                (Some(year), _) => year.to_string(),
                (None, lease_year) => format!("Lease Year {}", lease_year + 1),
            };
            out.push(AnnualRow {
                label,
                calendar_year: key.0,
                first_month: row.month,
                last_month: row.month,
                months: 0,
                base_rent: Decimal::ZERO,
                opex: Decimal::ZERO,
                parking: Decimal::ZERO,
                upfront_costs: Decimal::ZERO,
                free_rent_value: Decimal::ZERO,
                sublease_income: Decimal::ZERO,
                total_cost: Decimal::ZERO,
                discounted_cost: Decimal::ZERO,
            });
            current_key = Some(key);
        }
        if let Some(year) = out.last_mut() {
            year.last_month = row.month;
            year.months += 1;
            year.base_rent += row.base_rent;
            year.opex += row.opex;
            year.parking += row.parking;
            year.upfront_costs += row.upfront_costs;
            year.free_rent_value += row.free_rent_value;
            year.sublease_income += row.sublease_income;
            year.total_cost += row.total_cost;
            year.discounted_cost += row.discounted_cost;
        }
    }
    out
}

/// `amount / rsf / (months / 12)`, or zero when either divisor is zero or
/// the quotient is out of range.
pub fn per_sf_per_year(amount: Money, rsf: SquareFeet, months: u32) -> Money {
    if rsf <= Decimal::ZERO || months == 0 {
        return Decimal::ZERO;
    }
    per_year(amount, months)
        .checked_div(rsf)
        .unwrap_or(Decimal::ZERO)
}

/// `amount / (months / 12)`, or zero for an empty period.
pub fn per_year(amount: Money, months: u32) -> Money {
    if months == 0 {
        return Decimal::ZERO;
    }
    amount
        .checked_mul(dec!(12))
        .map_or(Decimal::ZERO, |annualized| annualized / Decimal::from(months))
}

/// Derive summary metrics from the monthly rows.
pub fn summarize(
    rows: &[MonthlyRow],
    rsf: SquareFeet,
    term_months: u32,
    security_deposit: Money,
) -> EngineMetrics {
    let sum = |f: &dyn Fn(&MonthlyRow) -> Money| -> Money { rows.iter().map(f).sum() };

    let rent_nominal = sum(&|r| r.base_rent);
    let opex_nominal = sum(&|r| r.opex);
    let total_cost_nominal = sum(&|r| r.total_cost);
    let ti_total = sum(&|r| r.ti_amortization);

    EngineMetrics {
        rent_nominal,
        opex_nominal,
        parking_nominal: sum(&|r| r.parking),
        upfront_costs_nominal: sum(&|r| r.upfront_costs),
        free_rent_value: sum(&|r| r.free_rent_value),
        sublease_income: sum(&|r| r.sublease_income),
        total_cost_nominal,
        npv_cost: sum(&|r| r.discounted_cost),
        avg_cost_year: per_year(total_cost_nominal, term_months),
        avg_cost_psf_year: per_sf_per_year(total_cost_nominal, rsf, term_months),
        avg_gross_rent_psf_year: per_sf_per_year(rent_nominal + opex_nominal, rsf, term_months),
        ti_amortized_psf_year: per_sf_per_year(ti_total, rsf, term_months),
        security_deposit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(month: u32, date: Option<NaiveDate>, total: Money) -> MonthlyRow {
        MonthlyRow {
            month,
            date,
            rsf: dec!(1000),
            rent_rate_psf_yr: dec!(24),
            base_rent: total,
            opex: Decimal::ZERO,
            parking: Decimal::ZERO,
            upfront_costs: Decimal::ZERO,
            ti_amortization: Decimal::ZERO,
            free_rent_value: Decimal::ZERO,
            sublease_income: Decimal::ZERO,
            total_cost: total,
            cumulative_cost: Decimal::ZERO,
            discounted_cost: total,
        }
    }

    #[test]
    fn test_calendar_year_grouping_mid_year_start() {
        let commencement = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let rows: Vec<MonthlyRow> = (0..15)
            .map(|m| {
                row(
                    m,
                    crate::calendar::month_start_date(commencement, m),
                    dec!(2000),
                )
            })
            .collect();
        let annual = annual_rows(&rows);
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].label, "2026");
        assert_eq!(annual[0].months, 3);
        assert_eq!(annual[1].calendar_year, Some(2027));
        assert_eq!(annual[1].first_month, 3);
        assert_eq!(annual[1].last_month, 14);
        assert_eq!(annual[1].total_cost, dec!(24000));
    }

    #[test]
    fn test_undated_rows_use_lease_years() {
        let rows: Vec<MonthlyRow> = (0..14).map(|m| row(m, None, dec!(100))).collect();
        let annual = annual_rows(&rows);
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].label, "Lease Year 1");
        assert_eq!(annual[1].months, 2);
    }

    #[test]
    fn test_summary_averages() {
        let rows: Vec<MonthlyRow> = (0..24).map(|m| row(m, None, dec!(2000))).collect();
        let metrics = summarize(&rows, dec!(1000), 24, Decimal::ZERO);
        assert_eq!(metrics.total_cost_nominal, dec!(48000));
        assert_eq!(metrics.avg_cost_year, dec!(24000));
        assert_eq!(metrics.avg_cost_psf_year, dec!(24));
        assert_eq!(metrics.avg_gross_rent_psf_year, dec!(24));
    }

    #[test]
    fn test_per_sf_guards() {
        assert_eq!(per_sf_per_year(dec!(100), Decimal::ZERO, 12), Decimal::ZERO);
        assert_eq!(per_sf_per_year(dec!(100), dec!(10), 0), Decimal::ZERO);
        assert_eq!(per_year(dec!(100), 0), Decimal::ZERO);
    }

    #[test]
    fn test_per_sf_out_of_range_is_zero() {
        let sliver = Decimal::new(1, 28);
        assert_eq!(per_sf_per_year(dec!(1_000_000_000), sliver, 12), Decimal::ZERO);
        assert_eq!(per_year(Decimal::MAX, 12), Decimal::ZERO);
    }
}
