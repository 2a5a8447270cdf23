//! Month-index and calendar-date conversion for lease schedules.
//!
//! Lease month `m` starts on the commencement day-of-month, `m` calendar
//! months after commencement. When the target month is shorter than the
//! anchor day (e.g. anchor 31st, February), the start clamps to the last
//! valid day of that month. The anchor is always the commencement date,
//! never the previous month's clamped date, so a lease anchored on the 31st
//! returns to the 31st in long months.

use chrono::{Datelike, Months, NaiveDate};

/// Minimum term returned for malformed or missing dates.
pub const MIN_TERM_MONTHS: u32 = 1;

/// Number of days in the given calendar month (handles leap years).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// True when `date` is the final day of its calendar month.
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// Add whole calendar months, clamping the day to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// First calendar day of lease month `month_index`.
pub fn month_start_date(commencement: NaiveDate, month_index: u32) -> Option<NaiveDate> {
    add_months(commencement, month_index)
}

/// Last calendar day of lease month `month_index` (the day before the next
/// lease month starts).
pub fn month_end_date(commencement: NaiveDate, month_index: u32) -> Option<NaiveDate> {
    add_months(commencement, month_index.saturating_add(1)).and_then(|d| d.pred_opt())
}

/// Derive the lease term in months from commencement and expiration.
///
/// The expiration date is inclusive. Whole months are counted from the
/// commencement anchor; any trailing partial month counts as a full month.
/// So `2026-01-01..2030-12-31` and `2026-01-15..2031-01-14` both yield 60.
/// An expiration before commencement returns [`MIN_TERM_MONTHS`].
pub fn term_months(commencement: NaiveDate, expiration: NaiveDate) -> u32 {
    if expiration < commencement {
        return MIN_TERM_MONTHS;
    }
    let Some(exclusive_end) = expiration.succ_opt() else {
        return MIN_TERM_MONTHS;
    };

    let mut months = whole_months_between(commencement, exclusive_end);
    let reached = add_months(commencement, months).unwrap_or(exclusive_end);
    if reached < exclusive_end {
        // Trailing partial month
        months += 1;
    }
    months.max(MIN_TERM_MONTHS)
}

/// Term months when either date may be missing. Missing dates yield the
/// sentinel minimum rather than an error.
pub fn term_months_opt(commencement: Option<NaiveDate>, expiration: Option<NaiveDate>) -> u32 {
    match (commencement, expiration) {
        (Some(c), Some(e)) => term_months(c, e),
        _ => MIN_TERM_MONTHS,
    }
}

/// Count of whole anchored months `k` such that `from + k months <= to`.
/// Returns 0 when `to` precedes `from`.
pub fn whole_months_between(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let raw = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let mut months = raw.max(0) as u32;
    while months > 0 {
        match add_months(from, months) {
            Some(d) if d <= to => break,
            _ => months -= 1,
        }
    }
    months
}

/// The lease month index whose span contains `date`, or `None` when the date
/// precedes commencement.
pub fn month_index_of(commencement: NaiveDate, date: NaiveDate) -> Option<u32> {
    if date < commencement {
        return None;
    }
    Some(whole_months_between(commencement, date))
}
