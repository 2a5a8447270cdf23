//! Rent schedule resolution: which rent step, how much space and whether
//! free rent applies for a given lease month.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::scenario::{AbatementType, PhaseInStep, RentStep, Scenario};
use crate::types::{Money, SquareFeet};

// ---------------------------------------------------------------------------
// Free rent
// ---------------------------------------------------------------------------

/// A reconciled free-rent window. When `months > 0`, the invariant
/// `end - start + 1 == months` and `start <= end <= term - 1` holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeRentWindow {
    pub start: u32,
    pub end: u32,
    pub months: u32,
}

impl FreeRentWindow {
    pub fn contains(&self, month: u32) -> bool {
        self.months > 0 && self.start <= month && month <= self.end
    }
}

/// Reconcile free-rent start and length against the term.
///
/// `start` clamps to `[0, term - 1]`, `end` is `min(term - 1, start + months - 1)`
/// and `months` is recomputed from the clamped range. Zero months leaves
/// `end == start`. A term of zero or less behaves like a one-month term.
pub fn normalize_free_rent(start: u32, months: u32, term_months: i64) -> FreeRentWindow {
    let last = (term_months - 1).clamp(0, u32::MAX as i64) as u32;
    let start = start.min(last);
    if months == 0 {
        return FreeRentWindow {
            start,
            end: start,
            months: 0,
        };
    }
    let end = last.min(start.saturating_add(months - 1));
    FreeRentWindow {
        start,
        end,
        months: end - start + 1,
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Rent inputs effective for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedMonth {
    /// Annual base rent per square foot before abatement
    pub rate_psf_yr: Money,
    pub rsf: SquareFeet,
    pub free_rent: bool,
    pub abatement: AbatementType,
}

impl ResolvedMonth {
    /// Base rent is waived for every abatement type.
    pub fn abates_base(&self) -> bool {
        self.free_rent
    }

    /// Opex and parking are waived only under gross abatement.
    pub fn abates_gross(&self) -> bool {
        self.free_rent && self.abatement == AbatementType::Gross
    }
}

/// Borrowed view over a scenario's rent, phase-in and free-rent terms.
#[derive(Debug, Clone)]
pub struct RentSchedule<'a> {
    steps: &'a [RentStep],
    phase_in: &'a [PhaseInStep],
    full_rsf: SquareFeet,
    free_rent: FreeRentWindow,
    abatement: AbatementType,
}

impl<'a> RentSchedule<'a> {
    pub fn from_scenario(scenario: &'a Scenario) -> Self {
        Self {
            steps: &scenario.rent_steps,
            phase_in: &scenario.phase_in_steps,
            full_rsf: scenario.rsf.max(Decimal::ZERO),
            free_rent: scenario.free_rent_window(),
            abatement: scenario.free_rent_abatement_type,
        }
    }

    pub fn free_rent(&self) -> FreeRentWindow {
        self.free_rent
    }

    /// First step whose range contains `month`; overlaps resolve to the
    /// earlier-listed step.
    pub fn step_for(&self, month: u32) -> Option<&'a RentStep> {
        self.steps.iter().find(|s| s.contains(month))
    }

    /// Annual rate per square foot; zero where no step applies.
    pub fn annual_rate_psf(&self, month: u32) -> Money {
        self.step_for(month)
            .map(|s| s.rate_psf_yr.max(Decimal::ZERO))
            .unwrap_or(Decimal::ZERO)
    }

    /// Occupied square feet: the first phase-in step covering `month`, else
    /// the full premises.
    pub fn rsf_for(&self, month: u32) -> SquareFeet {
        self.phase_in
            .iter()
            .find(|p| p.contains(month))
            .map(|p| p.rsf.max(Decimal::ZERO))
            .unwrap_or(self.full_rsf)
    }

    pub fn is_free(&self, month: u32) -> bool {
        self.free_rent.contains(month)
    }

    pub fn resolve(&self, month: u32) -> ResolvedMonth {
        ResolvedMonth {
            rate_psf_yr: self.annual_rate_psf(month),
            rsf: self.rsf_for(month),
            free_rent: self.is_free(month),
            abatement: self.abatement,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation (advisory only)
// ---------------------------------------------------------------------------

/// Check rent steps for the start-at-zero, contiguous, non-overlapping and
/// full-coverage rules. Returns one message per violation.
pub fn validate_rent_steps(steps: &[RentStep], term_months: u32) -> Vec<String> {
    let mut warnings = Vec::new();
    if steps.is_empty() {
        warnings.push("No rent steps defined; base rent is zero for the whole term".into());
        return warnings;
    }

    for (i, step) in steps.iter().enumerate() {
        if step.end < step.start {
            warnings.push(format!(
                "Rent step {} ends (month {}) before it starts (month {}); it never applies",
                i + 1,
                step.end,
                step.start
            ));
        }
        if step.rate_psf_yr < Decimal::ZERO {
            warnings.push(format!(
                "Rent step {} has a negative rate ({}); treated as zero",
                i + 1,
                step.rate_psf_yr
            ));
        }
    }

    let mut ordered: Vec<(usize, &RentStep)> = steps
        .iter()
        .enumerate()
        .filter(|(_, s)| s.end >= s.start)
        .collect();
    ordered.sort_by_key(|(i, s)| (s.start, *i));

    let Some((_, first)) = ordered.first() else {
        return warnings;
    };
    if first.start > 0 {
        warnings.push(format!(
            "Rent steps start at month {}; earlier months carry no base rent",
            first.start
        ));
    }

    let mut covered_to = first.end;
    let mut covered_by = ordered[0].0;
    for (idx, step) in ordered.iter().skip(1) {
        if step.start > covered_to.saturating_add(1) {
            warnings.push(format!(
                "Gap in rent steps: months {}-{} have no rent step",
                covered_to + 1,
                step.start - 1
            ));
        } else if step.start <= covered_to {
            warnings.push(format!(
                "Rent steps {} and {} overlap at months {}-{}; the earlier-listed step applies",
                covered_by.min(*idx) + 1,
                covered_by.max(*idx) + 1,
                step.start,
                step.end.min(covered_to)
            ));
        }
        if step.end > covered_to {
            covered_to = step.end;
            covered_by = *idx;
        }
    }

    let last_month = term_months.saturating_sub(1);
    if covered_to < last_month {
        warnings.push(format!(
            "Rent steps end at month {covered_to} but the term runs through month {last_month}"
        ));
    }
    warnings
}

/// Check phase-in steps for overlaps, negative space and out-of-term ranges.
pub fn validate_phase_in(steps: &[PhaseInStep], term_months: u32) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut ordered: Vec<(usize, &PhaseInStep)> = steps.iter().enumerate().collect();
    ordered.sort_by_key(|(i, s)| (s.start_month, *i));

    for (i, step) in steps.iter().enumerate() {
        if step.end_month < step.start_month {
            warnings.push(format!(
                "Phase-in step {} ends before it starts; it never applies",
                i + 1
            ));
        }
        if step.rsf < Decimal::ZERO {
            warnings.push(format!(
                "Phase-in step {} has negative square footage; treated as zero",
                i + 1
            ));
        }
        if step.start_month >= term_months {
            warnings.push(format!(
                "Phase-in step {} starts after the term ends (month {})",
                i + 1,
                step.start_month
            ));
        }
    }

    for pair in ordered.windows(2) {
        let (a_idx, a) = pair[0];
        let (b_idx, b) = pair[1];
        if a.end_month >= a.start_month && b.start_month <= a.end_month {
            warnings.push(format!(
                "Phase-in steps {} and {} overlap; the earlier-listed step applies",
                a_idx.min(b_idx) + 1,
                a_idx.max(b_idx) + 1
            ));
        }
    }
    warnings
}
