use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

const MAX_NEWTON_STEPS: u32 = 64;
const ROOT_TOLERANCE: Decimal = dec!(0.0000000000001);
const TWELVE: Decimal = dec!(12);

/// Convert an annual rate to its compound monthly equivalent,
/// `(1 + annual_rate)^(1/12) - 1`. Falls back to `annual_rate / 12` when
/// the root cannot be represented.
pub fn annual_to_monthly_rate(annual_rate: Rate) -> Rate {
    if annual_rate.is_zero() {
        return Decimal::ZERO;
    }
    Decimal::ONE
        .checked_add(annual_rate)
        .and_then(|growth| nth_root(growth, 12))
        .map(|root| root - Decimal::ONE)
        .unwrap_or(annual_rate / TWELVE)
}

/// `base^exp` by repeated squaring; `None` on overflow.
pub fn checked_powu(base: Decimal, exp: u32) -> Option<Decimal> {
    let mut result = Decimal::ONE;
    let mut square = base;
    let mut remaining = exp;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(square)?;
        }
    }
    Some(result)
}

/// Positive real `n`th root of `a`.
///
/// Newton iteration on `x^n - a` seeded at `1 + (a - 1) / n`. By Bernoulli's
/// inequality the seed never sits below the root, so the iterates fall
/// monotonically onto it. `None` for a non-positive radicand, `n == 0`, or
/// when an intermediate power overflows.
pub fn nth_root(a: Decimal, n: u32) -> Option<Decimal> {
    if a <= Decimal::ZERO || n == 0 {
        return None;
    }
    if a == Decimal::ONE || n == 1 {
        return Some(a);
    }
    let n_dec = Decimal::from(n);
    let mut x = Decimal::ONE + (a - Decimal::ONE) / n_dec;

    for _ in 0..MAX_NEWTON_STEPS {
        let lower_power = checked_powu(x, n - 1)?;
        let quotient = a.checked_div(lower_power)?;
        let next = (x * (n_dec - Decimal::ONE) + quotient) / n_dec;
        if (next - x).abs() < ROOT_TOLERANCE {
            return Some(next);
        }
        x = next;
    }
    Some(x)
}

/// Iterates discount factors `(1 + r)^t` for t = 0, 1, 2, ...
///
/// Factors are multiplied forward and cached. Once a factor no longer fits
/// in a `Decimal` the curve stops growing: every later period has no factor
/// and discounts to zero.
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    one_plus_r: Decimal,
    factors: Vec<Decimal>,
    overflow_at: Option<u32>,
}

impl DiscountCurve {
    pub fn new(periodic_rate: Rate) -> Self {
        let one_plus_r = Decimal::ONE.checked_add(periodic_rate);
        Self {
            one_plus_r: one_plus_r.unwrap_or(Decimal::MAX),
            factors: vec![Decimal::ONE],
            overflow_at: one_plus_r.map_or(Some(1), |_| None),
        }
    }

    /// Compound factor at `period`, or `None` past the representable range.
    pub fn factor(&mut self, period: u32) -> Option<Decimal> {
        if self.overflow_at.is_some_and(|limit| period >= limit) {
            return None;
        }
        let idx = period as usize;
        while self.factors.len() <= idx {
            let last = self.factors[self.factors.len() - 1];
            match last.checked_mul(self.one_plus_r) {
                Some(next) => self.factors.push(next),
                None => {
                    self.overflow_at = Some(self.factors.len() as u32);
                    return None;
                }
            }
        }
        Some(self.factors[idx])
    }

    /// Present value of `flow` received at `period`. Zero once the factor
    /// has overflowed.
    pub fn present_value(&mut self, flow: Money, period: u32) -> Money {
        match self.factor(period) {
            Some(factor) if !factor.is_zero() => flow.checked_div(factor).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    /// First period whose factor overflowed, if any has been requested.
    pub fn overflow_at(&self) -> Option<u32> {
        self.overflow_at
    }
}
