use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Direction in which a function moves as its argument grows.
///
/// Bisection needs to know which half of the bracket to keep once it sees
/// the sign of the midpoint; passing the direction explicitly keeps a single
/// solver valid for both "maximum tolerable shock" and "minimum sustaining
/// input" searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Monotonicity {
    Increasing,
    Decreasing,
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// Returns zero for a non-positive principal and straight-line amortisation
/// (`principal / n`) when the rate is zero. A zero-length term makes the
/// whole principal due at once.
pub fn monthly_payment(principal: Money, annual_rate: Rate, term_years: u32) -> Money {
    if principal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let total_months = term_years.saturating_mul(12);
    if total_months == 0 {
        return principal;
    }

    let monthly_rate = annual_rate / dec!(12);
    if monthly_rate.is_zero() {
        return principal / Decimal::from(total_months);
    }

    // Interest-only is the limit as (1+r)^n grows without bound
    let interest_only = principal * monthly_rate;
    let compound = match (Decimal::ONE + monthly_rate).checked_powu(u64::from(total_months)) {
        Some(c) => c,
        None => return interest_only,
    };

    // P * r / (1 - (1+r)^-n) keeps every intermediate below P
    let denominator = Decimal::ONE - Decimal::ONE / compound;
    if denominator.is_zero() {
        return principal / Decimal::from(total_months);
    }

    interest_only
        .checked_div(denominator)
        .unwrap_or(interest_only)
}

/// Fixed-iteration bisection on a bracket `[lo, hi]` that contains a sign
/// change of the monotonic function `f`.
///
/// Each step keeps the half of the bracket on the side where `f` is still
/// positive, as dictated by `direction`. The midpoint of the final bracket
/// is returned; if `f` never changes sign the result converges to whichever
/// end the function's sign points at.
pub fn bisect<F>(f: F, lo: Decimal, hi: Decimal, iterations: u32, direction: Monotonicity) -> Decimal
where
    F: Fn(Decimal) -> Decimal,
{
    let mut lo = lo;
    let mut hi = hi;

    for _ in 0..iterations {
        let mid = (lo + hi) / dec!(2);
        let positive = f(mid) > Decimal::ZERO;
        match (direction, positive) {
            (Monotonicity::Decreasing, true) | (Monotonicity::Increasing, false) => lo = mid,
            _ => hi = mid,
        }
    }

    (lo + hi) / dec!(2)
}
