//! Fixed-point rounding and even-division rules shared by every edit path.
//!
//! Currency amounts carry two decimal places, percentages one. Dividing an
//! amount across rows always rounds each share and hands the leftover to
//! the last row in iteration order, so the parts reconcile to the whole
//! without epsilon comparisons.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a currency amount to two decimal places.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a percentage to one decimal place.
pub fn round_percent(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Derives the display percent for an owed amount against a total.
///
/// Zero when the total is not positive, since no meaningful ratio exists.
pub fn percent_of(owed: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    round_percent(owed / total * Decimal::ONE_HUNDRED)
}

/// Splits `total` into `n` currency shares that sum back exactly.
///
/// Each share but the last is `total / n` rounded to two decimals; the
/// last share absorbs the residual.
pub fn split_evenly(total: Decimal, n: usize) -> Vec<Decimal> {
    if n == 0 {
        return Vec::new();
    }
    let share = round_currency(total / Decimal::from(n as u64));
    let mut shares = vec![share; n];
    let assigned: Decimal = share * Decimal::from((n - 1) as u64);
    shares[n - 1] = total - assigned;
    shares
}

/// Largest paid/owed drift tolerated at submission time.
///
/// Intentional slack for manual entry, not a rounding bug.
pub fn submit_tolerance() -> Decimal {
    Decimal::new(5, 2)
}
