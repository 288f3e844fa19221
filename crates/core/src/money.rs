//! Decimal money helpers.
//!
//! All monetary values, quantities and rates are `rust_decimal::Decimal` so that
//! tax arithmetic is exact. Operations saturate at the `Decimal` range instead of
//! panicking on hostile input.

use rust_decimal::{Decimal, RoundingStrategy};

/// Monetary amount in currency units (not minor units).
pub type Money = Decimal;

/// Absolute tolerance for comparing two totals (0.01).
pub const MONEY_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// `amount * rate / 100`, with `rate` expressed as a percentage.
pub fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount.saturating_mul(rate / Decimal::ONE_HUNDRED)
}

/// Saturating sum.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// True when `a` and `b` differ by at most [`MONEY_TOLERANCE`].
pub fn within_tolerance(a: Decimal, b: Decimal) -> bool {
    a.saturating_sub(b).abs() <= MONEY_TOLERANCE
}

/// Two-decimal rendering for human-facing text (`232.00`).
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
