//! Money calculation utilities using rust_decimal for precision
//!
//! Ledger amounts are stored as REAL (f64); every derived figure — plan
//! cost deltas, per-session rates — is computed in `Decimal` and rounded
//! to 2 decimal places before going back to storage.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Input values are validated as finite at the handler boundary. If
/// NaN/Infinity somehow reaches here, logs an error and returns ZERO to
/// avoid silent corruption of ledger rows.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        // SAFETY: Decimal rounded to 2dp from amounts bounded at the input
        // boundary is always within f64 representable range
        .expect("Decimal rounded to 2dp is always representable as f64")
}

/// Signed price delta of a plan change: `new − old`, exact to 2 dp.
#[inline]
pub fn cost_delta(new_price: f64, old_price: f64) -> f64 {
    to_f64(to_decimal(new_price) - to_decimal(old_price))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_delta_is_signed_and_exact() {
        assert_eq!(cost_delta(800_000.0, 300_000.0), 500_000.0);
        assert_eq!(cost_delta(300_000.0, 800_000.0), -500_000.0);
        // f64 subtraction would give 0.020000000000000018
        assert_eq!(cost_delta(0.03, 0.01), 0.02);
    }

    #[test]
    fn to_f64_rounds_half_up() {
        assert_eq!(to_f64(Decimal::new(12345, 3)), 12.35); // 12.345
        assert_eq!(to_f64(Decimal::new(-12345, 3)), -12.35);
    }

    #[test]
    fn non_finite_input_becomes_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
        assert_eq!(to_decimal(f64::INFINITY), Decimal::ZERO);
    }
}
