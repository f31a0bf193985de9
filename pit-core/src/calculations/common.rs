//! Common utility functions for tax calculations.
//!
//! This module provides the rounding, clamping and floating-point boundary
//! helpers shared by the estimators.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use super::estimate::EstimateError;

/// Rounds a decimal value to a whole currency unit using half-away-from-zero
/// rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(164999.49)), dec!(164999));
/// assert_eq!(round_whole(dec!(164999.5)), dec!(165000));
/// assert_eq!(round_whole(dec!(-0.5)), dec!(-1)); // Away from zero
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a rate to three decimal places using half-away-from-zero rounding.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::calculations::common::round_rate;
///
/// assert_eq!(round_rate(dec!(0.0825)), dec!(0.083));
/// assert_eq!(round_rate(dec!(0.08249)), dec!(0.082));
/// ```
pub fn round_rate(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a negative input to zero, logging a warning naming the field.
pub fn clamp_non_negative(
    field: &'static str,
    value: Decimal,
) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, value = %value, "negative input clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// Converts a floating-point amount to a [`Decimal`].
///
/// NaN, infinities and values outside the range of [`Decimal`] are rejected
/// with [`EstimateError::InvalidInput`] naming `field`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::calculations::common::amount_from_f64;
///
/// assert_eq!(amount_from_f64("income", 2_000_000.0), Ok(dec!(2000000)));
/// assert!(amount_from_f64("income", f64::NAN).is_err());
/// ```
pub fn amount_from_f64(
    field: &'static str,
    value: f64,
) -> Result<Decimal, EstimateError> {
    if !value.is_finite() {
        return Err(EstimateError::InvalidInput { field, value });
    }
    Decimal::try_from(value).map_err(|_| EstimateError::InvalidInput { field, value })
}
