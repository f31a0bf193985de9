//! Rent relief: a percentage of annual rent paid, capped at a fixed amount.

use rust_decimal::Decimal;

use super::common::clamp_non_negative;
use crate::RentReliefPolicy;

/// Computes `min(policy.cap, annual_rent_paid * policy.percent)`.
///
/// Negative rent is clamped to zero, so the result always lies in
/// `[0, policy.cap]` for a validated policy.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::RentReliefPolicy;
/// use pit_core::calculations::rent_relief;
///
/// let policy = RentReliefPolicy { percent: dec!(0.20), cap: dec!(500000) };
///
/// assert_eq!(rent_relief(dec!(500000), &policy), dec!(100000));
/// assert_eq!(rent_relief(dec!(3000000), &policy), dec!(500000));
/// ```
pub fn rent_relief(
    annual_rent_paid: Decimal,
    policy: &RentReliefPolicy,
) -> Decimal {
    let rent = clamp_non_negative("annual_rent_paid", annual_rent_paid);

    // A rent large enough to overflow the product is far above any cap.
    match rent.checked_mul(policy.percent) {
        Some(relief) => relief.min(policy.cap),
        None => policy.cap,
    }
}
