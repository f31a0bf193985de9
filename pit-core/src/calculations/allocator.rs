//! Progressive band allocation.
//!
//! Taxable income is poured into the band table from the lowest band up.
//! Each band takes at most its width (`to - from`); the unbounded top band
//! takes whatever remains. Bounds are inclusive of `from` and exclusive of
//! `to`, so a unit of income equal to a band's `to` falls into the next band.
//!
//! No rounding happens here. Amounts and taxes are exact decimal products;
//! rounding is applied once to the total by the estimator.

use rust_decimal::Decimal;

use super::common::max;
use crate::TaxBand;

/// Income allocated to a single band and the tax it attracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandAllocation<'a> {
    pub band: &'a TaxBand,
    pub taxable_amount: Decimal,
    pub tax: Decimal,
}

/// Partitions `taxable_income` across `bands`.
///
/// Bands are visited in the order given (ascending `from` for a validated
/// table). A band whose floor is at or above the taxable income is skipped
/// rather than ending the walk, so a later band can still be reached.
/// Bands that receive nothing are omitted from the result. Negative income
/// is treated as zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::TaxBand;
/// use pit_core::calculations::allocate;
///
/// let bands = vec![
///     TaxBand::new(dec!(0), Some(dec!(800000)), dec!(0)),
///     TaxBand::new(dec!(800000), None, dec!(0.15)),
/// ];
///
/// let allocations = allocate(dec!(2000000), &bands);
///
/// assert_eq!(allocations.len(), 2);
/// assert_eq!(allocations[1].taxable_amount, dec!(1200000));
/// assert_eq!(allocations[1].tax, dec!(180000));
/// ```
pub fn allocate(
    taxable_income: Decimal,
    bands: &[TaxBand],
) -> Vec<BandAllocation<'_>> {
    let taxable_income = max(taxable_income, Decimal::ZERO);
    let mut remaining = taxable_income;
    let mut allocations = Vec::new();

    for band in bands {
        if remaining <= Decimal::ZERO {
            break;
        }
        if taxable_income <= band.from {
            continue;
        }

        let width = match band.to {
            Some(to) => max(to - band.from, Decimal::ZERO),
            None => remaining,
        };
        let amount_in_band = remaining.min(width);
        if amount_in_band <= Decimal::ZERO {
            continue;
        }

        allocations.push(BandAllocation {
            band,
            taxable_amount: amount_in_band,
            tax: amount_in_band * band.rate,
        });
        remaining -= amount_in_band;
    }

    allocations
}
