use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{RentReliefPolicy, TaxBand};

/// Defects that make a rule set unusable for estimation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleSetError {
    #[error("rule set has no tax bands")]
    NoBands,

    #[error("rule set has no unbounded top band")]
    NoUnboundedBand,

    #[error("band {0} is unbounded but is not the last band")]
    UnboundedBandNotLast(usize),

    #[error("band {0} has an upper bound that is not above its lower bound")]
    EmptyBand(usize),

    #[error("band {index} starts at {found}, expected {expected} (bands must be contiguous)")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("band {index} has rate {rate}, rates must lie in [0, 1)")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("first band starts at {0}, which is negative")]
    NegativeBandStart(Decimal),

    #[error("rent relief percent must lie in [0, 1], got {0}")]
    InvalidReliefPercent(Decimal),

    #[error("rent relief cap must be non-negative, got {0}")]
    NegativeReliefCap(Decimal),
}

/// A versioned table of tax bands plus the rent relief policy in force.
///
/// Rule sets are created and versioned by a [`RuleStore`](crate::RuleStore);
/// the estimator only reads them. Legacy documents that name the bands
/// `pitBands`/`pit_bands` or carry extra keys (such as a flat `cgt` rate)
/// still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRuleSet {
    /// Opaque tag echoed into every estimate produced with this rule set.
    pub version: String,

    /// Date from which the rule set applies. Used to pick the latest set.
    #[serde(default, alias = "effective_date", skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,

    #[serde(alias = "pitBands", alias = "pit_bands")]
    pub bands: Vec<TaxBand>,

    #[serde(alias = "rent_relief")]
    pub rent_relief: RentReliefPolicy,
}

impl TaxRuleSet {
    /// Checks the band table and relief policy.
    ///
    /// A valid table is non-empty, starts at a non-negative amount, has
    /// strictly increasing contiguous bands (`band[i].to == band[i + 1].from`)
    /// with rates in `[0, 1)`, and ends with exactly one unbounded band.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use pit_core::{RentReliefPolicy, RuleSetError, TaxBand, TaxRuleSet};
    ///
    /// let rules = TaxRuleSet {
    ///     version: "gap".to_string(),
    ///     effective_date: None,
    ///     bands: vec![
    ///         TaxBand::new(dec!(0), Some(dec!(800000)), dec!(0)),
    ///         TaxBand::new(dec!(800001), None, dec!(0.15)),
    ///     ],
    ///     rent_relief: RentReliefPolicy { percent: dec!(0.2), cap: dec!(500000) },
    /// };
    ///
    /// assert_eq!(
    ///     rules.validate(),
    ///     Err(RuleSetError::NotContiguous {
    ///         index: 1,
    ///         expected: dec!(800000),
    ///         found: dec!(800001),
    ///     })
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), RuleSetError> {
        let first = self.bands.first().ok_or(RuleSetError::NoBands)?;
        if first.from < Decimal::ZERO {
            return Err(RuleSetError::NegativeBandStart(first.from));
        }

        let last_index = self.bands.len() - 1;
        for (index, band) in self.bands.iter().enumerate() {
            if band.rate < Decimal::ZERO || band.rate >= Decimal::ONE {
                return Err(RuleSetError::InvalidRate {
                    index,
                    rate: band.rate,
                });
            }

            match band.to {
                None if index != last_index => {
                    return Err(RuleSetError::UnboundedBandNotLast(index));
                }
                None => {}
                Some(to) => {
                    if to <= band.from {
                        return Err(RuleSetError::EmptyBand(index));
                    }
                    if let Some(next) = self.bands.get(index + 1) {
                        if next.from != to {
                            return Err(RuleSetError::NotContiguous {
                                index: index + 1,
                                expected: to,
                                found: next.from,
                            });
                        }
                    }
                }
            }
        }

        if !self.bands[last_index].is_unbounded() {
            return Err(RuleSetError::NoUnboundedBand);
        }

        let relief = &self.rent_relief;
        if relief.percent < Decimal::ZERO || relief.percent > Decimal::ONE {
            return Err(RuleSetError::InvalidReliefPercent(relief.percent));
        }
        if relief.cap < Decimal::ZERO {
            return Err(RuleSetError::NegativeReliefCap(relief.cap));
        }

        Ok(())
    }

    /// Highest marginal rate in the table, or zero for an empty table.
    pub fn max_rate(&self) -> Decimal {
        self.bands
            .iter()
            .map(|band| band.rate)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}
