//! Personal income tax estimate.
//!
//! The estimator turns gross income, deductible expenses and rent paid into a
//! [`TaxEstimate`] under a given [`TaxRuleSet`]:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Rent relief: `min(cap, rent × percent)` |
//! | 2    | Taxable income: `income − expenses − relief`, minimum 0 |
//! | 3    | Band allocation of taxable income |
//! | 4    | Raw tax: sum of the unrounded per-band taxes |
//! | 5    | Tax due: raw tax rounded once to a whole unit |
//! | 6    | Band breakdown, rounded per entry for display |
//! | 7    | Monthly (`tax due ÷ 12`) and quarterly (`tax due ÷ 4`) set-aside |
//! | 8    | Effective rate: `tax due ÷ income`, three decimal places |
//!
//! Rounding each band before summing would overstate the tax by up to half
//! a unit per band, so the breakdown is never re-summed into the total.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use pit_core::{RentReliefPolicy, TaxBand, TaxRuleSet, estimate};
//!
//! let rules = TaxRuleSet {
//!     version: "2025-07-01-v1".to_string(),
//!     effective_date: None,
//!     bands: vec![
//!         TaxBand::new(dec!(0), Some(dec!(800000)), dec!(0)),
//!         TaxBand::new(dec!(800000), Some(dec!(3000000)), dec!(0.15)),
//!         TaxBand::new(dec!(3000000), None, dec!(0.18)),
//!     ],
//!     rent_relief: RentReliefPolicy { percent: dec!(0.20), cap: dec!(500000) },
//! };
//!
//! let result = estimate(dec!(2000000), dec!(0), dec!(500000), &rules).unwrap();
//!
//! assert_eq!(result.rent_relief, dec!(100000));
//! assert_eq!(result.taxable_income, dec!(1900000));
//! assert_eq!(result.tax_due, dec!(165000));
//! assert_eq!(result.monthly_tax, dec!(13750));
//! assert_eq!(result.rule_version, "2025-07-01-v1");
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::allocator::{BandAllocation, allocate};
use super::common::{amount_from_f64, clamp_non_negative, max, round_rate, round_whole};
use super::rent_relief::rent_relief;
use crate::{BandBreakdown, RuleSetError, TaxEstimate, TaxRuleSet};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const QUARTERS_PER_YEAR: Decimal = Decimal::from_parts(4, 0, 0, false, 0);

/// Errors that can occur during a tax estimate.
#[derive(Debug, Error, PartialEq)]
pub enum EstimateError {
    /// The rule set failed validation; no default is ever substituted.
    #[error("invalid rule set: {0}")]
    InvalidRuleSet(#[from] RuleSetError),

    /// An input amount was NaN, infinite or out of range.
    #[error("{field} must be a finite amount, got {value}")]
    InvalidInput { field: &'static str, value: f64 },
}

/// Input values for a personal income tax estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateInput {
    /// Gross income for the year, before any deduction.
    pub total_income: Decimal,

    /// Expenses deductible from income.
    pub deductible_expenses: Decimal,

    /// Rent paid over the year, used for rent relief.
    pub annual_rent_paid: Decimal,
}

impl EstimateInput {
    pub fn new(
        total_income: Decimal,
        deductible_expenses: Decimal,
        annual_rent_paid: Decimal,
    ) -> Self {
        Self {
            total_income,
            deductible_expenses,
            annual_rent_paid,
        }
    }

    /// Builds an input from floating-point amounts.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidInput`] naming the first amount that is
    /// NaN, infinite or outside the range of [`Decimal`].
    pub fn from_f64(
        total_income: f64,
        deductible_expenses: f64,
        annual_rent_paid: f64,
    ) -> Result<Self, EstimateError> {
        Ok(Self {
            total_income: amount_from_f64("total_income", total_income)?,
            deductible_expenses: amount_from_f64("deductible_expenses", deductible_expenses)?,
            annual_rent_paid: amount_from_f64("annual_rent_paid", annual_rent_paid)?,
        })
    }
}

/// Calculator for personal income tax estimates.
///
/// Holds a borrowed rule set so one immutable rule set can back any number
/// of concurrent estimates.
#[derive(Debug, Clone, Copy)]
pub struct TaxEstimator<'a> {
    rule_set: &'a TaxRuleSet,
}

impl<'a> TaxEstimator<'a> {
    pub fn new(rule_set: &'a TaxRuleSet) -> Self {
        Self { rule_set }
    }

    /// Calculates the complete estimate.
    ///
    /// Negative amounts are clamped to zero before use.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidRuleSet`] if the rule set fails
    /// [`TaxRuleSet::validate`].
    pub fn calculate(
        &self,
        input: &EstimateInput,
    ) -> Result<TaxEstimate, EstimateError> {
        self.rule_set.validate()?;

        let total_income = clamp_non_negative("total_income", input.total_income);
        let deductible_expenses =
            clamp_non_negative("deductible_expenses", input.deductible_expenses);
        let relief = rent_relief(input.annual_rent_paid, &self.rule_set.rent_relief);

        let taxable_income = self.taxable_income(total_income, deductible_expenses, relief);
        let allocations = allocate(taxable_income, &self.rule_set.bands);
        let tax_due = round_whole(self.raw_tax(&allocations));

        Ok(TaxEstimate {
            taxable_income,
            tax_due,
            rent_relief: relief,
            rule_version: self.rule_set.version.clone(),
            band_breakdown: self.band_breakdown(&allocations),
            monthly_tax: self.monthly_tax(tax_due),
            quarterly_tax: self.quarterly_tax(tax_due),
            effective_rate: self.effective_rate(tax_due, total_income),
        })
    }

    /// Calculates taxable income (minimum 0).
    fn taxable_income(
        &self,
        total_income: Decimal,
        deductible_expenses: Decimal,
        relief: Decimal,
    ) -> Decimal {
        let remaining = total_income
            .saturating_sub(deductible_expenses)
            .saturating_sub(relief);
        max(remaining, Decimal::ZERO)
    }

    /// Sums the unrounded per-band taxes.
    fn raw_tax(
        &self,
        allocations: &[BandAllocation<'_>],
    ) -> Decimal {
        allocations.iter().map(|allocation| allocation.tax).sum()
    }

    /// Builds the display breakdown, rounding each entry independently.
    fn band_breakdown(
        &self,
        allocations: &[BandAllocation<'_>],
    ) -> Vec<BandBreakdown> {
        allocations
            .iter()
            .map(|allocation| BandBreakdown {
                from: allocation.band.from,
                to: allocation.band.to,
                rate: allocation.band.rate,
                taxable_amount: round_whole(allocation.taxable_amount),
                tax_for_band: round_whole(allocation.tax),
            })
            .collect()
    }

    fn monthly_tax(
        &self,
        tax_due: Decimal,
    ) -> Decimal {
        round_whole(tax_due / MONTHS_PER_YEAR)
    }

    fn quarterly_tax(
        &self,
        tax_due: Decimal,
    ) -> Decimal {
        round_whole(tax_due / QUARTERS_PER_YEAR)
    }

    /// Tax due as a share of total income, or zero without income.
    fn effective_rate(
        &self,
        tax_due: Decimal,
        total_income: Decimal,
    ) -> Decimal {
        if total_income > Decimal::ZERO {
            round_rate(tax_due / total_income)
        } else {
            Decimal::ZERO
        }
    }
}

/// Estimates personal income tax under `rule_set`.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidRuleSet`] if the rule set is invalid.
pub fn estimate(
    total_income: Decimal,
    deductible_expenses: Decimal,
    annual_rent_paid: Decimal,
    rule_set: &TaxRuleSet,
) -> Result<TaxEstimate, EstimateError> {
    let input = EstimateInput::new(total_income, deductible_expenses, annual_rent_paid);
    TaxEstimator::new(rule_set).calculate(&input)
}

/// Estimates personal income tax from floating-point amounts.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidInput`] for NaN or non-finite amounts and
/// [`EstimateError::InvalidRuleSet`] if the rule set is invalid.
pub fn estimate_f64(
    total_income: f64,
    deductible_expenses: f64,
    annual_rent_paid: f64,
    rule_set: &TaxRuleSet,
) -> Result<TaxEstimate, EstimateError> {
    let input = EstimateInput::from_f64(total_income, deductible_expenses, annual_rent_paid)?;
    TaxEstimator::new(rule_set).calculate(&input)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{RentReliefPolicy, TaxBand};

    fn test_rules() -> TaxRuleSet {
        TaxRuleSet {
            version: "2025-07-01-v1".to_string(),
            effective_date: None,
            bands: vec![
                TaxBand::new(dec!(0), Some(dec!(800000)), dec!(0)),
                TaxBand::new(dec!(800000), Some(dec!(3000000)), dec!(0.15)),
                TaxBand::new(dec!(3000000), Some(dec!(12000000)), dec!(0.18)),
                TaxBand::new(dec!(12000000), Some(dec!(25000000)), dec!(0.21)),
                TaxBand::new(dec!(25000000), Some(dec!(50000000)), dec!(0.23)),
                TaxBand::new(dec!(50000000), None, dec!(0.25)),
            ],
            rent_relief: RentReliefPolicy {
                percent: dec!(0.20),
                cap: dec!(500000),
            },
        }
    }

    // =========================================================================
    // taxable_income tests
    // =========================================================================

    #[test]
    fn taxable_income_subtracts_expenses_and_relief() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        let result = estimator.taxable_income(dec!(2000000), dec!(300000), dec!(100000));

        assert_eq!(result, dec!(1600000));
    }

    #[test]
    fn taxable_income_returns_zero_when_deductions_exceed_income() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        let result = estimator.taxable_income(dec!(1000000), dec!(2000000), dec!(0));

        assert_eq!(result, dec!(0));
    }

    // =========================================================================
    // raw_tax / band_breakdown tests
    // =========================================================================

    #[test]
    fn raw_tax_is_not_rounded_per_band() {
        let rules = TaxRuleSet {
            bands: vec![
                TaxBand::new(dec!(0), Some(dec!(3)), dec!(0.15)),
                TaxBand::new(dec!(3), Some(dec!(6)), dec!(0.15)),
                TaxBand::new(dec!(6), None, dec!(0.15)),
            ],
            ..test_rules()
        };
        let estimator = TaxEstimator::new(&rules);
        let allocations = allocate(dec!(9), &rules.bands);

        // Each band owes 0.45, which would display as 0 but sums to 1.35.
        assert_eq!(estimator.raw_tax(&allocations), dec!(1.35));
        let breakdown = estimator.band_breakdown(&allocations);
        assert!(breakdown.iter().all(|b| b.tax_for_band == dec!(0)));
    }

    #[test]
    fn band_breakdown_copies_band_bounds() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);
        let allocations = allocate(dec!(60000000), &rules.bands);

        let breakdown = estimator.band_breakdown(&allocations);

        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[5].from, dec!(50000000));
        assert_eq!(breakdown[5].to, None);
        assert_eq!(breakdown[5].rate, dec!(0.25));
        assert_eq!(breakdown[5].taxable_amount, dec!(10000000));
        assert_eq!(breakdown[5].tax_for_band, dec!(2500000));
    }

    // =========================================================================
    // periodic figures tests
    // =========================================================================

    #[test]
    fn monthly_tax_rounds_to_whole_units() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        assert_eq!(estimator.monthly_tax(dec!(165000)), dec!(13750));
        assert_eq!(estimator.monthly_tax(dec!(100)), dec!(8)); // 8.33
        assert_eq!(estimator.monthly_tax(dec!(102)), dec!(9)); // 8.5
    }

    #[test]
    fn quarterly_tax_rounds_to_whole_units() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        assert_eq!(estimator.quarterly_tax(dec!(165000)), dec!(41250));
        assert_eq!(estimator.quarterly_tax(dec!(10)), dec!(3)); // 2.5
    }

    #[test]
    fn effective_rate_is_zero_without_income() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        assert_eq!(estimator.effective_rate(dec!(0), dec!(0)), dec!(0));
    }

    #[test]
    fn effective_rate_rounds_to_three_places() {
        let rules = test_rules();
        let estimator = TaxEstimator::new(&rules);

        // 165000 / 2000000 = 0.0825
        assert_eq!(estimator.effective_rate(dec!(165000), dec!(2000000)), dec!(0.083));
    }

    // =========================================================================
    // calculate (integration) tests
    // =========================================================================

    #[test]
    fn calculate_income_below_first_taxed_band() {
        let result = estimate(dec!(500000), dec!(0), dec!(0), &test_rules()).unwrap();

        assert_eq!(result.taxable_income, dec!(500000));
        assert_eq!(result.tax_due, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_income_in_second_band() {
        let result = estimate(dec!(2000000), dec!(0), dec!(0), &test_rules()).unwrap();

        assert_eq!(result.taxable_income, dec!(2000000));
        assert_eq!(result.tax_due, dec!(180000));
        assert_eq!(result.monthly_tax, dec!(15000));
        assert_eq!(result.quarterly_tax, dec!(45000));
        assert_eq!(result.effective_rate, dec!(0.09));
    }

    #[test]
    fn calculate_applies_rent_relief() {
        let result = estimate(dec!(2000000), dec!(0), dec!(500000), &test_rules()).unwrap();

        assert_eq!(result.rent_relief, dec!(100000));
        assert_eq!(result.taxable_income, dec!(1900000));
        assert_eq!(result.tax_due, dec!(165000));
    }

    #[test]
    fn calculate_caps_rent_relief() {
        let result = estimate(dec!(5000000), dec!(0), dec!(3000000), &test_rules()).unwrap();

        assert_eq!(result.rent_relief, dec!(500000));
        assert_eq!(result.taxable_income, dec!(4500000));
        // 2200000 × 0.15 + 1500000 × 0.18
        assert_eq!(result.tax_due, dec!(600000));
    }

    #[test]
    fn calculate_deductions_exceeding_income() {
        let result = estimate(dec!(1000000), dec!(2000000), dec!(0), &test_rules()).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
        assert!(result.band_breakdown.is_empty());
    }

    #[test]
    fn calculate_spans_five_bands() {
        let result = estimate(dec!(30000000), dec!(0), dec!(0), &test_rules()).unwrap();

        let taxes: Vec<_> = result
            .band_breakdown
            .iter()
            .map(|b| (b.taxable_amount, b.tax_for_band))
            .collect();
        assert_eq!(
            taxes,
            vec![
                (dec!(800000), dec!(0)),
                (dec!(2200000), dec!(330000)),
                (dec!(9000000), dec!(1620000)),
                (dec!(13000000), dec!(2730000)),
                (dec!(5000000), dec!(1150000)),
            ]
        );
        assert_eq!(result.tax_due, dec!(5830000));
        assert_eq!(result.effective_rate, dec!(0.194));
    }

    #[test]
    fn calculate_rounds_total_once() {
        // 800003 taxable: 3 × 0.15 = 0.45, rounds to 0.
        let result = estimate(dec!(800003), dec!(0), dec!(0), &test_rules()).unwrap();
        assert_eq!(result.tax_due, dec!(0));

        // 800004 taxable: 4 × 0.15 = 0.60, rounds to 1.
        let result = estimate(dec!(800004), dec!(0), dec!(0), &test_rules()).unwrap();
        assert_eq!(result.tax_due, dec!(1));
    }

    #[test]
    fn calculate_rounds_half_away_from_zero() {
        let rules = TaxRuleSet {
            bands: vec![TaxBand::new(dec!(0), None, dec!(0.5))],
            ..test_rules()
        };

        let result = estimate(dec!(5), dec!(0), dec!(0), &rules).unwrap();

        assert_eq!(result.tax_due, dec!(3)); // 2.5
    }

    #[test]
    fn calculate_clamps_negative_inputs() {
        let result = estimate(dec!(-100), dec!(-500), dec!(-1000), &test_rules()).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.rent_relief, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
        assert_eq!(result.effective_rate, dec!(0));
    }

    #[test]
    fn calculate_saturates_huge_deductions() {
        let result = estimate(dec!(0), Decimal::MAX, dec!(10), &test_rules()).unwrap();

        assert_eq!(result.rent_relief, dec!(2));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax_due, dec!(0));
    }

    #[test]
    fn calculate_negative_expenses_do_not_increase_income() {
        let result = estimate(dec!(2000000), dec!(-1000000), dec!(0), &test_rules()).unwrap();

        assert_eq!(result.taxable_income, dec!(2000000));
    }

    #[test]
    fn calculate_echoes_rule_version() {
        let mut rules = test_rules();
        rules.version = "custom/v9".to_string();

        let result = estimate(dec!(1), dec!(0), dec!(0), &rules).unwrap();

        assert_eq!(result.rule_version, "custom/v9");
    }

    #[test]
    fn calculate_rejects_invalid_rule_set() {
        let rules = TaxRuleSet {
            bands: vec![],
            ..test_rules()
        };

        let result = estimate(dec!(2000000), dec!(0), dec!(0), &rules);

        assert_eq!(result, Err(EstimateError::InvalidRuleSet(RuleSetError::NoBands)));
    }

    #[test]
    fn calculate_is_idempotent() {
        let rules = test_rules();

        let first = estimate(dec!(7654321.99), dec!(12345.67), dec!(800000), &rules).unwrap();
        let second = estimate(dec!(7654321.99), dec!(12345.67), dec!(800000), &rules).unwrap();

        assert_eq!(first, second);
    }

    // =========================================================================
    // estimate_f64 tests
    // =========================================================================

    #[test]
    fn estimate_f64_matches_decimal_estimate() {
        let rules = test_rules();

        let result = estimate_f64(2_000_000.0, 0.0, 500_000.0, &rules).unwrap();

        assert_eq!(result.tax_due, dec!(165000));
    }

    #[test]
    fn estimate_f64_rejects_nan_income() {
        let result = estimate_f64(f64::NAN, 0.0, 0.0, &test_rules());

        assert!(matches!(
            result,
            Err(EstimateError::InvalidInput { field: "total_income", .. })
        ));
    }

    #[test]
    fn estimate_f64_rejects_infinite_rent() {
        let result = estimate_f64(1.0, 0.0, f64::INFINITY, &test_rules());

        assert_eq!(
            result,
            Err(EstimateError::InvalidInput {
                field: "annual_rent_paid",
                value: f64::INFINITY,
            })
        );
    }

    #[test]
    fn estimate_f64_checks_input_before_rule_set() {
        let rules = TaxRuleSet {
            bands: vec![],
            ..test_rules()
        };

        let result = estimate_f64(1.0, f64::NAN, 0.0, &rules);

        assert!(matches!(
            result,
            Err(EstimateError::InvalidInput { field: "deductible_expenses", .. })
        ));
    }

    // =========================================================================
    // serde tests
    // =========================================================================

    #[test]
    fn estimate_serializes_wire_field_names() {
        let result = estimate(dec!(2000000), dec!(0), dec!(0), &test_rules()).unwrap();

        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["taxableIncome"], serde_json::json!(2000000.0));
        assert_eq!(json["taxDue"], serde_json::json!(180000.0));
        assert_eq!(json["rentRelief"], serde_json::json!(0.0));
        assert_eq!(json["ruleVersion"], serde_json::json!("2025-07-01-v1"));
        assert_eq!(json["monthlyTax"], serde_json::json!(15000.0));
        assert_eq!(json["quarterlyTax"], serde_json::json!(45000.0));
        assert_eq!(json["effectiveRate"], serde_json::json!(0.09));
        assert_eq!(
            json["bandBreakdown"][1],
            serde_json::json!({
                "from": 800000.0,
                "to": 3000000.0,
                "rate": 0.15,
                "taxableAmount": 1200000.0,
                "taxForBand": 180000.0,
            })
        );
    }
}
