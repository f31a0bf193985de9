//! Estimators built on top of the personal income tax estimate: one that
//! folds capital gains into ordinary income, and a business estimator that
//! chooses between personal and flat corporate taxation.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use super::common::amount_from_f64;
use super::estimate::{EstimateError, EstimateInput, TaxEstimator, estimate};
use crate::{BusinessTaxEstimate, OwnerProfile, TaxEstimate, TaxRuleSet};

/// Flat rate applied to company profit.
pub const CORPORATE_TAX_RATE: Decimal = Decimal::from_parts(30, 0, 0, false, 2);

fn out_of_range(
    field: &'static str,
    value: Decimal,
) -> EstimateError {
    EstimateError::InvalidInput {
        field,
        value: value.to_f64().unwrap_or(f64::INFINITY),
    }
}

/// Estimates tax with net capital gains added to ordinary income before
/// banding. There is no separate capital gains rate; a net loss reduces
/// income.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidRuleSet`] if the rule set is invalid and
/// [`EstimateError::InvalidInput`] if income plus gains overflows.
pub fn estimate_with_gains(
    total_income: Decimal,
    deductible_expenses: Decimal,
    annual_rent_paid: Decimal,
    net_capital_gains: Decimal,
    rule_set: &TaxRuleSet,
) -> Result<TaxEstimate, EstimateError> {
    let income_with_gains = total_income
        .checked_add(net_capital_gains)
        .ok_or_else(|| out_of_range("net_capital_gains", net_capital_gains))?;

    estimate(
        income_with_gains,
        deductible_expenses,
        annual_rent_paid,
        rule_set,
    )
}

/// Floating-point variant of [`estimate_with_gains`].
///
/// # Errors
///
/// Returns [`EstimateError::InvalidInput`] for NaN or non-finite amounts.
pub fn estimate_with_gains_f64(
    total_income: f64,
    deductible_expenses: f64,
    annual_rent_paid: f64,
    net_capital_gains: f64,
    rule_set: &TaxRuleSet,
) -> Result<TaxEstimate, EstimateError> {
    let input = EstimateInput::from_f64(total_income, deductible_expenses, annual_rent_paid)?;
    let gains = amount_from_f64("net_capital_gains", net_capital_gains)?;

    estimate_with_gains(
        input.total_income,
        input.deductible_expenses,
        input.annual_rent_paid,
        gains,
        rule_set,
    )
}

/// Estimates tax on a business's profit.
///
/// Profit is `turnover − cogs − deductible_ops` and may be negative. A sole
/// proprietor is taxed personally on the profit (a loss yields no tax); any
/// other owner profile pays [`CORPORATE_TAX_RATE`] on the profit, unrounded.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidRuleSet`] if the rule set is invalid,
/// whichever profile is requested.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use pit_core::{OwnerProfile, RentReliefPolicy, TaxBand, TaxRuleSet, business_estimate};
///
/// let rules = TaxRuleSet {
///     version: "v1".to_string(),
///     effective_date: None,
///     bands: vec![TaxBand::new(dec!(0), None, dec!(0.10))],
///     rent_relief: RentReliefPolicy { percent: dec!(0.20), cap: dec!(500000) },
/// };
///
/// let company = business_estimate(
///     dec!(10000000), dec!(4000000), dec!(1000000), OwnerProfile::Company, &rules,
/// ).unwrap();
///
/// assert_eq!(company.profit, dec!(5000000));
/// assert_eq!(company.corporate_estimated_tax, Some(dec!(1500000)));
/// assert_eq!(company.personal_tax, None);
/// ```
pub fn business_estimate(
    turnover: Decimal,
    cogs: Decimal,
    deductible_ops: Decimal,
    owner_profile: OwnerProfile,
    rule_set: &TaxRuleSet,
) -> Result<BusinessTaxEstimate, EstimateError> {
    rule_set.validate()?;

    let profit = turnover
        .checked_sub(cogs)
        .ok_or_else(|| out_of_range("cogs", cogs))?
        .checked_sub(deductible_ops)
        .ok_or_else(|| out_of_range("deductible_ops", deductible_ops))?;

    match owner_profile {
        OwnerProfile::SoleProprietor => {
            let input = EstimateInput::new(profit, Decimal::ZERO, Decimal::ZERO);
            Ok(BusinessTaxEstimate {
                profit,
                personal_tax: Some(TaxEstimator::new(rule_set).calculate(&input)?),
                corporate_estimated_tax: None,
            })
        }
        OwnerProfile::Company => Ok(BusinessTaxEstimate {
            profit,
            personal_tax: None,
            corporate_estimated_tax: Some(profit * CORPORATE_TAX_RATE),
        }),
    }
}
