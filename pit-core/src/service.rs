//! Ledger-backed estimates: resolves a rule set from a [`RuleStore`], sums a
//! [`LedgerAggregator`], and runs the estimate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::calculations::{EstimateError, estimate};
use crate::ledger::{DateRange, LedgerAggregator, LedgerError};
use crate::models::{TaxEstimate, TaxRuleSet};
use crate::store::{RuleStore, RuleStoreError};

#[derive(Debug, Error, PartialEq)]
pub enum ServiceError {
    #[error("Rule store error: {0}")]
    RuleStore(#[from] RuleStoreError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Estimate error: {0}")]
    Estimate(#[from] EstimateError),
}

/// A ledger-backed estimate together with the totals that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxReport {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_income: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_expenses: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub annual_rent_paid: Decimal,
    pub tax_calculation: TaxEstimate,
}

pub struct EstimateService<S, L> {
    store: S,
    ledger: L,
}

impl<S, L> EstimateService<S, L>
where
    S: RuleStore,
    L: LedgerAggregator,
{
    pub fn new(
        store: S,
        ledger: L,
    ) -> Self {
        Self { store, ledger }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The named rule set, or the latest one when `version` is `None`.
    pub async fn rule_set(
        &self,
        version: Option<&str>,
    ) -> Result<TaxRuleSet, ServiceError> {
        let rule_set = match version {
            Some(version) => self.store.rule_set(version).await?,
            None => self.store.latest_rule_set().await?,
        };
        debug!(version = %rule_set.version, "rule set resolved");
        Ok(rule_set)
    }

    /// Estimates tax on the ledger's totals within `range`.
    ///
    /// # Errors
    /// * [`ServiceError::RuleStore`] if the rule set cannot be resolved.
    /// * [`ServiceError::Ledger`] if the ledger cannot be summed.
    /// * [`ServiceError::Estimate`] if the rule set is invalid.
    pub async fn report(
        &self,
        range: Option<DateRange>,
        annual_rent_paid: Decimal,
        version: Option<&str>,
    ) -> Result<TaxReport, ServiceError> {
        let rule_set = self.rule_set(version).await?;
        let total_income = self.ledger.sum_income(range).await?;
        let total_expenses = self.ledger.sum_deductible_expenses(range).await?;

        let tax_calculation = estimate(total_income, total_expenses, annual_rent_paid, &rule_set)?;
        info!(
            version = %rule_set.version,
            total_income = %total_income,
            total_expenses = %total_expenses,
            tax_due = %tax_calculation.tax_due,
            "tax report produced"
        );

        Ok(TaxReport {
            total_income,
            total_expenses,
            annual_rent_paid,
            tax_calculation,
        })
    }
}
