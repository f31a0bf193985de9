//! Interface to the ledger that supplies the estimator's income and expense
//! totals. A ledger instance belongs to a single taxpayer.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Ledger parse error: {0}")]
    Parse(String),

    #[error("Ledger I/O error: {0}")]
    Io(String),
}

/// Inclusive date window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Self {
        Self { start, end }
    }

    pub fn contains(
        &self,
        date: NaiveDate,
    ) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }
}

/// Sums a taxpayer's records into the two scalars the estimator consumes.
#[async_trait]
pub trait LedgerAggregator: Send + Sync {
    /// Total income dated within `range` (all records when `None`).
    async fn sum_income(
        &self,
        range: Option<DateRange>,
    ) -> Result<Decimal, LedgerError>;

    /// Total deductible expenses dated within `range`.
    async fn sum_deductible_expenses(
        &self,
        range: Option<DateRange>,
    ) -> Result<Decimal, LedgerError>;
}
