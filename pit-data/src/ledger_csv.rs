use std::fs::File;
use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use pit_core::{DateRange, LedgerAggregator, LedgerError};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

/// A single record from a ledger CSV file.
///
/// - `date`: ISO date of the transaction
/// - `kind`: `income` or `expense`
/// - `amount`: non-negative amount in whole currency units
/// - `deductible`: whether an expense is tax deductible (empty means no)
/// - `description`: free text, optional
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LedgerRecord {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: Decimal,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub deductible: bool,
    #[serde(default)]
    pub description: String,
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim).map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("false") | Some("no") | Some("0") => Ok(false),
        Some("true") | Some("yes") | Some("1") => Ok(true),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a yes/no flag, got '{other}'"
        ))),
    }
}

/// One taxpayer's ledger, read from CSV.
///
/// Only expenses flagged deductible count toward the expense total.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvLedger {
    records: Vec<LedgerRecord>,
}

impl CsvLedger {
    /// Parse ledger records from a CSV reader.
    ///
    /// # Errors
    /// [`LedgerError::Parse`] for malformed rows or negative amounts.
    pub fn parse<R: Read>(reader: R) -> Result<Self, LedgerError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: LedgerRecord =
                result.map_err(|err| LedgerError::Parse(err.to_string()))?;
            if record.amount < Decimal::ZERO {
                // Header is line 1.
                return Err(LedgerError::Parse(format!(
                    "line {}: negative amount {}",
                    index + 2,
                    record.amount
                )));
            }
            records.push(record);
        }

        debug!(records = records.len(), "ledger parsed");
        Ok(Self { records })
    }

    pub fn from_path(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path)
            .map_err(|err| LedgerError::Io(format!("{}: {err}", path.display())))?;
        let ledger = Self::parse(file)?;
        info!(path = %path.display(), records = ledger.records.len(), "ledger loaded");
        Ok(ledger)
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    fn total(
        &self,
        range: Option<DateRange>,
        include: impl Fn(&LedgerRecord) -> bool,
    ) -> Result<Decimal, LedgerError> {
        let range = range.unwrap_or_default();
        self.records
            .iter()
            .filter(|record| range.contains(record.date) && include(record))
            .try_fold(Decimal::ZERO, |sum, record| {
                sum.checked_add(record.amount)
                    .ok_or_else(|| LedgerError::Parse("ledger total overflows".to_string()))
            })
    }
}

#[async_trait]
impl LedgerAggregator for CsvLedger {
    async fn sum_income(
        &self,
        range: Option<DateRange>,
    ) -> Result<Decimal, LedgerError> {
        self.total(range, |record| record.kind == EntryKind::Income)
    }

    async fn sum_deductible_expenses(
        &self,
        range: Option<DateRange>,
    ) -> Result<Decimal, LedgerError> {
        self.total(range, |record| {
            record.kind == EntryKind::Expense && record.deductible
        })
    }
}
