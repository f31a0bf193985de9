use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use pit_core::{RentReliefPolicy, RuleSetError, RuleStore, RuleStoreError, TaxBand, TaxRuleSet};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading rule sets.
#[derive(Debug, Error)]
pub enum RuleSetLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Cannot read '{path}': {message}")]
    Io { path: String, message: String },

    #[error("No rule documents found in '{0}'")]
    Empty(String),

    #[error("Rule set '{version}' is invalid: {source}")]
    Invalid {
        version: String,
        #[source]
        source: RuleSetError,
    },

    #[error("Rule store error: {0}")]
    Store(#[from] RuleStoreError),
}

impl From<csv::Error> for RuleSetLoaderError {
    fn from(err: csv::Error) -> Self {
        RuleSetLoaderError::CsvParse(err.to_string())
    }
}

impl From<serde_json::Error> for RuleSetLoaderError {
    fn from(err: serde_json::Error) -> Self {
        RuleSetLoaderError::JsonParse(err.to_string())
    }
}

/// A single record from a band table CSV file.
///
/// - `band_from`: inclusive lower bound of the band
/// - `band_to`: exclusive upper bound (empty for the unbounded top band)
/// - `rate`: the marginal rate as a decimal (e.g. 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TaxBandRecord {
    pub band_from: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub band_to: Option<Decimal>,
    pub rate: Decimal,
}

impl From<TaxBandRecord> for TaxBand {
    fn from(record: TaxBandRecord) -> Self {
        TaxBand::new(record.band_from, record.band_to, record.rate)
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn validated(rule_set: TaxRuleSet) -> Result<TaxRuleSet, RuleSetLoaderError> {
    rule_set
        .validate()
        .map_err(|source| RuleSetLoaderError::Invalid {
            version: rule_set.version.clone(),
            source,
        })?;
    Ok(rule_set)
}

/// Loader for rule sets from JSON documents and CSV band tables.
///
/// Every rule set it returns has passed [`TaxRuleSet::validate`].
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Parse a JSON rule document.
    ///
    /// Both the current field names and the older `pitBands`/`bandFrom` and
    /// `pit_bands`/`band_from` spellings are accepted.
    pub fn from_json_str(json: &str) -> Result<TaxRuleSet, RuleSetLoaderError> {
        validated(serde_json::from_str(json)?)
    }

    /// Parse a JSON rule document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<TaxRuleSet, RuleSetLoaderError> {
        validated(serde_json::from_reader(reader)?)
    }

    /// Parse band records from a CSV reader with the header
    /// `band_from,band_to,rate`.
    pub fn bands_from_csv<R: Read>(reader: R) -> Result<Vec<TaxBand>, RuleSetLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut bands = Vec::new();

        for result in csv_reader.deserialize() {
            let record: TaxBandRecord = result?;
            bands.push(record.into());
        }

        Ok(bands)
    }

    /// Build a rule set from a CSV band table plus the metadata a band table
    /// does not carry.
    pub fn rule_set_from_csv<R: Read>(
        reader: R,
        version: &str,
        effective_date: Option<NaiveDate>,
        rent_relief: RentReliefPolicy,
    ) -> Result<TaxRuleSet, RuleSetLoaderError> {
        validated(TaxRuleSet {
            version: version.to_string(),
            effective_date,
            bands: Self::bands_from_csv(reader)?,
            rent_relief,
        })
    }

    /// Load a single JSON document, or every `*.json` document in a
    /// directory (in file name order).
    pub fn load_path(path: &Path) -> Result<Vec<TaxRuleSet>, RuleSetLoaderError> {
        let io_error = |err: std::io::Error| RuleSetLoaderError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        };

        if !path.is_dir() {
            let json = fs::read_to_string(path).map_err(io_error)?;
            let rule_set = Self::from_json_str(&json)?;
            info!(path = %path.display(), version = %rule_set.version, "rule set loaded");
            return Ok(vec![rule_set]);
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(path).map_err(io_error)? {
            let file = entry.map_err(io_error)?.path();
            if file.extension().is_some_and(|ext| ext == "json") {
                documents.push(file);
            }
        }
        documents.sort();

        if documents.is_empty() {
            return Err(RuleSetLoaderError::Empty(path.display().to_string()));
        }

        let mut rule_sets = Vec::with_capacity(documents.len());
        for document in documents {
            let json = fs::read_to_string(&document).map_err(|err| RuleSetLoaderError::Io {
                path: document.display().to_string(),
                message: err.to_string(),
            })?;
            let rule_set = Self::from_json_str(&json)?;
            debug!(path = %document.display(), version = %rule_set.version, "rule set parsed");
            rule_sets.push(rule_set);
        }

        info!(path = %path.display(), count = rule_sets.len(), "rule sets loaded");
        Ok(rule_sets)
    }

    /// Insert rule sets into a store via the `RuleStore` trait, so any
    /// backend can be seeded.
    ///
    /// Stops at the first rejected rule set (for example a duplicate
    /// version) and returns the number inserted on success.
    pub async fn load_into<S: RuleStore>(
        store: &S,
        rule_sets: Vec<TaxRuleSet>,
    ) -> Result<usize, RuleSetLoaderError> {
        let mut inserted = 0;

        for rule_set in rule_sets {
            store.insert_rule_set(rule_set).await?;
            inserted += 1;
        }

        Ok(inserted)
    }
}
