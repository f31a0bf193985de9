use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band's share of an estimate, rounded for display.
///
/// The rounded `tax_for_band` values are presentation-only and need not sum
/// to [`TaxEstimate::tax_due`], which is rounded once from the unrounded total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandBreakdown {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub from: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float_option::serialize")]
    pub to: Option<Decimal>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rate: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub taxable_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub tax_for_band: Decimal,
}

/// Result of a personal income tax estimate. Field names are the JSON wire
/// contract consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxEstimate {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub taxable_income: Decimal,

    /// Whole currency units, rounded half away from zero.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub tax_due: Decimal,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rent_relief: Decimal,

    pub rule_version: String,

    /// Bands that received a positive allocation, lowest first.
    pub band_breakdown: Vec<BandBreakdown>,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub monthly_tax: Decimal,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub quarterly_tax: Decimal,

    /// `tax_due / total_income` to three decimal places.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub effective_rate: Decimal,
}
