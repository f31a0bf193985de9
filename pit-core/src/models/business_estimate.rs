use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxEstimate;

/// How a business owner is taxed.
///
/// Sole proprietors pay personal income tax on profit; every other
/// ownership form is treated as a company paying a flat corporate rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerProfile {
    SoleProprietor,
    Company,
}

impl OwnerProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            OwnerProfile::SoleProprietor => "sole_proprietor",
            OwnerProfile::Company => "company",
        }
    }
}

impl fmt::Display for OwnerProfile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any profile other than `sole_proprietor` parses as [`OwnerProfile::Company`].
impl FromStr for OwnerProfile {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "sole_proprietor" {
            Ok(OwnerProfile::SoleProprietor)
        } else {
            Ok(OwnerProfile::Company)
        }
    }
}

/// Business tax estimate. Exactly one of `personal_tax` and
/// `corporate_estimated_tax` is present, depending on the owner profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessTaxEstimate {
    /// Turnover less cost of goods sold and deductible operating costs.
    /// Not clamped; a loss is reported as a negative profit.
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub profit: Decimal,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_tax: Option<TaxEstimate>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub corporate_estimated_tax: Option<Decimal>,
}
