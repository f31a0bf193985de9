use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Relief granted on rent paid: `percent` of the rent, never more than `cap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentReliefPolicy {
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub percent: Decimal,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub cap: Decimal,
}
