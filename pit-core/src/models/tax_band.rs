use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bracket of a progressive tax table.
///
/// `from` is inclusive and `to` is exclusive; a missing `to` marks the
/// unbounded top band. Older rule documents spell the bounds
/// `bandFrom`/`bandTo` or `band_from`/`band_to`; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    #[serde(
        alias = "bandFrom",
        alias = "band_from",
        serialize_with = "rust_decimal::serde::float::serialize"
    )]
    pub from: Decimal,

    #[serde(
        default,
        alias = "bandTo",
        alias = "band_to",
        serialize_with = "rust_decimal::serde::float_option::serialize"
    )]
    pub to: Option<Decimal>,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub rate: Decimal,
}

impl TaxBand {
    pub fn new(
        from: Decimal,
        to: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { from, to, rate }
    }

    pub fn is_unbounded(&self) -> bool {
        self.to.is_none()
    }
}
