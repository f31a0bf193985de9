pub mod calculations;
pub mod ledger;
pub mod models;
pub mod service;
pub mod store;

pub use calculations::{
    CORPORATE_TAX_RATE, EstimateError, EstimateInput, TaxEstimator, business_estimate, estimate,
    estimate_f64, estimate_with_gains, estimate_with_gains_f64,
};
pub use ledger::{DateRange, LedgerAggregator, LedgerError};
pub use models::*;
pub use service::{EstimateService, ServiceError, TaxReport};
pub use store::{InMemoryRuleStore, RuleStore, RuleStoreError};
