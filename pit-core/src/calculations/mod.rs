//! Personal income tax calculations.
//!
//! Leaves first: [`rent_relief`] and [`allocate`] have no dependencies,
//! [`estimate`] combines them, and the [`extended`] estimators compose the
//! estimate for capital gains and business profit.

pub mod allocator;
pub mod common;
pub mod estimate;
pub mod extended;
pub mod rent_relief;

pub use allocator::{BandAllocation, allocate};
pub use estimate::{EstimateError, EstimateInput, TaxEstimator, estimate, estimate_f64};
pub use extended::{
    CORPORATE_TAX_RATE, business_estimate, estimate_with_gains, estimate_with_gains_f64,
};
pub use rent_relief::rent_relief;
