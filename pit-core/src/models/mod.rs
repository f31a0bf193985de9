mod business_estimate;
mod rent_relief_policy;
mod tax_band;
mod tax_estimate;
mod tax_rule_set;

pub use business_estimate::{BusinessTaxEstimate, OwnerProfile};
pub use rent_relief_policy::RentReliefPolicy;
pub use tax_band::TaxBand;
pub use tax_estimate::{BandBreakdown, TaxEstimate};
pub use tax_rule_set::{RuleSetError, TaxRuleSet};
