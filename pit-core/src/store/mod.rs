pub mod memory;
pub mod repository;

pub use memory::InMemoryRuleStore;
pub use repository::{RuleStore, RuleStoreError};
