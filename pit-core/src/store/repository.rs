use async_trait::async_trait;
use thiserror::Error;

use crate::models::{RuleSetError, TaxRuleSet};

#[derive(Debug, Error, PartialEq)]
pub enum RuleStoreError {
    #[error("Rule set not found")]
    NotFound,

    #[error("Rule version '{0}' already exists")]
    DuplicateVersion(String),

    #[error("Invalid rule set: {0}")]
    Invalid(#[from] RuleSetError),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Source of versioned rule sets.
///
/// Rule sets are immutable once stored; a new version is inserted rather
/// than an existing one edited.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// The rule set with the latest effective date. Undated rule sets sort
    /// before dated ones; ties go to the most recently inserted.
    async fn latest_rule_set(&self) -> Result<TaxRuleSet, RuleStoreError>;

    async fn rule_set(&self, version: &str) -> Result<TaxRuleSet, RuleStoreError>;

    /// Validates and stores a rule set under its version.
    async fn insert_rule_set(&self, rule_set: TaxRuleSet) -> Result<(), RuleStoreError>;

    /// Stored versions, oldest effective date first.
    async fn list_versions(&self) -> Result<Vec<String>, RuleStoreError>;
}
