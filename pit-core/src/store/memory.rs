use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::repository::{RuleStore, RuleStoreError};
use crate::models::TaxRuleSet;

/// A [`RuleStore`] held in memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rule_sets: RwLock<Vec<TaxRuleSet>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from rule sets, validating each one.
    ///
    /// # Errors
    /// * [`RuleStoreError::Invalid`] for a rule set that fails validation.
    /// * [`RuleStoreError::DuplicateVersion`] if two share a version.
    pub async fn with_rule_sets(
        rule_sets: impl IntoIterator<Item = TaxRuleSet>,
    ) -> Result<Self, RuleStoreError> {
        let store = Self::new();
        for rule_set in rule_sets {
            store.insert_rule_set(rule_set).await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn latest_rule_set(&self) -> Result<TaxRuleSet, RuleStoreError> {
        let rule_sets = self.rule_sets.read().await;
        rule_sets
            .iter()
            .enumerate()
            .max_by_key(|(index, rule_set)| (rule_set.effective_date, *index))
            .map(|(_, rule_set)| rule_set.clone())
            .ok_or(RuleStoreError::NotFound)
    }

    async fn rule_set(
        &self,
        version: &str,
    ) -> Result<TaxRuleSet, RuleStoreError> {
        let rule_sets = self.rule_sets.read().await;
        rule_sets
            .iter()
            .find(|rule_set| rule_set.version == version)
            .cloned()
            .ok_or(RuleStoreError::NotFound)
    }

    async fn insert_rule_set(
        &self,
        rule_set: TaxRuleSet,
    ) -> Result<(), RuleStoreError> {
        rule_set.validate()?;

        let mut rule_sets = self.rule_sets.write().await;
        if rule_sets.iter().any(|existing| existing.version == rule_set.version) {
            return Err(RuleStoreError::DuplicateVersion(rule_set.version));
        }

        debug!(version = %rule_set.version, effective_date = ?rule_set.effective_date, "rule set stored");
        rule_sets.push(rule_set);
        Ok(())
    }

    async fn list_versions(&self) -> Result<Vec<String>, RuleStoreError> {
        let rule_sets = self.rule_sets.read().await;
        let mut dated: Vec<_> = rule_sets.iter().collect();
        dated.sort_by_key(|rule_set| rule_set.effective_date);
        Ok(dated
            .into_iter()
            .map(|rule_set| rule_set.version.clone())
            .collect())
    }
}
