use std::collections::HashMap;

use crate::adapter::{RuleApi, RuleSummary};

/// Rule name to rule id of everything already present at the location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingRules(HashMap<String, String>);

impl ExistingRules {
    /// Never fails: if the rules cannot be listed, every rule is treated as new.
    pub async fn fetch(api: &impl RuleApi) -> Self {
        match api.list_rules().await {
            Ok(rules) => {
                let existing: Self = rules.into_iter().collect();
                tracing::info!("Found {} existing rules", existing.len());
                existing
            }
            Err(e) => {
                tracing::warn!("Assuming no existing rules: {:#}", e);
                Self::default()
            }
        }
    }

    pub fn id_of(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(&mut self, name: &str, id: &str) {
        self.0.insert(name.to_owned(), id.to_owned());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<RuleSummary> for ExistingRules {
    fn from_iter<T: IntoIterator<Item = RuleSummary>>(iter: T) -> Self {
        Self(iter.into_iter().map(|rule| (rule.name, rule.id)).collect())
    }
}
