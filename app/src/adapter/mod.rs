pub mod smartthings;

pub use rules::{CreatedRule, RuleApi, RuleSummary};

mod rules {
    use serde::Deserialize;

    use crate::rule::Rule;

    /// Remote store of automation rules, scoped to one location.
    pub trait RuleApi {
        async fn list_rules(&self) -> anyhow::Result<Vec<RuleSummary>>;

        async fn create_rule(&self, rule: &Rule) -> anyhow::Result<CreatedRule>;
    }

    impl<T: RuleApi> RuleApi for &T {
        async fn list_rules(&self) -> anyhow::Result<Vec<RuleSummary>> {
            (**self).list_rules().await
        }

        async fn create_rule(&self, rule: &Rule) -> anyhow::Result<CreatedRule> {
            (**self).create_rule(rule).await
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    pub struct RuleSummary {
        pub name: String,
        pub id: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
    pub struct CreatedRule {
        pub id: Option<String>,
    }
}
