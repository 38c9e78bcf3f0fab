use anyhow::Context;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;

use super::{parse_created_rule, parse_rule_list};
use crate::adapter::{CreatedRule, RuleApi, RuleSummary};
use crate::rule::Rule;

#[derive(Debug, Clone)]
pub struct SmartThingsHttpClient {
    client: ClientWithMiddleware,
    rules_url: String,
    location_id: String,
}

impl SmartThingsHttpClient {
    pub fn new(url: &str, token: &str, location_id: &str) -> anyhow::Result<Self> {
        let client = HttpClientConfig::new(Some(token.to_owned())).new_tracing_client()?;

        Ok(Self {
            client,
            rules_url: format!("{}/rules", url.trim_end_matches('/')),
            location_id: location_id.to_owned(),
        })
    }
}

impl RuleApi for SmartThingsHttpClient {
    #[tracing::instrument(skip(self))]
    async fn list_rules(&self) -> anyhow::Result<Vec<RuleSummary>> {
        let response = self
            .client
            .get(&self.rules_url)
            .query(&[("locationId", &self.location_id)])
            .send()
            .await
            .context("Error requesting existing rules")?;

        let status = response.status();
        let body = response.text().await.context("Error reading rule list response")?;

        tracing::info!("Rule list response status: {}", status);
        tracing::debug!("Rule list response content: {}", body);

        parse_rule_list(status, &body)
    }

    #[tracing::instrument(skip_all, fields(rule = %rule.name))]
    async fn create_rule(&self, rule: &Rule) -> anyhow::Result<CreatedRule> {
        tracing::debug!("Creating rule: {}", serde_json::to_string(rule)?);

        let response = self
            .client
            .post(&self.rules_url)
            .query(&[("locationId", &self.location_id)])
            .json(rule)
            .send()
            .await
            .context("Error sending create request")?;

        let status = response.status();
        let body = response.text().await.context("Error reading create response")?;

        parse_created_rule(status, &body)
    }
}
