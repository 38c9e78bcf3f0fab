mod http;

pub use http::SmartThingsHttpClient;

use anyhow::Context;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{CreatedRule, RuleSummary};

#[derive(Debug, Deserialize)]
struct RuleListResponse {
    items: Option<Vec<RuleSummary>>,
}

fn parse_rule_list(status: StatusCode, body: &str) -> anyhow::Result<Vec<RuleSummary>> {
    if status != StatusCode::OK {
        anyhow::bail!("Could not fetch existing rules: {} - {}", status, body);
    }

    let response: RuleListResponse =
        serde_json::from_str(body).with_context(|| format!("Rule list response is not valid: {}", body))?;

    response
        .items
        .context("Rule list response does not contain a list of rules")
}

fn parse_created_rule(status: StatusCode, body: &str) -> anyhow::Result<CreatedRule> {
    if !status.is_success() {
        anyhow::bail!("{} - {}", status, body);
    }

    match serde_json::from_str::<CreatedRule>(body) {
        Ok(created) => Ok(created),
        Err(e) => {
            tracing::warn!("Rule was created, but response could not be parsed: {}", e);
            Ok(CreatedRule::default())
        }
    }
}
