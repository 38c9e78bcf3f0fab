mod existing;

pub use existing::ExistingRules;

use std::path::Path;
use std::time::Duration;

use derive_more::derive::Display;

use crate::adapter::RuleApi;
use crate::holiday::{self, Holiday, RuleTarget};
use crate::rule::{RuleDate, RuleTemplate};

const UNKNOWN_RULE_ID: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { id: String },
    AlreadyExists { id: String },
    InvalidDate,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[display(
    "{created} created, {already_existing} already existing, {invalid} with invalid date, {failed} failed, {skipped} without date"
)]
pub struct ProvisionSummary {
    pub created: usize,
    pub already_existing: usize,
    pub invalid: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ProvisionSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created { .. } => self.created += 1,
            Outcome::AlreadyExists { .. } => self.already_existing += 1,
            Outcome::InvalidDate => self.invalid += 1,
            Outcome::Failed => self.failed += 1,
        }
    }
}

/// Reads the whole holiday calendar before talking to `api`, so a broken file fails without any request.
pub async fn provision_from_csv<A: RuleApi>(
    api: A,
    csv_file: &Path,
    template: RuleTemplate,
    delay: Duration,
) -> anyhow::Result<ProvisionSummary> {
    let holidays = holiday::read_holidays(csv_file)?;
    tracing::info!("Read {} holidays from {}", holidays.len(), csv_file.display());

    let existing = ExistingRules::fetch(&api).await;
    let mut provisioner = RuleProvisioner::new(api, existing, template, delay);

    tracing::info!("Starting rule provisioning");
    Ok(provisioner.provision_all(&holidays).await)
}

/// Creates one sabbath-mode rule per holiday date that has no rule of the same name yet.
/// Requests are sent one at a time, each followed by `delay` to stay below the API rate limit.
pub struct RuleProvisioner<A: RuleApi> {
    api: A,
    existing: ExistingRules,
    template: RuleTemplate,
    delay: Duration,
}

impl<A: RuleApi> RuleProvisioner<A> {
    pub fn new(api: A, existing: ExistingRules, template: RuleTemplate, delay: Duration) -> Self {
        Self {
            api,
            existing,
            template,
            delay,
        }
    }

    pub async fn provision_all(&mut self, holidays: &[Holiday]) -> ProvisionSummary {
        let mut summary = ProvisionSummary::default();

        for holiday in holidays {
            match holiday.first_days_target() {
                Some(target) => summary.record(&self.provision(&target).await),
                None => {
                    tracing::info!("Skipping {} First Days: No start date provided", holiday.label());
                    summary.skipped += 1;
                }
            }

            match holiday.last_day_target() {
                Some(target) => summary.record(&self.provision(&target).await),
                None => {
                    tracing::info!("Skipping {} Last Day: No last day date provided", holiday.label());
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    #[tracing::instrument(skip_all, fields(rule = %target.name))]
    pub async fn provision(&mut self, target: &RuleTarget) -> Outcome {
        if let Some(id) = self.existing.id_of(&target.name) {
            tracing::info!("Rule '{}' already exists with ID: {}. Skipping.", target.name, id);
            return Outcome::AlreadyExists { id: id.to_owned() };
        }

        let date: RuleDate = match target.date.parse() {
            Ok(date) => date,
            Err(e) => {
                tracing::error!("Invalid date for '{}': {}, {}", target.name, target.date, e);
                return Outcome::InvalidDate;
            }
        };

        let rule = self.template.sabbath_mode_rule(&target.name, date);

        let outcome = match self.api.create_rule(&rule).await {
            Ok(created) => {
                let id = created.id.unwrap_or_else(|| UNKNOWN_RULE_ID.to_owned());
                tracing::info!("Successfully created rule '{}' with ID: {}", target.name, id);
                self.existing.insert(&target.name, &id);
                Outcome::Created { id }
            }
            Err(e) => {
                tracing::error!("Failed to create rule '{}': {:#}", target.name, e);
                Outcome::Failed
            }
        };

        tokio::time::sleep(self.delay).await;

        outcome
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::{Cell, RefCell};

    use crate::adapter::{CreatedRule, RuleApi, RuleSummary};
    use crate::rule::Rule;

    /// In-memory rule store recording every create request.
    #[derive(Default)]
    pub struct FakeRuleApi {
        existing: Vec<RuleSummary>,
        list_fails: bool,
        rejected: Vec<String>,
        pub list_calls: Cell<usize>,
        pub requests: RefCell<Vec<Rule>>,
    }

    impl FakeRuleApi {
        pub fn with_existing(rules: &[(&str, &str)]) -> Self {
            Self {
                existing: rules
                    .iter()
                    .map(|(name, id)| RuleSummary {
                        name: name.to_string(),
                        id: id.to_string(),
                    })
                    .collect(),
                ..Default::default()
            }
        }

        pub fn failing_list() -> Self {
            Self {
                list_fails: true,
                ..Default::default()
            }
        }

        pub fn rejecting(mut self, name: &str) -> Self {
            self.rejected.push(name.to_owned());
            self
        }

        pub fn requested_names(&self) -> Vec<String> {
            self.requests.borrow().iter().map(|rule| rule.name.clone()).collect()
        }
    }

    impl RuleApi for FakeRuleApi {
        async fn list_rules(&self) -> anyhow::Result<Vec<RuleSummary>> {
            self.list_calls.set(self.list_calls.get() + 1);

            if self.list_fails {
                anyhow::bail!("Could not fetch existing rules: 500 Internal Server Error - boom");
            }

            Ok(self.existing.clone())
        }

        async fn create_rule(&self, rule: &Rule) -> anyhow::Result<CreatedRule> {
            let mut requests = self.requests.borrow_mut();
            requests.push(rule.clone());

            if self.rejected.contains(&rule.name) {
                anyhow::bail!("422 Unprocessable Entity - invalid rule");
            }

            Ok(CreatedRule {
                id: Some(format!("new-{}", requests.len())),
            })
        }
    }
}
