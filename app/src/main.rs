use std::process::ExitCode;

use anyhow::Context;
use settings::Settings;

use crate::adapter::smartthings::SmartThingsHttpClient;
use crate::rule::RuleTemplate;

mod adapter;
mod holiday;
mod provision;
mod rule;
mod settings;

#[tokio::main(flavor = "current_thread")]
pub async fn main() -> ExitCode {
    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error reading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let monitoring = match settings.monitoring.init() {
        Ok(monitoring) => monitoring,
        Err(e) => {
            eprintln!("Error initializing monitoring: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let result = run(&settings).await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }

    monitoring.shutdown();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

async fn run(settings: &Settings) -> anyhow::Result<()> {
    let credentials = settings.credentials()?;

    let api = SmartThingsHttpClient::new(&settings.api_url, &credentials.token, &credentials.location_id)
        .context("Error initializing SmartThings client")?;

    let template = RuleTemplate::new(
        &credentials.device_id,
        &credentials.virtual_switch_id,
        &settings.time_zone,
    );

    let summary = provision::provision_from_csv(api, &settings.csv_file, template, settings.request_delay()).await?;
    tracing::info!("Rule provisioning completed: {}", summary);

    Ok(())
}
