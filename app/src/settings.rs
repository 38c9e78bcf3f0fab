use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use derive_more::derive::{Display, Error};
use infrastructure::MonitoringConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub csv_file: PathBuf,
    pub time_zone: String,
    pub request_delay_ms: u64,
    pub monitoring: MonitoringConfig,

    smartthings_token: Option<String>,
    device_id: Option<String>,
    location_id: Option<String>,
    virtual_switch_id: Option<String>,
}

/// Account and device identifiers, all guaranteed to be non-empty.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub device_id: String,
    pub location_id: String,
    pub virtual_switch_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Please set {} environment variables", missing.join(", "))]
pub struct MissingCredentials {
    pub missing: Vec<&'static str>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(Environment::default())
    }

    fn load(environment: Environment) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("api_url", "https://api.smartthings.com/v1")?
            .set_default("csv_file", "yom_tov_dates.csv")?
            .set_default("time_zone", "America/New_York")?
            .set_default("request_delay_ms", 1000)?
            .set_default("monitoring.service_name", env!("CARGO_PKG_NAME"))?
            .add_source(File::with_name("config.toml").required(false))
            .add_source(environment);

        let s = builder.build()?;
        s.try_deserialize()
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn credentials(&self) -> Result<Credentials, MissingCredentials> {
        let mut missing = vec![];

        let token = required("SMARTTHINGS_TOKEN", &self.smartthings_token, &mut missing);
        let device_id = required("DEVICE_ID", &self.device_id, &mut missing);
        let location_id = required("LOCATION_ID", &self.location_id, &mut missing);
        let virtual_switch_id = required("VIRTUAL_SWITCH_ID", &self.virtual_switch_id, &mut missing);

        if !missing.is_empty() {
            return Err(MissingCredentials { missing });
        }

        Ok(Credentials {
            token,
            device_id,
            location_id,
            virtual_switch_id,
        })
    }
}

fn required(name: &'static str, value: &Option<String>, missing: &mut Vec<&'static str>) -> String {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => value.to_owned(),
        _ => {
            missing.push(name);
            String::new()
        }
    }
}
