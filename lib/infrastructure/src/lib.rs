mod http;
mod monitoring;

pub use monitoring::{EnvFilterConfig, MonitoringConfig, MonitoringGuard, OtlpConfig};

pub use http::client::HttpClientConfig;
