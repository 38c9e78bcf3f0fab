use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MonitoringConfig {
    pub service_name: String,
    #[serde(default)]
    pub logs: EnvFilterConfig,
    #[serde(default)]
    pub traces: EnvFilterConfig,
    pub otlp: Option<OtlpConfig>,
}

#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default)]
pub struct EnvFilterConfig {
    pub default_level: String,
    pub filters: Vec<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct OtlpConfig {
    pub url: Option<String>,
}

impl Default for EnvFilterConfig {
    fn default() -> Self {
        Self {
            default_level: "info".to_owned(),
            filters: vec![],
        }
    }
}

impl TryInto<EnvFilter> for EnvFilterConfig {
    type Error = tracing_subscriber::filter::ParseError;

    fn try_into(self) -> Result<EnvFilter, Self::Error> {
        EnvFilter::builder()
            .with_default_directive(self.default_level.parse()?)
            .parse(self.filters.join(","))
    }
}

/// Keeps the OpenTelemetry providers alive when `otlp` is configured. Pending spans and logs are
/// only exported once [`MonitoringGuard::shutdown`] is called, so a short-lived process must call
/// it before exiting.
#[must_use]
pub struct MonitoringGuard {
    providers: Option<(SdkTracerProvider, SdkLoggerProvider)>,
}

impl MonitoringGuard {
    pub fn shutdown(self) {
        if let Some((tracer_provider, logger_provider)) = self.providers {
            if let Err(e) = tracer_provider.shutdown() {
                eprintln!("Error shutting down tracer provider: {e}");
            }
            if let Err(e) = logger_provider.shutdown() {
                eprintln!("Error shutting down logger provider: {e}");
            }
        }
    }
}

impl MonitoringConfig {
    pub fn init(&self) -> anyhow::Result<MonitoringGuard> {
        let Some(otlp_config) = &self.otlp else {
            let fmt_filter: EnvFilter = self.logs.clone().try_into()?;
            let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
            tracing_subscriber::registry().with(fmt_layer).with(fmt_filter).try_init()?;
            return Ok(MonitoringGuard { providers: None });
        };

        let fmt_filter: EnvFilter = self.logs.clone().try_into()?;
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).with_filter(fmt_filter);

        let resource = Resource::builder()
            .with_attribute(KeyValue::new("service.name", self.service_name.clone()))
            .build();

        opentelemetry::global::set_text_map_propagator(TraceContextPropagator::default());

        let logger_provider = logger_provider(resource.clone(), otlp_config.url.as_deref())?;
        let logging_filter: EnvFilter = self.logs.clone().try_into()?;
        let logging_layer = OpenTelemetryTracingBridge::new(&logger_provider).with_filter(logging_filter);

        let tracer_provider = tracer_provider(resource, otlp_config.url.as_deref())?;
        let tracer = tracer_provider.tracer(self.service_name.clone());
        let tracing_filter: EnvFilter = self.traces.clone().try_into()?;
        let tracing_layer = OpenTelemetryLayer::new(tracer).with_filter(tracing_filter);

        tracing_subscriber::registry()
            .with(tracing_layer)
            .with(logging_layer)
            .with(fmt_layer)
            .try_init()?;

        Ok(MonitoringGuard {
            providers: Some((tracer_provider, logger_provider)),
        })
    }
}

/// Exports to the OTLP collector at `url`, or prints to stdout when no url is given.
fn tracer_provider(resource: Resource, url: Option<&str>) -> Result<SdkTracerProvider, ExporterBuildError> {
    let builder = SdkTracerProvider::builder().with_resource(resource);

    let builder = match url {
        Some(url) => {
            let exporter = SpanExporter::builder().with_tonic().with_endpoint(url).build()?;
            builder.with_batch_exporter(exporter)
        }
        None => builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default()),
    };

    Ok(builder.build())
}

fn logger_provider(resource: Resource, url: Option<&str>) -> Result<SdkLoggerProvider, ExporterBuildError> {
    let builder = SdkLoggerProvider::builder().with_resource(resource);

    let builder = match url {
        Some(url) => {
            let exporter = LogExporter::builder().with_tonic().with_endpoint(url).build()?;
            builder.with_batch_exporter(exporter)
        }
        None => builder.with_simple_exporter(opentelemetry_stdout::LogExporter::default()),
    };

    Ok(builder.build())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn filter_defaults_to_info() {
        let config = EnvFilterConfig::default();

        assert_eq!(config.default_level, "info");
        assert!(config.filters.is_empty());
    }

    #[test]
    fn env_filter_combines_default_level_and_filters() {
        let config = EnvFilterConfig {
            default_level: "warn".to_owned(),
            filters: vec!["yom_tov_rules=debug".to_owned(), "reqwest=info".to_owned()],
        };

        let filter: Result<EnvFilter, _> = config.try_into();
        assert!(filter.is_ok());
    }

    #[test]
    fn invalid_filter_level_is_rejected() {
        let config = EnvFilterConfig {
            default_level: "info".to_owned(),
            filters: vec!["reqwest=loud".to_owned()],
        };

        let filter: Result<EnvFilter, _> = config.try_into();
        assert!(filter.is_err());
    }
}
