//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber with OpenTelemetry
//! integration, wiring the crate's `tracing` spans through to the file-based
//! OTLP exporter in [`export`](super::export).

use super::export;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Trace file name under the data directory.
const TRACE_FILE: &str = "rolodex-otlp.json";

/// Initializes the tracing subscriber with file-based OTLP export.
///
/// Sets up a pipeline that filters spans by the configured trace level and
/// writes them as OTLP JSON lines to `rolodex-otlp.json` under the data
/// directory. Observability is optional: if the data directory cannot be
/// created, or a subscriber is already installed, the function quietly does
/// nothing. Safe to call more than once; only the first call takes effect.
///
/// # Parameters
///
/// * `config` - Session configuration carrying the optional `trace_level`
///   (defaults to `"info"`)
pub fn init_tracing(config: &Config) {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let data_dir = crate::infrastructure::paths::data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new(
        "service.name",
        "rolodex",
    )]);
    let provider = export::tracer_provider(data_dir.join(TRACE_FILE), resource);
    let tracer = provider.tracer("rolodex");

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(tracer));

    let _ = subscriber.try_init();
}
