//! Telemetry for Parley
//!
//! Structured logging via the `tracing` ecosystem, with optional OTLP span
//! export.

#![allow(clippy::must_use_candidate)]

mod metadata;

use opentelemetry::{global, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use parley_config::{ExportProtocol, ExporterConfig, LogFormat, TelemetryConfig, TracingConfig};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Guard that flushes and shuts down span export on drop
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("failed to shutdown tracer provider: {e}");
        }
    }
}

/// Initialize telemetry from configuration
///
/// Installs the global `tracing` subscriber: a text or JSON log layer
/// filtered by `log_filter`, plus an OTLP span layer when an exporter is
/// configured. Returns a guard that must be held for the lifetime of the
/// application.
///
/// # Errors
///
/// Returns an error if the OTLP exporter cannot be built or a global
/// subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<TelemetryGuard> {
    let filter = EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match config.map_or(LogFormat::Text, |c| c.format) {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed(),
    };

    let tracer_provider = match config {
        Some(telemetry_config) => match telemetry_config.exporter {
            Some(ref exporter) => Some(init_tracer(telemetry_config, exporter)?),
            None => None,
        },
        None => None,
    };

    let otel_layer = tracer_provider.as_ref().map(|provider| {
        global::set_tracer_provider(provider.clone());
        tracing_opentelemetry::layer().with_tracer(provider.tracer("parley"))
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(TelemetryGuard { tracer_provider })
}

/// Initialize OTLP trace export
fn init_tracer(config: &TelemetryConfig, exporter: &ExporterConfig) -> anyhow::Result<SdkTracerProvider> {
    let resource = metadata::build_resource(config);
    let exporter = build_span_exporter(exporter)?;

    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(sampler(config.tracing.as_ref()))
        .with_batch_exporter(exporter)
        .build();

    Ok(provider)
}

/// Pick the span sampler for the configured rate
fn sampler(tracing: Option<&TracingConfig>) -> Sampler {
    let sampling_rate = tracing.map_or(1.0, |t| t.sampling_rate);

    let sampler = if sampling_rate >= 1.0 {
        Sampler::AlwaysOn
    } else if sampling_rate <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(sampling_rate)
    };

    if tracing.is_none_or(|t| t.parent_based) {
        Sampler::ParentBased(Box::new(sampler))
    } else {
        sampler
    }
}

/// Build OTLP span exporter based on protocol
fn build_span_exporter(config: &ExporterConfig) -> anyhow::Result<opentelemetry_otlp::SpanExporter> {
    use opentelemetry_otlp::SpanExporter;

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder()
            .with_tonic()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build gRPC span exporter: {e}"))?,
        ExportProtocol::HttpProto => SpanExporter::builder()
            .with_http()
            .with_endpoint(config.endpoint.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP span exporter: {e}"))?,
    };

    Ok(exporter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracing_config(sampling_rate: f64, parent_based: bool) -> TracingConfig {
        TracingConfig {
            sampling_rate,
            parent_based,
        }
    }

    #[test]
    fn sampler_defaults_to_parent_based_always_on() {
        assert!(matches!(sampler(None), Sampler::ParentBased(_)));
    }

    #[test]
    fn sampler_follows_rate() {
        assert!(matches!(sampler(Some(&tracing_config(1.0, false))), Sampler::AlwaysOn));
        assert!(matches!(sampler(Some(&tracing_config(0.0, false))), Sampler::AlwaysOff));
        assert!(matches!(
            sampler(Some(&tracing_config(0.25, false))),
            Sampler::TraceIdRatioBased(rate) if (rate - 0.25).abs() < f64::EPSILON
        ));
        assert!(matches!(sampler(Some(&tracing_config(0.25, true))), Sampler::ParentBased(_)));
    }
}
