//! Logging and Metrics

use axum::http::StatusCode;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogFormat;
use crate::error::Operation;

/// Counter of handled report requests, labelled by operation and status
pub const REQUESTS_TOTAL: &str = "report_store_requests_total";

/// Initialize logging
///
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_logging(format: LogFormat, level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .json()
                        .with_current_span(true)
                        .with_target(true),
                )
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact().with_target(true))
                .init();
        }
    }
}

/// Install the global Prometheus recorder
pub fn install_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Count one handled request
pub fn record_request(operation: Operation, status: StatusCode) {
    metrics::counter!(
        REQUESTS_TOTAL,
        "operation" => operation.as_str(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}
