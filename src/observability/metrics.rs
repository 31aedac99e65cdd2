//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_forward_requests_total` (counter): forwards by outcome, status
//! - `gateway_forward_duration_seconds` (histogram): forward latency by outcome
//!
//! Recording goes through the `metrics` facade and is a no-op until an
//! exporter is installed.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed forward.
pub fn record_forward(outcome: &'static str, status: u16, start_time: Instant) {
    ::metrics::counter!(
        "gateway_forward_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_forward_duration_seconds", "outcome" => outcome)
        .record(start_time.elapsed().as_secs_f64());
}
