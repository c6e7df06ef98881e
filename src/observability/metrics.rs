//! # Metrics Collection
//!
//! Prometheus metrics for the reconciliation loop.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Metrics recorder for cache and poller activity.
///
/// Calls are cheap no-ops until a global recorder is installed by [`init_metrics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Register metric descriptions with the installed exporter
    pub fn register(&self) {
        describe_counter!(
            "cloudplane_cache_events_total",
            Unit::Count,
            "Notifications emitted by the cloud cache, by resource kind and action"
        );
        describe_counter!(
            "cloudplane_fetch_failures_total",
            Unit::Count,
            "Snapshot fetches that failed and skipped a reconciliation pass"
        );
        describe_histogram!(
            "cloudplane_reconcile_duration_seconds",
            Unit::Seconds,
            "Time spent holding the cache lock for one reconciliation pass"
        );
        describe_gauge!(
            "cloudplane_cache_entries",
            Unit::Count,
            "Entries currently held by the cloud cache, by resource kind"
        );
    }

    /// Record one emitted cache notification
    pub fn record_cache_event(&self, kind: &'static str, action: &'static str) {
        counter!("cloudplane_cache_events_total", "kind" => kind, "action" => action).increment(1);
    }

    /// Record a failed snapshot fetch
    pub fn record_fetch_failure(&self) {
        counter!("cloudplane_fetch_failures_total").increment(1);
    }

    /// Record the duration of a reconciliation pass in seconds
    pub fn record_reconcile_duration(&self, seconds: f64) {
        histogram!("cloudplane_reconcile_duration_seconds").record(seconds);
    }

    /// Update the cache size gauge for one resource kind
    pub fn update_cache_entries(&self, kind: &'static str, count: usize) {
        gauge!("cloudplane_cache_entries", "kind" => kind).set(count as f64);
    }
}

/// Install the Prometheus exporter when metrics are enabled.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(config: &ObservabilityConfig) -> Result<()> {
    if !config.enable_metrics {
        return Ok(());
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(());
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    MetricsRecorder::new().register();

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        "Metrics collection initialized"
    );

    Ok(())
}
