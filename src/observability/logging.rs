//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.
//!
//! `RUST_LOG` takes precedence over the configured log level so operators can
//! raise verbosity for a single module without touching the config file.

use crate::config::ObservabilityConfig;
use crate::errors::{Error, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Create a tracing span for one reconciliation pass.
///
/// ```rust,ignore
/// let span = reconcile_span!("acme", "edge-1");
/// ```
#[macro_export]
macro_rules! reconcile_span {
    ($tenant:expr, $proxy_id:expr) => {
        tracing::info_span!(
            "reconcile_pass",
            tenant = %$tenant,
            proxy_id = %$proxy_id,
            pass_id = %uuid::Uuid::new_v4()
        )
    };
    ($tenant:expr, $proxy_id:expr, $($field:tt)*) => {
        tracing::info_span!(
            "reconcile_pass",
            tenant = %$tenant,
            proxy_id = %$proxy_id,
            pass_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Create a tracing span for a configuration source fetch
#[macro_export]
macro_rules! fetch_span {
    ($proxy_id:expr) => {
        tracing::debug_span!(
            "snapshot_fetch",
            proxy_id = %$proxy_id,
            fetch_id = %uuid::Uuid::new_v4()
        )
    };
    ($proxy_id:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "snapshot_fetch",
            proxy_id = %$proxy_id,
            fetch_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global tracing subscriber.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_logging {
        registry.with(fmt::layer().json().with_current_span(true).with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    result.map_err(|e| Error::config(format!("Failed to initialise logging: {}", e)))
}

/// Log configuration at startup
pub fn log_config_info(config: &crate::config::AppConfig) {
    tracing::info!(
        service_name = %config.observability.service_name,
        tenant = %config.sync.tenant,
        proxy_id = %config.sync.proxy_id,
        poll_interval_seconds = config.sync.poll_interval_seconds,
        source_url = %config.source.url,
        metrics_enabled = %config.observability.enable_metrics,
        "Cloudplane control plane configuration"
    );
}
