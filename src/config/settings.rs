//! # Configuration Settings
//!
//! Defines the configuration structure for the Cloudplane control plane.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Reconciliation loop configuration
    #[validate(nested)]
    pub sync: SyncConfig,

    /// Configuration source client settings
    #[validate(nested)]
    pub source: SourceConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()?;
        Ok(())
    }

    /// Checks the validator derive cannot express
    fn validate_custom(&self) -> Result<()> {
        if self.sync.tenant.trim().is_empty() {
            return Err(Error::validation_field("Tenant cannot be blank", "sync.tenant"));
        }

        let parsed = url::Url::parse(&self.source.url).map_err(|e| {
            Error::validation_field(format!("Invalid source URL: {}", e), "source.url")
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::validation_field(
                "Source URL must use http or https",
                "source.url",
            ));
        }

        if self.observability.enable_metrics && self.observability.metrics_port == 0 {
            return Err(Error::validation_field(
                "Metrics port must be set when metrics are enabled",
                "observability.metrics_port",
            ));
        }

        Ok(())
    }
}

/// Reconciliation loop configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SyncConfig {
    /// Namespace that scopes every translated entity
    #[validate(length(min = 1, message = "Tenant cannot be empty"))]
    pub tenant: String,

    /// Proxy identifier sent to the configuration source on every fetch
    #[validate(length(min = 1, message = "Proxy id cannot be empty"))]
    pub proxy_id: String,

    /// Seconds between two snapshot fetches
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Poll interval must be between 1 and 3600 seconds"
    ))]
    pub poll_interval_seconds: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            tenant: "default".to_string(),
            proxy_id: "default".to_string(),
            poll_interval_seconds: 10,
        }
    }
}

impl SyncConfig {
    /// Get poll interval as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

/// Configuration source client settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the configuration source
    #[validate(length(min = 1, message = "Source URL cannot be empty"))]
    pub url: String,

    /// Per-fetch timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Optional bearer token presented to the configuration source
    pub auth_token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self { url: "http://127.0.0.1:8080".to_string(), timeout_seconds: 5, auth_token: None }
    }
}

impl SourceConfig {
    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Enable the Prometheus metrics endpoint
    pub enable_metrics: bool,

    /// Metrics server port
    pub metrics_port: u16,

    /// Service name attached to log output
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: false,
            metrics_port: 9090,
            service_name: "cloudplane".to_string(),
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if !self.enable_metrics || self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}
