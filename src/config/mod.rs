//! # Configuration Management
//!
//! Layered configuration for the Cloudplane control plane: built-in defaults,
//! an optional TOML file, then `CLOUDPLANE__SECTION__FIELD` environment
//! variables (e.g. `CLOUDPLANE__SYNC__TENANT=acme`).

pub mod settings;

pub use settings::{AppConfig, ObservabilityConfig, SourceConfig, SyncConfig};

use crate::Result;
use std::path::Path;

/// Environment variable prefix for every configuration key
pub const ENV_PREFIX: &str = "CLOUDPLANE";

impl AppConfig {
    /// Load and validate configuration from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}
