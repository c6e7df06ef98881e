//! # Cloudplane
//!
//! Control-plane core that keeps a proxy's configuration converged with an
//! external configuration source. Each pass fetches a complete snapshot,
//! translates it into intermediate entities and reconciles them against the
//! last-emitted state, notifying downstream consumers of only what changed.
//!
//! ## Architecture
//!
//! ```text
//! SnapshotSource → Poller → Translator → CloudCache → ResourceEventHandler
//!                                            ↑
//!                                   equality (change detection)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cloudplane::{AppConfig, CloudCache, LoggingEventHandler, Poller, Result};
//! use cloudplane::source::HttpSnapshotSource;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let cache = Arc::new(CloudCache::new(
//!         Arc::new(LoggingEventHandler::new("hosts")),
//!         Arc::new(LoggingEventHandler::new("endpoints")),
//!     ));
//!     let source = Arc::new(HttpSnapshotSource::new(&config.source)?);
//!     let handle = Poller::from_config(&config, source, cache).spawn();
//!     tokio::signal::ctrl_c().await?;
//!     handle.shutdown_and_join().await
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod poller;
pub mod source;
pub mod translate;

// Re-export commonly used types and traits
pub use cache::{
    CloudCache, LoggingEventHandler, ReconcileReport, Resource, ResourceEventHandler, ResourceKind,
};
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use poller::{Poller, PollerHandle};
pub use source::SnapshotSource;
pub use translate::{IrBatch, IrSnapshot, Translator};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
