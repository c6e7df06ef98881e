//! Configuration source abstraction
//!
//! The poller only sees the [`SnapshotSource`] trait. A fetch either returns a
//! complete snapshot, possibly an explicitly empty one, or fails. A failure
//! never means "no configuration".

pub mod http;

pub use http::HttpSnapshotSource;

use crate::domain::RawSnapshot;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::path::Path;

/// Trait for fetching the full configuration snapshot of one proxy
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the current snapshot for `proxy_id`
    async fn fetch(&self, proxy_id: &str) -> Result<RawSnapshot>;
}

/// Decode a snapshot document.
///
/// An empty body, a JSON `null` or an object without a `services` list is an
/// error; only `[]` and `{"services": []}` are an empty configuration.
pub fn decode_snapshot(body: &[u8]) -> Result<RawSnapshot> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(Error::fetch("Configuration source returned an empty body"));
    }

    let snapshot: Option<RawSnapshot> = serde_json::from_slice(body)
        .map_err(|e| Error::decode("Failed to decode configuration snapshot", e))?;

    snapshot.ok_or_else(|| Error::fetch("Configuration source returned a null snapshot"))
}

/// Source that always serves the same snapshot
#[derive(Debug, Clone, Default)]
pub struct StaticSnapshotSource {
    snapshot: RawSnapshot,
}

impl StaticSnapshotSource {
    pub fn new(snapshot: RawSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load the snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read(path).map_err(|e| Error::Io {
            source: e,
            context: format!("Failed to read snapshot file {}", path.display()),
        })?;
        Ok(Self::new(decode_snapshot(&body)?))
    }
}

#[async_trait]
impl SnapshotSource for StaticSnapshotSource {
    async fn fetch(&self, _proxy_id: &str) -> Result<RawSnapshot> {
        Ok(self.snapshot.clone())
    }
}
