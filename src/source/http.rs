//! HTTP configuration source
//!
//! Fetches `GET {url}/proxies/{proxy_id}/snapshot` with an optional bearer
//! token and a per-request timeout.

use super::{decode_snapshot, SnapshotSource};
use crate::config::SourceConfig;
use crate::domain::RawSnapshot;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Snapshot source backed by the configuration service's HTTP API
#[derive(Debug, Clone)]
pub struct HttpSnapshotSource {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpSnapshotSource {
    /// Create a new source from configuration
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            Error::config_with_source(format!("Invalid source url '{}'", config.url), Box::new(e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(Error::config(format!("Source url '{}' cannot be a base", config.url)));
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::config_with_source("Failed to create HTTP client", Box::new(e)))?;

        Ok(Self { client, base_url, auth_token: config.auth_token.clone() })
    }

    /// URL of the snapshot endpoint for one proxy
    pub fn snapshot_url(&self, proxy_id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::internal("Source url cannot be a base"))?
            .pop_if_empty()
            .extend(["proxies", proxy_id, "snapshot"]);
        Ok(url)
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self, proxy_id: &str) -> Result<RawSnapshot> {
        let url = self.snapshot_url(proxy_id)?;
        debug!(url = %url, "Fetching configuration snapshot");

        let mut request = self.client.get(url);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(format!("Configuration source returned status {}", status)));
        }

        let body = response.bytes().await?;
        decode_snapshot(&body)
    }
}
