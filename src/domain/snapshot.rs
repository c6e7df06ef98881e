//! Raw snapshot records
//!
//! The denormalized document served by the configuration source: one record
//! per (proxy, service) pair with nested routes, upstreams, filters and
//! secrets. A snapshot is always a complete replacement of the previous one.
//!
//! Every field tolerates being absent or `null`; both read as the type's
//! default so serializer quirks upstream never look like configuration changes.

use serde::{Deserialize, Deserializer, Serialize};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One complete fetch from the configuration source.
///
/// Accepts either `{"services": [...]}` or a bare array of service records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SnapshotDocument")]
pub struct RawSnapshot {
    pub services: Vec<ServiceRecord>,
}

impl RawSnapshot {
    pub fn new(services: Vec<ServiceRecord>) -> Self {
        Self { services }
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Bare(Vec<ServiceRecord>),
    Wrapped(WrappedDocument),
}

/// `{"services": [...]}`; the list is required and nothing else may appear
/// beside it, so an error object never reads as an empty configuration.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WrappedDocument {
    services: Vec<ServiceRecord>,
}

impl From<SnapshotDocument> for RawSnapshot {
    fn from(document: SnapshotDocument) -> Self {
        match document {
            SnapshotDocument::Bare(services)
            | SnapshotDocument::Wrapped(WrappedDocument { services }) => Self { services },
        }
    }
}

/// A service exposed through a proxy, with everything attached to it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub proxy: ProxyRecord,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub fqdn: String,
    #[serde(default, deserialize_with = "nullable")]
    pub routes: Vec<RouteRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub secrets: Vec<SecretRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub filters: Vec<FilterRecord>,
}

/// The proxy a service is served by
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProxyRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub settings: GlobalSettings,
}

/// Proxy-level settings shared by every service on the proxy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Minimum TLS protocol version accepted on TLS-enabled hosts, e.g. "1.2"
    #[serde(default, deserialize_with = "nullable")]
    pub min_tls_version: String,
}

/// A routing rule as authored for a service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub prefix: String,
    /// Embedded match-condition document, only consulted when `prefix` is empty
    #[serde(default, deserialize_with = "nullable")]
    pub config: String,
    #[serde(default, deserialize_with = "nullable")]
    pub prefix_rewrite: String,
    #[serde(default, deserialize_with = "nullable")]
    pub websocket: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub insecure: bool,
    #[serde(default, deserialize_with = "nullable")]
    pub upstreams: Vec<UpstreamRecord>,
    #[serde(default, deserialize_with = "nullable")]
    pub filters: Vec<FilterRecord>,
}

/// An upstream target attached to a route.
///
/// Zero/empty values mean "unset" for weight, strategy and every `hc_*` field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub address: String,
    #[serde(default, deserialize_with = "nullable")]
    pub port: u16,
    #[serde(default, deserialize_with = "nullable")]
    pub weight: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub strategy: String,
    #[serde(default, deserialize_with = "nullable")]
    pub hc_path: String,
    #[serde(default, deserialize_with = "nullable")]
    pub hc_host: String,
    /// Seconds
    #[serde(default, deserialize_with = "nullable")]
    pub hc_interval: u32,
    /// Seconds
    #[serde(default, deserialize_with = "nullable")]
    pub hc_timeout: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub hc_unhealthy_threshold: u32,
    #[serde(default, deserialize_with = "nullable")]
    pub hc_healthy_threshold: u32,
}

/// A certificate/key pair associated with a service
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecretRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub certificate: String,
    #[serde(default, deserialize_with = "nullable")]
    pub private_key: String,
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("certificate_len", &self.certificate.len())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

/// A traffic filter attached to a service or a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterRecord {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub filter_type: String,
}
