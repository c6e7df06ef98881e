//! Gateway host domain types
//!
//! Virtual hosts, their routes, and the match conditions and upstream
//! targets hanging off each route. These are the normalized entities the
//! cloud cache diffs between snapshots.

use super::id::ResourceKey;
use serde::{Deserialize, Serialize};

/// One virtual host served by the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayHost {
    /// Stable name derived from the owning service
    pub name: String,
    pub tenant: String,
    pub fqdn: String,
    /// At most one credential per host; the first associated secret wins
    pub tls: Option<TlsReference>,
    /// Host-level filters, in source order
    pub filters: Vec<FilterRef>,
    pub routes: Vec<Route>,
}

impl GatewayHost {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.tenant, &self.name)
    }
}

/// Reference from a host to the TLS credential terminating it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsReference {
    pub secret_name: String,
    pub minimum_protocol_version: Option<String>,
}

/// Name and type of a filter attached to a host or route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterRef {
    pub name: String,
    pub filter_type: String,
}

/// A single routing rule within a host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Prefix condition first, header conditions after
    pub conditions: Vec<MatchCondition>,
    pub services: Vec<TargetService>,
    pub filters: Vec<FilterRef>,
    pub prefix_rewrite: String,
    pub enable_websockets: bool,
    pub permit_insecure: bool,
}

impl Route {
    /// The path prefix of the first condition, if the route has one
    pub fn prefix(&self) -> Option<&str> {
        match self.conditions.first() {
            Some(MatchCondition::Prefix(prefix)) => Some(prefix),
            _ => None,
        }
    }

    /// Name of the first header condition, if any
    pub fn first_header_name(&self) -> Option<&str> {
        self.conditions.iter().find_map(|condition| match condition {
            MatchCondition::Header(header) => Some(header.name.as_str()),
            MatchCondition::Prefix(_) => None,
        })
    }

    /// Key used to line routes up before comparing two route lists
    pub fn sort_key(&self) -> String {
        let mut key = self.prefix().unwrap_or_default().to_string();
        if let Some(name) = self.first_header_name() {
            key.push_str(name);
        }
        key
    }
}

/// Predicate a request must satisfy for a route to apply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCondition {
    /// Request path starts with the given prefix
    Prefix(String),
    /// Request header matches
    Header(HeaderCondition),
}

impl MatchCondition {
    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn header_contains(name: impl Into<String>, contains: impl Into<String>) -> Self {
        Self::Header(HeaderCondition { name: name.into(), contains: contains.into() })
    }
}

/// Header predicate: the named header's value contains `contains`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCondition {
    pub name: String,
    pub contains: String,
}

/// One upstream destination reachable from a route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetService {
    pub name: String,
    pub port: u16,
    /// Unset when the source carries no weight
    pub weight: Option<u32>,
    /// Load-balancing strategy, unset when the source carries none
    pub strategy: Option<String>,
    pub health_check: Option<HealthCheck>,
}

/// Active health check for a target service.
///
/// Fields left unset by the source stay at their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub path: String,
    pub host: String,
    pub interval_seconds: u32,
    pub timeout_seconds: u32,
    pub unhealthy_threshold: u32,
    pub healthy_threshold: u32,
}
