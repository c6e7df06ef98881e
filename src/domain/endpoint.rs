//! Service binding and endpoint domain types
//!
//! A service binding is the routable unit a proxy binds routes to; the
//! matching endpoint set lists the addresses that back it. Both are keyed by
//! `(tenant, target name)`.

use super::id::ResourceKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream target a route can send traffic to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBinding {
    pub name: String,
    pub tenant: String,
    pub port: u16,
    pub strategy: Option<String>,
}

impl ServiceBinding {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.tenant, &self.name)
    }
}

/// A single backend address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.address, self.port)
    }
}

/// Addresses backing one target service, in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSet {
    pub name: String,
    pub tenant: String,
    pub endpoints: Vec<Endpoint>,
}

impl EndpointSet {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self { name: name.into(), tenant: tenant.into(), endpoints: Vec::new() }
    }

    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.tenant, &self.name)
    }

    /// Append an endpoint unless it is already present
    pub fn push_unique(&mut self, endpoint: Endpoint) -> bool {
        if self.endpoints.contains(&endpoint) {
            return false;
        }
        self.endpoints.push(endpoint);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_unique_skips_duplicates() {
        let mut set = EndpointSet::new("acme", "api");
        assert!(set.push_unique(Endpoint { address: "10.0.0.1".into(), port: 80 }));
        assert!(set.push_unique(Endpoint { address: "10.0.0.2".into(), port: 80 }));
        assert!(!set.push_unique(Endpoint { address: "10.0.0.1".into(), port: 80 }));

        let rendered: Vec<String> = set.endpoints.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["10.0.0.1:80", "10.0.0.2:80"]);
    }
}
