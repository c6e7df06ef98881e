//! Downstream consumer interface
//!
//! The cloud cache notifies two handlers: one for host/route-level state
//! (gateway hosts, service bindings, TLS credentials) and one for endpoint
//! sets. Handlers are called synchronously while the cache lock is held and
//! their outcome does not influence reconciliation.

use std::fmt;

use crate::domain::{EndpointSet, GatewayHost, ResourceKey, ServiceBinding, TlsCredential};
use tracing::info;

/// Kind of entity held by the cloud cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    GatewayHost,
    ServiceBinding,
    EndpointSet,
    TlsCredential,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::GatewayHost => "gateway_host",
            ResourceKind::ServiceBinding => "service_binding",
            ResourceKind::EndpointSet => "endpoint_set",
            ResourceKind::TlsCredential => "tls_credential",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An entity carried by a cache notification
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    GatewayHost(GatewayHost),
    ServiceBinding(ServiceBinding),
    EndpointSet(EndpointSet),
    TlsCredential(TlsCredential),
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Resource::GatewayHost(_) => ResourceKind::GatewayHost,
            Resource::ServiceBinding(_) => ResourceKind::ServiceBinding,
            Resource::EndpointSet(_) => ResourceKind::EndpointSet,
            Resource::TlsCredential(_) => ResourceKind::TlsCredential,
        }
    }

    pub fn key(&self) -> ResourceKey {
        match self {
            Resource::GatewayHost(host) => host.key(),
            Resource::ServiceBinding(binding) => binding.key(),
            Resource::EndpointSet(set) => set.key(),
            Resource::TlsCredential(credential) => credential.key(),
        }
    }
}

/// Receives add/update/delete notifications from the cloud cache.
pub trait ResourceEventHandler: Send + Sync {
    fn on_add(&self, resource: &Resource);

    fn on_update(&self, old: &Resource, new: &Resource);

    fn on_delete(&self, resource: &Resource);
}

/// Handler that only logs what it receives.
#[derive(Debug, Clone)]
pub struct LoggingEventHandler {
    consumer: &'static str,
}

impl LoggingEventHandler {
    pub fn new(consumer: &'static str) -> Self {
        Self { consumer }
    }
}

impl ResourceEventHandler for LoggingEventHandler {
    fn on_add(&self, resource: &Resource) {
        info!(consumer = self.consumer, kind = %resource.kind(), key = %resource.key(), "Resource added");
    }

    fn on_update(&self, _old: &Resource, new: &Resource) {
        info!(consumer = self.consumer, kind = %new.kind(), key = %new.key(), "Resource updated");
    }

    fn on_delete(&self, resource: &Resource) {
        info!(consumer = self.consumer, kind = %resource.kind(), key = %resource.key(), "Resource deleted");
    }
}
