//! Snapshot translation
//!
//! Turns one raw snapshot into the four IR collections the cloud cache
//! reconciles: gateway hosts, service bindings, endpoint sets and TLS
//! credentials. Translation does no I/O and is deterministic: the same
//! snapshot always produces the same collections in the same order.
//!
//! Records missing identity fields are skipped with a warning; the rest of
//! the snapshot is still translated.

pub mod conditions;

pub use conditions::parse_conditions;

use std::collections::{HashMap, HashSet};

use crate::domain::{
    Endpoint, EndpointSet, FilterRecord, FilterRef, GatewayHost, HealthCheck, RawSnapshot,
    ResourceKey, Route, RouteRecord, ServiceBinding, ServiceRecord, TargetService, TlsCredential,
    TlsReference, UpstreamRecord,
};
use tracing::{debug, warn};

/// IR produced from one snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IrSnapshot {
    pub hosts: Vec<GatewayHost>,
    pub services: Vec<ServiceBinding>,
    pub endpoints: Vec<EndpointSet>,
    pub credentials: Vec<TlsCredential>,
}

impl IrSnapshot {
    /// Split into batches in the order a reconciliation pass applies them:
    /// credentials first, then proxy groups, then the hosts referencing both.
    pub fn into_batches(self) -> [IrBatch; 3] {
        [
            IrBatch::Secrets(self.credentials),
            IrBatch::ProxyGroups { services: self.services, endpoints: self.endpoints },
            IrBatch::GatewayHosts(self.hosts),
        ]
    }
}

/// A translated batch, tagged by the kind of payload it carries
#[derive(Debug, Clone, PartialEq)]
pub enum IrBatch {
    GatewayHosts(Vec<GatewayHost>),
    ProxyGroups { services: Vec<ServiceBinding>, endpoints: Vec<EndpointSet> },
    Secrets(Vec<TlsCredential>),
}

impl IrBatch {
    pub fn kind(&self) -> &'static str {
        match self {
            IrBatch::GatewayHosts(_) => "gateway_hosts",
            IrBatch::ProxyGroups { .. } => "proxy_groups",
            IrBatch::Secrets(_) => "secrets",
        }
    }
}

/// Translates raw snapshots into IR scoped to a single tenant
#[derive(Debug, Clone)]
pub struct Translator {
    tenant: String,
}

impl Translator {
    pub fn new(tenant: impl Into<String>) -> Self {
        Self { tenant: tenant.into() }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn translate(&self, snapshot: &RawSnapshot) -> IrSnapshot {
        let mut ir = IrSnapshot::default();
        let mut host_keys = HashSet::new();
        let mut credential_keys = HashSet::new();
        let mut binding_keys = HashSet::new();
        let mut endpoint_index: HashMap<String, usize> = HashMap::new();

        for service in &snapshot.services {
            if let Some(host) = self.build_host(service) {
                if host_keys.insert(host.key()) {
                    ir.hosts.push(host);
                } else {
                    warn!(
                        tenant = %self.tenant,
                        host = %host.name,
                        fqdn = %service.fqdn,
                        "Duplicate gateway host in snapshot, keeping first occurrence"
                    );
                }
            }

            if let Some(credential) = self.build_credential(service) {
                if credential_keys.insert(credential.key()) {
                    ir.credentials.push(credential);
                } else {
                    debug!(secret = %credential.name, "TLS credential already translated");
                }
            }

            for upstream in service.routes.iter().flat_map(|route| route.upstreams.iter()) {
                if upstream.name.is_empty() {
                    continue;
                }

                let binding = self.build_binding(upstream);
                if binding_keys.insert(binding.key()) {
                    ir.services.push(binding);
                }

                let index = *endpoint_index.entry(upstream.name.clone()).or_insert_with(|| {
                    ir.endpoints.push(EndpointSet::new(&self.tenant, &upstream.name));
                    ir.endpoints.len() - 1
                });
                if !upstream.address.is_empty() {
                    ir.endpoints[index].push_unique(Endpoint {
                        address: upstream.address.clone(),
                        port: upstream.port,
                    });
                }
            }
        }

        debug!(
            tenant = %self.tenant,
            records = snapshot.services.len(),
            hosts = ir.hosts.len(),
            services = ir.services.len(),
            endpoints = ir.endpoints.len(),
            credentials = ir.credentials.len(),
            "Translated snapshot"
        );

        ir
    }

    fn build_host(&self, service: &ServiceRecord) -> Option<GatewayHost> {
        if service.fqdn.trim().is_empty() {
            warn!(
                tenant = %self.tenant,
                service = %service.name,
                "Skipping service without fully-qualified domain name"
            );
            return None;
        }

        let source_name = if service.name.trim().is_empty() { &service.fqdn } else { &service.name };
        let name = host_name(source_name);

        let tls = service.secrets.first().and_then(|secret| {
            if secret.name.is_empty() {
                warn!(host = %name, "First associated secret has no name, host served without TLS");
                return None;
            }
            let min_version = &service.proxy.settings.min_tls_version;
            Some(TlsReference {
                secret_name: secret.name.clone(),
                minimum_protocol_version: (!min_version.is_empty()).then(|| min_version.clone()),
            })
        });

        Some(GatewayHost {
            name,
            tenant: self.tenant.clone(),
            fqdn: service.fqdn.trim().to_string(),
            tls,
            filters: filter_refs(&service.filters),
            routes: service.routes.iter().map(build_route).collect(),
        })
    }

    fn build_credential(&self, service: &ServiceRecord) -> Option<TlsCredential> {
        let secret = service.secrets.first()?;
        if secret.name.is_empty() {
            return None;
        }
        Some(TlsCredential {
            name: secret.name.clone(),
            tenant: self.tenant.clone(),
            certificate: secret.certificate.clone(),
            private_key: secret.private_key.clone(),
        })
    }

    fn build_binding(&self, upstream: &UpstreamRecord) -> ServiceBinding {
        ServiceBinding {
            name: upstream.name.clone(),
            tenant: self.tenant.clone(),
            port: upstream.port,
            strategy: non_empty(&upstream.strategy),
        }
    }

    /// Identity of the host a service record translates to, if it has one
    pub fn host_key(&self, service: &ServiceRecord) -> Option<ResourceKey> {
        self.build_host(service).map(|host| host.key())
    }
}

fn build_route(record: &RouteRecord) -> Route {
    Route {
        conditions: parse_conditions(&record.prefix, &record.config),
        services: record
            .upstreams
            .iter()
            .filter(|upstream| !upstream.name.is_empty())
            .map(target_service)
            .collect(),
        filters: filter_refs(&record.filters),
        prefix_rewrite: record.prefix_rewrite.clone(),
        enable_websockets: record.websocket,
        permit_insecure: record.insecure,
    }
}

fn target_service(upstream: &UpstreamRecord) -> TargetService {
    TargetService {
        name: upstream.name.clone(),
        port: upstream.port,
        weight: (upstream.weight > 0).then_some(upstream.weight),
        strategy: non_empty(&upstream.strategy),
        health_check: health_check(upstream),
    }
}

/// A health check exists only when at least one `hc_*` field is set.
fn health_check(upstream: &UpstreamRecord) -> Option<HealthCheck> {
    let check = HealthCheck {
        path: upstream.hc_path.clone(),
        host: upstream.hc_host.clone(),
        interval_seconds: upstream.hc_interval,
        timeout_seconds: upstream.hc_timeout,
        unhealthy_threshold: upstream.hc_unhealthy_threshold,
        healthy_threshold: upstream.hc_healthy_threshold,
    };
    (check != HealthCheck::default()).then_some(check)
}

fn filter_refs(records: &[FilterRecord]) -> Vec<FilterRef> {
    records
        .iter()
        .map(|record| FilterRef { name: record.name.clone(), filter_type: record.filter_type.clone() })
        .collect()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Lowercase DNS-label-like form: anything outside `[a-z0-9.-]` becomes `-`.
fn host_name(source: &str) -> String {
    source
        .trim()
        .chars()
        .map(|c| {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
