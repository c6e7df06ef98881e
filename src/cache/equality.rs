//! Change detection between cached and freshly translated entities.
//!
//! These functions answer "did this entity change?", nothing more. They are
//! order-tolerant where the source has no meaningful order, and they
//! deliberately compare a subset of fields for hosts and routes:
//!
//! - Only the first match condition (the path prefix) of a route is compared
//!   by value; header conditions after it are not. The number of conditions
//!   is compared, so a route that gains one extra header condition is still
//!   reported as an update.
//! - Target-service health checks are not compared.
//! - A host's fqdn and host-level filters are not compared.
//!
//! Changes confined to those fields do not produce an update notification.

use std::cmp::Ordering;

use crate::domain::{
    EndpointSet, GatewayHost, Route, ServiceBinding, TargetService, TlsCredential, TlsReference,
};

/// Whether two versions of the same cached entity are equivalent.
pub trait Equivalent {
    fn equivalent(&self, other: &Self) -> bool;
}

impl Equivalent for GatewayHost {
    fn equivalent(&self, other: &Self) -> bool {
        gateway_hosts_equal(self, other)
    }
}

impl Equivalent for ServiceBinding {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for EndpointSet {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl Equivalent for TlsCredential {
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

/// Name, tenant, TLS reference and route list must all match.
pub fn gateway_hosts_equal(a: &GatewayHost, b: &GatewayHost) -> bool {
    a.name == b.name
        && a.tenant == b.tenant
        && tls_references_equal(a.tls.as_ref(), b.tls.as_ref())
        && routes_equal(&a.routes, &b.routes)
}

/// Absent equals absent; present references compare secret name and minimum version.
pub fn tls_references_equal(a: Option<&TlsReference>, b: Option<&TlsReference>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => {
            a.secret_name == b.secret_name
                && a.minimum_protocol_version == b.minimum_protocol_version
        }
        _ => false,
    }
}

/// Route lists are lined up by prefix plus first header name, then compared pairwise.
pub fn routes_equal(a: &[Route], b: &[Route]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a = sorted_routes(a);
    let b = sorted_routes(b);
    a.iter().zip(b.iter()).all(|(x, y)| route_equal(x, y))
}

fn route_equal(a: &Route, b: &Route) -> bool {
    if a.conditions.len() != b.conditions.len() {
        return false;
    }
    if !a.conditions.is_empty() && a.prefix() != b.prefix() {
        return false;
    }

    a.prefix_rewrite == b.prefix_rewrite
        && a.enable_websockets == b.enable_websockets
        && a.permit_insecure == b.permit_insecure
        && target_services_equal(&a.services, &b.services)
}

fn sorted_routes(routes: &[Route]) -> Vec<&Route> {
    let mut sorted: Vec<&Route> = routes.iter().collect();
    sorted.sort_by(|x, y| {
        x.sort_key()
            .cmp(&y.sort_key())
            .then_with(|| x.prefix_rewrite.cmp(&y.prefix_rewrite))
            .then_with(|| x.enable_websockets.cmp(&y.enable_websockets))
            .then_with(|| x.permit_insecure.cmp(&y.permit_insecure))
    });
    sorted
}

/// Services are lined up by name, descending, then compared on name, port,
/// weight and strategy.
pub fn target_services_equal(a: &[TargetService], b: &[TargetService]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let a = sorted_services(a);
    let b = sorted_services(b);
    a.iter().zip(b.iter()).all(|(x, y)| {
        x.name == y.name && x.port == y.port && x.weight == y.weight && x.strategy == y.strategy
    })
}

fn sorted_services(services: &[TargetService]) -> Vec<&TargetService> {
    let mut sorted: Vec<&TargetService> = services.iter().collect();
    sorted.sort_by(|x, y| compare_services(y, x));
    sorted
}

fn compare_services(a: &TargetService, b: &TargetService) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.port.cmp(&b.port))
        .then_with(|| a.weight.cmp(&b.weight))
        .then_with(|| a.strategy.cmp(&b.strategy))
}
