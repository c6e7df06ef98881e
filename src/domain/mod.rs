//! Domain layer
//!
//! Pure data types with no I/O: the raw snapshot records fetched from the
//! configuration source, and the normalized entities (IR) they translate into.
//!
//! ## Module Organization
//!
//! - `snapshot`: raw, denormalized records as served by the configuration source
//! - `id`: identity keys shared by every cached entity
//! - `gateway`: virtual hosts, routes, match conditions, target services
//! - `endpoint`: service bindings and the endpoint sets backing them
//! - `secret`: TLS credentials

pub mod endpoint;
pub mod gateway;
pub mod id;
pub mod secret;
pub mod snapshot;

pub use endpoint::{Endpoint, EndpointSet, ServiceBinding};
pub use gateway::{
    FilterRef, GatewayHost, HeaderCondition, HealthCheck, MatchCondition, Route, TargetService,
    TlsReference,
};
pub use id::ResourceKey;
pub use secret::TlsCredential;
pub use snapshot::{
    FilterRecord, GlobalSettings, ProxyRecord, RawSnapshot, RouteRecord, SecretRecord,
    ServiceRecord, UpstreamRecord,
};
