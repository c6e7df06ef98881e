//! # Cloud Cache
//!
//! Holds the last-emitted version of every translated entity and reconciles
//! it against each new snapshot, notifying downstream handlers of exactly the
//! entities that were added, changed or removed.
//!
//! Per key the model has two states, absent and present:
//!
//! ```text
//! absent  -> present   on_add(new)
//! present -> present   on_update(old, new)   only when the entity changed
//! present -> absent    on_delete(old), then the key is evicted
//! ```
//!
//! Within one entity kind all adds/updates of a pass are emitted before any
//! delete. A whole pass runs under one exclusive lock, so passes never
//! interleave and readers never see a half-applied snapshot. The cache never
//! takes a second lock while holding its own.

pub mod equality;
pub mod handler;

pub use equality::Equivalent;
pub use handler::{LoggingEventHandler, Resource, ResourceEventHandler, ResourceKind};

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::domain::{EndpointSet, GatewayHost, ResourceKey, ServiceBinding, TlsCredential};
use crate::errors::{Error, Result};
use crate::observability::MetricsRecorder;
use crate::translate::{IrBatch, IrSnapshot};
use tracing::{debug, info, warn};

/// An entity the cloud cache can track.
pub trait CacheEntity: Equivalent + Clone {
    const KIND: ResourceKind;

    fn cache_key(&self) -> ResourceKey;

    fn to_resource(&self) -> Resource;
}

impl CacheEntity for GatewayHost {
    const KIND: ResourceKind = ResourceKind::GatewayHost;

    fn cache_key(&self) -> ResourceKey {
        self.key()
    }

    fn to_resource(&self) -> Resource {
        Resource::GatewayHost(self.clone())
    }
}

impl CacheEntity for ServiceBinding {
    const KIND: ResourceKind = ResourceKind::ServiceBinding;

    fn cache_key(&self) -> ResourceKey {
        self.key()
    }

    fn to_resource(&self) -> Resource {
        Resource::ServiceBinding(self.clone())
    }
}

impl CacheEntity for EndpointSet {
    const KIND: ResourceKind = ResourceKind::EndpointSet;

    fn cache_key(&self) -> ResourceKey {
        self.key()
    }

    fn to_resource(&self) -> Resource {
        Resource::EndpointSet(self.clone())
    }
}

impl CacheEntity for TlsCredential {
    const KIND: ResourceKind = ResourceKind::TlsCredential;

    fn cache_key(&self) -> ResourceKey {
        self.key()
    }

    fn to_resource(&self) -> Resource {
        Resource::TlsCredential(self.clone())
    }
}

/// Last-emitted state, one map per entity kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    pub hosts: BTreeMap<ResourceKey, GatewayHost>,
    pub services: BTreeMap<ResourceKey, ServiceBinding>,
    pub endpoints: BTreeMap<ResourceKey, EndpointSet>,
    pub credentials: BTreeMap<ResourceKey, TlsCredential>,
}

impl CacheSnapshot {
    pub fn len(&self, kind: ResourceKind) -> usize {
        match kind {
            ResourceKind::GatewayHost => self.hosts.len(),
            ResourceKind::ServiceBinding => self.services.len(),
            ResourceKind::EndpointSet => self.endpoints.len(),
            ResourceKind::TlsCredential => self.credentials.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
            && self.services.is_empty()
            && self.endpoints.is_empty()
            && self.credentials.is_empty()
    }
}

/// Notification counts for one entity kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindDelta {
    pub added: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl KindDelta {
    pub fn total(&self) -> usize {
        self.added + self.updated + self.deleted
    }

    fn merge(&mut self, other: KindDelta) {
        self.added += other.added;
        self.updated += other.updated;
        self.deleted += other.deleted;
    }
}

/// What one reconciliation emitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub hosts: KindDelta,
    pub services: KindDelta,
    pub endpoints: KindDelta,
    pub credentials: KindDelta,
}

impl ReconcileReport {
    pub fn delta(&self, kind: ResourceKind) -> KindDelta {
        match kind {
            ResourceKind::GatewayHost => self.hosts,
            ResourceKind::ServiceBinding => self.services,
            ResourceKind::EndpointSet => self.endpoints,
            ResourceKind::TlsCredential => self.credentials,
        }
    }

    /// Total number of notifications emitted
    pub fn total(&self) -> usize {
        self.hosts.total() + self.services.total() + self.endpoints.total() + self.credentials.total()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// The reconciliation engine shared by the poller and diagnostics callers.
pub struct CloudCache {
    state: Mutex<CacheSnapshot>,
    host_handler: Arc<dyn ResourceEventHandler>,
    endpoint_handler: Arc<dyn ResourceEventHandler>,
    metrics: MetricsRecorder,
}

impl fmt::Debug for CloudCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudCache").finish_non_exhaustive()
    }
}

impl CloudCache {
    /// Create an empty cache.
    ///
    /// `host_handler` receives gateway host, service binding and TLS credential
    /// events; `endpoint_handler` receives endpoint set events.
    pub fn new(
        host_handler: Arc<dyn ResourceEventHandler>,
        endpoint_handler: Arc<dyn ResourceEventHandler>,
    ) -> Self {
        Self {
            state: Mutex::new(CacheSnapshot::default()),
            host_handler,
            endpoint_handler,
            metrics: MetricsRecorder::new(),
        }
    }

    /// Reconcile a whole translated snapshot in one pass.
    pub fn reconcile(&self, ir: IrSnapshot) -> Result<ReconcileReport> {
        let mut state = self.lock()?;
        let started = Instant::now();

        let mut report = ReconcileReport::default();
        for batch in ir.into_batches() {
            self.apply_locked(&mut state, batch, &mut report);
        }

        self.finish_pass(&state, started, &report);
        Ok(report)
    }

    /// Reconcile a single batch; kinds the batch does not carry are untouched.
    pub fn apply(&self, batch: IrBatch) -> Result<ReconcileReport> {
        let mut state = self.lock()?;
        let started = Instant::now();

        let mut report = ReconcileReport::default();
        self.apply_locked(&mut state, batch, &mut report);

        self.finish_pass(&state, started, &report);
        Ok(report)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Result<CacheSnapshot> {
        Ok(self.lock()?.clone())
    }

    /// Number of cached entries of one kind
    pub fn len_by_kind(&self, kind: ResourceKind) -> Result<usize> {
        Ok(self.lock()?.len(kind))
    }

    fn lock(&self) -> Result<MutexGuard<'_, CacheSnapshot>> {
        self.state.lock().map_err(|_| Error::internal("cloud cache lock poisoned"))
    }

    fn apply_locked(
        &self,
        state: &mut CacheSnapshot,
        batch: IrBatch,
        report: &mut ReconcileReport,
    ) {
        let hosts = self.host_handler.as_ref();
        let endpoints = self.endpoint_handler.as_ref();

        match batch {
            IrBatch::GatewayHosts(incoming) => {
                report.hosts.merge(self.reconcile_entries(&mut state.hosts, incoming, hosts));
            }
            IrBatch::ProxyGroups { services, endpoints: sets } => {
                report.services.merge(self.reconcile_entries(&mut state.services, services, hosts));
                report.endpoints.merge(self.reconcile_entries(&mut state.endpoints, sets, endpoints));
            }
            IrBatch::Secrets(incoming) => {
                report
                    .credentials
                    .merge(self.reconcile_entries(&mut state.credentials, incoming, hosts));
            }
        }
    }

    /// Add-or-update every incoming entity, then delete whatever is left over.
    fn reconcile_entries<T: CacheEntity>(
        &self,
        entries: &mut BTreeMap<ResourceKey, T>,
        incoming: Vec<T>,
        handler: &dyn ResourceEventHandler,
    ) -> KindDelta {
        let kind = T::KIND;
        let mut delta = KindDelta::default();
        let mut seen = HashSet::with_capacity(incoming.len());

        for entity in incoming {
            let key = entity.cache_key();
            if !seen.insert(key.clone()) {
                warn!(kind = %kind, key = %key, "Duplicate key in batch, keeping first occurrence");
                continue;
            }

            match entries.get(&key) {
                None => {
                    debug!(kind = %kind, key = %key, "Adding resource");
                    handler.on_add(&entity.to_resource());
                    self.metrics.record_cache_event(kind.as_str(), "add");
                    entries.insert(key, entity);
                    delta.added += 1;
                }
                Some(existing) if !existing.equivalent(&entity) => {
                    debug!(kind = %kind, key = %key, "Updating resource");
                    handler.on_update(&existing.to_resource(), &entity.to_resource());
                    self.metrics.record_cache_event(kind.as_str(), "update");
                    entries.insert(key, entity);
                    delta.updated += 1;
                }
                Some(_) => {}
            }
        }

        let stale: Vec<ResourceKey> =
            entries.keys().filter(|key| !seen.contains(*key)).cloned().collect();

        for key in stale {
            if let Some(existing) = entries.get(&key) {
                debug!(kind = %kind, key = %key, "Deleting resource");
                handler.on_delete(&existing.to_resource());
                self.metrics.record_cache_event(kind.as_str(), "delete");
            }
            entries.remove(&key);
            delta.deleted += 1;
        }

        delta
    }

    fn finish_pass(&self, state: &CacheSnapshot, started: Instant, report: &ReconcileReport) {
        self.metrics.record_reconcile_duration(started.elapsed().as_secs_f64());
        for kind in [
            ResourceKind::GatewayHost,
            ResourceKind::ServiceBinding,
            ResourceKind::EndpointSet,
            ResourceKind::TlsCredential,
        ] {
            self.metrics.update_cache_entries(kind.as_str(), state.len(kind));
        }

        if report.is_empty() {
            debug!(
                hosts = state.hosts.len(),
                endpoints = state.endpoints.len(),
                "Reconciliation detected no changes"
            );
        } else {
            info!(
                hosts_added = report.hosts.added,
                hosts_updated = report.hosts.updated,
                hosts_deleted = report.hosts.deleted,
                services_changed = report.services.total(),
                endpoints_changed = report.endpoints.total(),
                credentials_changed = report.credentials.total(),
                total_hosts = state.hosts.len(),
                "Reconciliation produced delta"
            );
        }
    }
}
