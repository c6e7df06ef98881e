//! Common test utilities for all integration tests.
//!
//! Provides a recording event handler, a scripted snapshot source and
//! snapshot builders.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cloudplane::domain::RawSnapshot;
use cloudplane::{CloudCache, Error, Resource, ResourceEventHandler, ResourceKind, Result, SnapshotSource};
use serde_json::{json, Value};

/// One notification as seen by a consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Add(ResourceKind, String),
    Update(ResourceKind, String),
    Delete(ResourceKind, String),
}

/// Handler that records every notification in order
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<Event>>,
}

impl RecordingHandler {
    pub fn take(&self) -> Vec<Event> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl ResourceEventHandler for RecordingHandler {
    fn on_add(&self, resource: &Resource) {
        self.events.lock().unwrap().push(Event::Add(resource.kind(), resource.key().to_string()));
    }

    fn on_update(&self, _old: &Resource, new: &Resource) {
        self.events.lock().unwrap().push(Event::Update(new.kind(), new.key().to_string()));
    }

    fn on_delete(&self, resource: &Resource) {
        self.events.lock().unwrap().push(Event::Delete(resource.kind(), resource.key().to_string()));
    }
}

pub struct TestCache {
    pub cache: Arc<CloudCache>,
    pub hosts: Arc<RecordingHandler>,
    pub endpoints: Arc<RecordingHandler>,
}

pub fn recording_cache() -> TestCache {
    let hosts = Arc::new(RecordingHandler::default());
    let endpoints = Arc::new(RecordingHandler::default());
    TestCache { cache: Arc::new(CloudCache::new(hosts.clone(), endpoints.clone())), hosts, endpoints }
}

/// Source that replays a fixed script, then fails every further fetch
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<RawSnapshot>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<RawSnapshot>>) -> Self {
        Self { script: Mutex::new(script.into()), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    async fn fetch(&self, _proxy_id: &str) -> Result<RawSnapshot> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::fetch("script exhausted")))
    }
}

/// A service record with one route to one upstream
pub fn service(name: &str, prefix: &str, upstream: &str, address: &str) -> Value {
    json!({
        "proxy": {"name": "edge", "settings": {"min_tls_version": "1.2"}},
        "name": name,
        "fqdn": format!("{}.acme.io", name),
        "routes": [{
            "prefix": prefix,
            "upstreams": [{"name": upstream, "address": address, "port": 8080}]
        }]
    })
}

pub fn snapshot(services: Vec<Value>) -> RawSnapshot {
    serde_json::from_value(json!({ "services": services })).unwrap()
}
