//! Property tests for translation and reconciliation

mod common;

use cloudplane::cache::CacheSnapshot;
use cloudplane::domain::ResourceKey;
use cloudplane::Translator;
use common::{recording_cache, snapshot};
use proptest::prelude::*;
use serde_json::{json, Value};

const CONDITION_BLOBS: [&str; 6] = [
    "",
    "not-json",
    "{}",
    r#"{"Prefix":"/b"}"#,
    r#"{"Prefix":"/b","match":[{"header_name":" x-v ","header_value":" 1 "}]}"#,
    r#"{"match":[{"header_name":":method","header_value":"GET"},{"header_name":"x-a","header_value":"2"}]}"#,
];

fn filter() -> impl Strategy<Value = Value> {
    (prop::sample::select(vec!["cors", "authn"]), prop::sample::select(vec!["cors", "jwt"]))
        .prop_map(|(name, kind)| json!({"name": name, "type": kind}))
}

fn secret() -> impl Strategy<Value = Value> {
    (prop::sample::select(vec!["", "cert-a", "cert-b"]), "[A-C]{0,3}")
        .prop_map(|(name, body)| json!({"name": name, "certificate": body, "private_key": body}))
}

/// Any subset of the `hc_*` fields; absent ones fall back to defaults
fn health_check() -> impl Strategy<Value = Value> {
    (
        prop::option::of(prop::sample::select(vec!["", "/healthz"])),
        prop::option::of(prop::sample::select(vec!["", "api.internal"])),
        prop::option::of(0u32..3),
        prop::option::of(0u32..3),
        prop::option::of(0u32..3),
        prop::option::of(0u32..3),
    )
        .prop_map(|(path, host, interval, timeout, unhealthy, healthy)| {
            let fields = [
                ("hc_path", path.map(|v| json!(v))),
                ("hc_host", host.map(|v| json!(v))),
                ("hc_interval", interval.map(|v| json!(v))),
                ("hc_timeout", timeout.map(|v| json!(v))),
                ("hc_unhealthy_threshold", unhealthy.map(|v| json!(v))),
                ("hc_healthy_threshold", healthy.map(|v| json!(v))),
            ];
            let record: serde_json::Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key.to_string(), v)))
                .collect();
            Value::Object(record)
        })
}

fn upstream() -> impl Strategy<Value = Value> {
    (
        "[p-r]",
        prop::sample::select(vec!["", "10.0.0.1", "10.0.0.2"]),
        prop::sample::select(vec![80u16, 8080]),
        prop::sample::select(vec![0u32, 50, 100]),
        prop::sample::select(vec!["", "RoundRobin", "LeastRequest"]),
        health_check(),
    )
        .prop_map(|(name, address, port, weight, strategy, mut record)| {
            record["name"] = json!(name);
            record["address"] = json!(address);
            record["port"] = json!(port);
            record["weight"] = json!(weight);
            record["strategy"] = json!(strategy);
            record
        })
}

fn route() -> impl Strategy<Value = Value> {
    (
        prop::sample::select(vec!["", "/", "/v1"]),
        prop::sample::select(CONDITION_BLOBS.to_vec()),
        prop::sample::select(vec!["", "/internal"]),
        any::<bool>(),
        any::<bool>(),
        prop::collection::vec(upstream(), 0..3),
        prop::collection::vec(filter(), 0..2),
    )
        .prop_map(|(prefix, config, rewrite, websocket, insecure, upstreams, filters)| {
            json!({
                "prefix": prefix,
                "config": config,
                "prefix_rewrite": rewrite,
                "websocket": websocket,
                "insecure": insecure,
                "upstreams": upstreams,
                "filters": filters,
            })
        })
}

fn service_record() -> impl Strategy<Value = Value> {
    (
        "[a-d]{0,2}",
        prop::option::weighted(0.9, "[a-d]{1,2}"),
        prop::sample::select(vec!["", "1.2", "1.3"]),
        prop::collection::vec(route(), 0..3),
        prop::collection::vec(secret(), 0..3),
        prop::collection::vec(filter(), 0..2),
    )
        .prop_map(|(name, fqdn, min_tls, routes, secrets, filters)| {
            json!({
                "proxy": {"name": "edge", "settings": {"min_tls_version": min_tls}},
                "name": name,
                "fqdn": fqdn.map(|f| format!("{}.acme.io", f)).unwrap_or_default(),
                "routes": routes,
                "secrets": secrets,
                "filters": filters,
            })
        })
}

fn records() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(service_record(), 0..5)
}

fn keys(state: &CacheSnapshot) -> Vec<Vec<ResourceKey>> {
    vec![
        state.hosts.keys().cloned().collect(),
        state.services.keys().cloned().collect(),
        state.endpoints.keys().cloned().collect(),
        state.credentials.keys().cloned().collect(),
    ]
}

proptest! {
    #[test]
    fn translation_is_deterministic(records in records()) {
        let translator = Translator::new("acme");
        let raw = snapshot(records);
        prop_assert_eq!(translator.translate(&raw), translator.translate(&raw));
    }

    #[test]
    fn second_identical_pass_is_silent(records in records()) {
        let test = recording_cache();
        let translator = Translator::new("acme");
        let raw = snapshot(records);

        test.cache.reconcile(translator.translate(&raw)).unwrap();
        test.hosts.take();
        test.endpoints.take();

        let report = test.cache.reconcile(translator.translate(&raw)).unwrap();
        prop_assert!(report.is_empty());
        prop_assert!(test.hosts.take().is_empty());
        prop_assert!(test.endpoints.take().is_empty());
    }

    #[test]
    fn cache_converges_to_latest_snapshot(first in records(), second in records()) {
        let translator = Translator::new("acme");

        let incremental = recording_cache();
        incremental.cache.reconcile(translator.translate(&snapshot(first))).unwrap();
        incremental.cache.reconcile(translator.translate(&snapshot(second.clone()))).unwrap();

        let fresh = recording_cache();
        fresh.cache.reconcile(translator.translate(&snapshot(second))).unwrap();

        prop_assert_eq!(
            keys(&incremental.cache.snapshot().unwrap()),
            keys(&fresh.cache.snapshot().unwrap())
        );
    }
}
