use std::sync::Arc;
use std::time::Duration;

use cloudplane::domain::RawSnapshot;
use cloudplane::{CloudCache, Resource, ResourceEventHandler, Translator};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::json;

struct NoopHandler;

impl ResourceEventHandler for NoopHandler {
    fn on_add(&self, _resource: &Resource) {}
    fn on_update(&self, _old: &Resource, _new: &Resource) {}
    fn on_delete(&self, _resource: &Resource) {}
}

fn snapshot(count: usize, version: usize) -> RawSnapshot {
    let services: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "name": format!("svc-{}", i),
                "fqdn": format!("svc-{}.bench.io", i),
                "routes": [
                    {"prefix": "/", "upstreams": [
                        {"name": format!("up-{}", i), "address": format!("10.0.{}.{}", i / 250, i % 250), "port": 8080}
                    ]},
                    {"config": format!(r#"{{"Prefix":"/v{}","match":[{{"header_name":"x-v","header_value":"1"}}]}}"#, version),
                     "upstreams": [{"name": format!("up-{}", i), "port": 8080, "weight": 50}]}
                ]
            })
        })
        .collect();
    serde_json::from_value(json!({ "services": services })).unwrap()
}

fn cache() -> CloudCache {
    CloudCache::new(Arc::new(NoopHandler), Arc::new(NoopHandler))
}

fn bench_steady_state(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_steady_state");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    let translator = Translator::new("bench");
    for count in [100, 500, 1000].iter() {
        let raw = snapshot(*count, 1);
        let cache = cache();
        cache.reconcile(translator.translate(&raw)).unwrap();

        group.bench_with_input(BenchmarkId::new("unchanged", count), count, |b, &_count| {
            b.iter(|| {
                let report = cache.reconcile(translator.translate(black_box(&raw))).unwrap();
                black_box(report)
            });
        });
    }

    group.finish();
}

fn bench_full_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile_churn");
    group.measurement_time(Duration::from_secs(10));

    let translator = Translator::new("bench");
    for count in [100, 500, 1000].iter() {
        let snapshots = [translator.translate(&snapshot(*count, 1)), translator.translate(&snapshot(*count, 2))];
        let cache = cache();
        let mut turn = 0usize;

        group.bench_with_input(BenchmarkId::new("every_host_updated", count), count, |b, &_count| {
            b.iter(|| {
                turn += 1;
                let report = cache.reconcile(snapshots[turn % 2].clone()).unwrap();
                black_box(report)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_steady_state, bench_full_churn);
criterion_main!(benches);
