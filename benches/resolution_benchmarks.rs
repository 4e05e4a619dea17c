//! Resolution benchmarks for signalbox-features

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;

use signalbox::{EvaluationContext, FeatureConfig, InMemoryBackend, Registry, RegistryConfig};

fn registry(rt: &tokio::runtime::Runtime) -> Arc<Registry> {
    let config = RegistryConfig::new()
        .with_feature(FeatureConfig::new("dark_mode"))
        .with_feature(
            FeatureConfig::new("rollout")
                .with_default(false)
                .with_group("region_us")
                .with_group("region_eu"),
        );
    let registry = Arc::new(Registry::from_config(config, Arc::new(InMemoryBackend::new())).unwrap());

    rt.block_on(async {
        let region = registry.group("region_eu");
        for i in 0..100 {
            region.add_member(&format!("server{}", i)).await.unwrap();
        }
    });

    registry
}

fn resolution_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let registry = registry(&rt);

    let mut group = c.benchmark_group("resolution");
    group.throughput(Throughput::Elements(1));

    group.bench_function("global_only", |b| {
        let context = EvaluationContext::new();
        b.to_async(&rt).iter(|| async {
            black_box(registry.is_enabled("dark_mode", &context).await.unwrap())
        });
    });

    group.bench_function("any_second_group", |b| {
        let context = EvaluationContext::new().for_any(["missing", "server42"]);
        b.to_async(&rt).iter(|| async {
            black_box(registry.is_enabled("rollout", &context).await.unwrap())
        });
    });

    group.bench_function("all_ten_members", |b| {
        let context = EvaluationContext::new().for_all((0..10).map(|i| format!("server{}", i)));
        b.to_async(&rt).iter(|| async {
            black_box(registry.is_enabled("rollout", &context).await.unwrap())
        });
    });

    group.finish();
}

fn feature_lookup_benchmark(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let registry = registry(&rt);

    c.bench_function("feature_for_cached", |b| {
        b.iter(|| black_box(registry.feature_for("rollout").unwrap()));
    });
}

criterion_group!(benches, resolution_benchmark, feature_lookup_benchmark);
criterion_main!(benches);
