//! Per-message CPU cost of the publish path using Criterion.rs.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fifo_load_core::compute_shard;
use fifo_load_core::contract::OrderMessage;
use fifo_load_core::engine::build_publish_request;

fn bench_compute_shard(c: &mut Criterion) {
    let keys: Vec<String> = (0..2_000).map(|customer| format!("CUST-{customer:04}")).collect();

    let mut group = c.benchmark_group("compute_shard");
    for num_shards in [1usize, 3, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(num_shards),
            &num_shards,
            |b, &num_shards| {
                b.iter(|| {
                    for key in &keys {
                        black_box(compute_shard(key, num_shards).expect("shard should compute"));
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_build_publish_request(c: &mut Criterion) {
    let timestamp = Utc::now();

    c.bench_function("build_publish_request", |b| {
        let mut index = 0usize;
        b.iter(|| {
            let message = OrderMessage::for_index(index, timestamp);
            black_box(build_publish_request(index, &message, 3).expect("request should build"));
            index += 1;
        });
    });
}

criterion_group!(benches, bench_compute_shard, bench_build_publish_request);
criterion_main!(benches);
