//! # Pathway Checkpoint Benchmarks
//!
//! | Operation | Expectation |
//! |-----------|-------------|
//! | Checkpoint, no sink | Hashing only, sub-microsecond |
//! | Checkpoint, saturated sink | Same order as with free capacity |
//! | Encode / decode | Sub-microsecond |
//! | Merge | Independent of branch contents |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use data_streams::{decode, encode, merge, ChannelSink, DataStreams, Pathway};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

// ============================================================================
// Checkpoint
// ============================================================================

fn bench_checkpoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("checkpoint");
    group.measurement_time(Duration::from_secs(5));

    let tags = ["type:kafka", "direction:in", "group:billing", "topic:orders", "partition:3"];
    let origin = Pathway::new("billing", SystemTime::now(), None);

    group.bench_function("no_sink", |b| {
        b.iter(|| black_box(origin.checkpoint(SystemTime::now(), tags, None)))
    });

    // Never drained: every offer after the first is dropped
    let (saturated, _receiver) = ChannelSink::new(1);
    let streams = DataStreams::with_sink("billing", Arc::new(saturated));
    streams.checkpoint(&origin, tags);
    group.bench_function("saturated_sink", |b| {
        b.iter(|| black_box(streams.checkpoint(&origin, tags)))
    });

    for tag_count in [0usize, 4, 16, 64] {
        let many: Vec<String> = (0..tag_count).map(|i| format!("tag:{i}")).collect();
        group.throughput(Throughput::Elements(tag_count as u64));
        group.bench_with_input(BenchmarkId::new("edge_tags", tag_count), &many, |b, many| {
            b.iter(|| black_box(origin.checkpoint(SystemTime::now(), many.iter().cloned(), None)))
        });
    }

    group.finish();
}

// ============================================================================
// Wire codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let pathway = Pathway::new("orders-api", SystemTime::now(), None);
    let data = encode(&pathway);

    group.bench_function("encode", |b| b.iter(|| black_box(encode(&pathway))));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(decode(&data, "billing").is_ok()))
    });

    group.finish();
}

// ============================================================================
// Merge
// ============================================================================

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");
    let origin = Pathway::new("join", SystemTime::now(), None);

    for branches in [2usize, 16, 256] {
        let pathways: Vec<Pathway> = (0..branches)
            .map(|i| origin.checkpoint(SystemTime::now(), [format!("branch:{i}")], None))
            .collect();
        group.bench_with_input(BenchmarkId::new("branches", branches), &pathways, |b, p| {
            b.iter(|| black_box(merge(p)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_checkpoint, bench_codec, bench_merge);
criterion_main!(benches);
