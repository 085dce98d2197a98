//! # Block Index Benchmarks
//!
//! | Operation | Expectation |
//! |-----------|-------------|
//! | Batch insert | One commit per batch, scales with batch size |
//! | Lookup by height | Single point read |
//! | Lookup by hash | Index read plus point read |
//! | Finalized-by-hash check | Same path as lookup by hash |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fg_block_index::BlockIndexApi;
use fg_tests::fixtures::{blocks, hash_for, open_store};
use std::time::Duration;
use tempfile::TempDir;

const PRELOADED: u64 = 10_000;

// ============================================================================
// Writes
// ============================================================================

fn bench_batch_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("block-index-insert");
    group.measurement_time(Duration::from_secs(10));

    for size in [1u64, 10, 100, 500] {
        let dir = TempDir::new().unwrap();
        let store = open_store(dir.path());
        let mut next_height = 0u64;

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::new("insert_batch", size), &size, |b, &size| {
            b.iter(|| {
                let batch = blocks(next_height..next_height + size);
                next_height += size;
                store.insert_blocks(black_box(&batch)).unwrap();
            })
        });
    }

    group.finish();
}

// ============================================================================
// Reads
// ============================================================================

fn bench_lookups(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let store = open_store(dir.path());
    for start in (0..PRELOADED).step_by(500) {
        store.insert_blocks(&blocks(start..start + 500)).unwrap();
    }

    let mut group = c.benchmark_group("block-index-lookup");
    let mut height = 0u64;

    group.bench_function("get_block_by_height", |b| {
        b.iter(|| {
            height = (height + 7919) % PRELOADED;
            black_box(store.get_block_by_height(height).unwrap())
        })
    });

    let hashes: Vec<String> = (0..PRELOADED).map(hash_for).collect();
    let mut i = 0usize;

    group.bench_function("get_block_by_hash", |b| {
        b.iter(|| {
            i = (i + 7919) % hashes.len();
            black_box(store.get_block_by_hash(&hashes[i]).unwrap())
        })
    });

    group.bench_function("is_finalized_by_hash_miss", |b| {
        b.iter(|| black_box(store.query_is_block_finalized_by_hash("0xabsent").unwrap()))
    });

    group.bench_function("latest_finalized_block", |b| {
        b.iter(|| black_box(store.query_latest_finalized_block().unwrap()))
    });

    group.finish();
}

criterion_group!(benches, bench_batch_insert, bench_lookups);
criterion_main!(benches);
