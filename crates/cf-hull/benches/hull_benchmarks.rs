//! Benchmarks for cf-hull operations.
//!
//! Run with: cargo bench -p cf-hull
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p cf-hull -- --save-baseline main
//! 2. After changes: cargo bench -p cf-hull -- --baseline main

#![allow(missing_docs, clippy::unwrap_used, clippy::cast_sign_loss)]

use cf_hull::{
    Direction, FaceIndex, FaceIndexConfig, HullManager, Point3, Ray, Vector3, VoxelCoord,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

// =============================================================================
// Test Hull Generation
// =============================================================================

/// Create a solid cube of `size³` cells with all diffs drained.
fn create_block(size: i32) -> HullManager<u32> {
    let mut hull = HullManager::default();
    for x in 0..size {
        for y in 0..size {
            for z in 0..size {
                hull.update(VoxelCoord::new(x, y, z), 1).unwrap();
            }
        }
    }
    for direction in Direction::ALL {
        hull.take_hull_additions(direction);
        hull.take_hull_removals(direction);
    }
    hull
}

/// Create a hollow cube of `size³` cells (one cell thick).
fn create_shell(size: i32) -> HullManager<u32> {
    let mut hull = HullManager::default();
    let edge = size - 1;
    for x in 0..size {
        for y in 0..size {
            for z in 0..size {
                if [x, y, z].iter().any(|&c| c == 0 || c == edge) {
                    hull.update(VoxelCoord::new(x, y, z), 1).unwrap();
                }
            }
        }
    }
    hull
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_fill_block(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_block");
    for size in [10, 25, 50] {
        group.throughput(Throughput::Elements((size * size * size) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| black_box(create_block(size)));
        });
    }
    group.finish();
}

fn bench_edit_and_drain(c: &mut Criterion) {
    let mut hull = create_block(50);
    c.bench_function("edit_and_drain", |b| {
        b.iter(|| {
            hull.clear_position(VoxelCoord::new(49, 25, 25)).unwrap();
            hull.update(VoxelCoord::new(50, 25, 25), 2).unwrap();
            hull.clear_position(VoxelCoord::new(50, 25, 25)).unwrap();
            hull.update(VoxelCoord::new(49, 25, 25), 1).unwrap();
            for direction in Direction::ALL {
                black_box(hull.take_hull_additions(direction));
                black_box(hull.take_hull_removals(direction));
            }
        });
    });
}

fn bench_hit_test(c: &mut Criterion) {
    let hull = create_block(50);
    let ray = Ray::new(
        Point3::new(300.0, 25.5, 25.5),
        Vector3::new(-1.0, 0.01, -0.02),
    );
    c.bench_function("hit_test", |b| {
        b.iter(|| black_box(hull.hit_test(black_box(&ray))));
    });
}

fn bench_compute_exterior(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_exterior");
    for size in [10, 30] {
        let hull = create_shell(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &hull, |b, hull| {
            b.iter(|| black_box(hull.compute_exterior()));
        });
    }
    group.finish();
}

fn bench_face_index_sync(c: &mut Criterion) {
    c.bench_function("face_index_sync", |b| {
        b.iter(|| {
            let mut hull = create_shell(20);
            let mut index = FaceIndex::new(FaceIndexConfig::default()).unwrap();
            black_box(index.sync(&mut hull))
        });
    });
}

criterion_group!(
    benches,
    bench_fill_block,
    bench_edit_and_drain,
    bench_hit_test,
    bench_compute_exterior,
    bench_face_index_sync
);
criterion_main!(benches);
