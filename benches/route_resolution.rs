use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use station_nav::nav::{Leg, Location, LocationTable, PathAnimator, RouteGraph, StationMap};

/// Chain of `count` stops a meter apart, each linked to the next.
fn chain_station(count: usize) -> (LocationTable, RouteGraph) {
    let locations: LocationTable = (0..count)
        .map(|i| Location::new(format!("Stop {i}"), Vec3::new(i as f32, 0.0, 0.0)))
        .collect();

    let mut routes = RouteGraph::new();
    for i in 0..count - 1 {
        routes.connect(
            &format!("Stop {i}"),
            &format!("Stop {}", i + 1),
            Leg::direct(),
        );
    }

    (locations, routes)
}

/// Benchmark: resolving the bundled station end to end
fn bench_bundled_resolution(c: &mut Criterion) {
    let (locations, routes) = StationMap::bundled().build().unwrap();

    c.bench_function("resolve_bundled_full_route", |b| {
        b.iter(|| {
            black_box(routes.resolve(
                black_box("Ticket Counter"),
                black_box("Stair"),
                &locations,
            ))
        })
    });

    c.bench_function("resolve_bundled_adjacent_pair", |b| {
        b.iter(|| black_box(routes.resolve(black_box("Bypass"), black_box("Stair"), &locations)))
    });
}

/// Benchmark: resolution cost against growing station chains
fn bench_chain_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_chain");

    for count in [10, 100, 1000].iter() {
        let (locations, routes) = chain_station(*count);
        let last = format!("Stop {}", count - 1);

        group.bench_with_input(BenchmarkId::new("stops", count), count, |b, _| {
            b.iter(|| black_box(routes.resolve("Stop 0", &last, &locations)))
        });
    }

    group.finish();
}

/// Benchmark: one simulated second of marker stepping (60 frames)
fn bench_marker_walk(c: &mut Criterion) {
    let (locations, routes) = StationMap::bundled().build().unwrap();
    let path = routes
        .resolve("Ticket Counter", "Stair", &locations)
        .unwrap();

    c.bench_function("marker_walk_60_frames", |b| {
        b.iter(|| {
            let mut animator = PathAnimator::new();
            animator.install(path.clone());
            let mut last = Vec3::ZERO;
            for _ in 0..60 {
                if let Some(position) = animator.step() {
                    last = position;
                }
            }
            black_box(last)
        })
    });

    // Enough frames to cross both segments and wrap back to the start.
    c.bench_function("marker_walk_full_loop", |b| {
        b.iter(|| {
            let mut animator = PathAnimator::new();
            animator.install(path.clone());
            let mut last = Vec3::ZERO;
            for _ in 0..2_100 {
                if let Some(position) = animator.step() {
                    last = position;
                }
            }
            black_box(last)
        })
    });
}

criterion_group!(
    benches,
    bench_bundled_resolution,
    bench_chain_resolution,
    bench_marker_walk,
);

criterion_main!(benches);
