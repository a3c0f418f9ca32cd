use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use oceanscape::params::SurfaceConfig;
use oceanscape::surface::{AnimatedSurface, Vertex};

fn surface(resolution: usize) -> AnimatedSurface {
    let config = SurfaceConfig {
        resolution_x: resolution,
        resolution_z: resolution,
        ..SurfaceConfig::default()
    };
    AnimatedSurface::create(config).expect("valid bench config")
}

/// Benchmark: single displacement evaluation (two wave terms)
fn bench_displacement_at(c: &mut Criterion) {
    let surface = surface(4);
    let base = Vec3::new(12.5, 0.0, -40.0);

    c.bench_function("displacement_at", |b| {
        b.iter(|| surface.displacement_at(black_box(base), black_box(1234.5)))
    });
}

/// Benchmark: full per-tick vertex pass at increasing resolution
fn bench_write_vertices(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_vertices");

    for resolution in [64, 256, 512] {
        let mut surface = surface(resolution);
        surface.advance(10.0);
        let mut out = vec![Vertex::default(); surface.vertex_count()];

        group.bench_with_input(BenchmarkId::new("serial", resolution), &resolution, |b, _| {
            b.iter(|| surface.write_vertices(black_box(&mut out)))
        });

        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        group.bench_with_input(BenchmarkId::new("parallel", resolution), &resolution, |b, _| {
            b.iter(|| surface.write_vertices_parallel(black_box(&mut out), workers))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_displacement_at, bench_write_vertices);
criterion_main!(benches);
