use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use dimshift_core::math::{Vec3, pose, rot_x, rot_z};
use dimshift_core::mesh::generators::{generate_box, generate_sphere};

fn sphere_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_sphere");
    for (segments, rings) in [(12, 8), (32, 16), (128, 64)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{segments}x{rings}")),
            &(segments, rings),
            |b, &(segments, rings)| b.iter(|| generate_sphere(1.0, segments, rings)),
        );
    }
    group.finish();
}

fn collision_mesh_queries(c: &mut Criterion) {
    let sphere = generate_sphere(1.0, 64, 32);
    let cuboid = generate_box(Vec3::new(0.5, 1.0, 1.5));
    let placed = pose(Vec3::new(1.0, -2.0, 0.5), rot_z(0.4) * rot_x(0.3));

    let mut group = c.benchmark_group("mesh_queries");
    group.bench_function("sphere_world_space", |b| {
        b.iter(|| sphere.transformed(black_box(&placed)))
    });
    group.bench_function("sphere_bounds", |b| b.iter(|| black_box(&sphere).bounds()));
    group.bench_function("box_world_space", |b| {
        b.iter(|| cuboid.transformed(black_box(&placed)))
    });
    group.finish();
}

criterion_group!(benches, sphere_generation, collision_mesh_queries);
criterion_main!(benches);
