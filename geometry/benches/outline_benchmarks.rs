use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dimshift_core::math::{Pose, Vec2, Vec3, pose, rot_x, rot_y};
use dimshift_core::mesh::generators::{generate_box, generate_sphere};
use dimshift_geometry::mappers::cuboid::{box_to_polygon, is_box_shape};
use dimshift_geometry::simplify::simplify_closed;
use dimshift_geometry::triangulate::triangulate_paths;
use dimshift_geometry::{Cuboid, OutlineSettings, PairFrame, SoftwareRenderer, extract_outline};

// ---------------------------------------------------------------------------
// Outline extraction
// ---------------------------------------------------------------------------

fn bench_extract_sphere(c: &mut Criterion) {
    let mesh = generate_sphere(1.0, 32, 16);
    let mut renderer = SoftwareRenderer::new();
    for resolution in [64u32, 256] {
        let settings = OutlineSettings::default().with_resolution(resolution);
        c.bench_function(&format!("extract_outline_sphere_{resolution}"), |b| {
            b.iter(|| {
                extract_outline(
                    black_box(&mesh),
                    &Pose::identity(),
                    &settings,
                    &mut renderer,
                )
            });
        });
    }
}

fn bench_extract_tilted_box(c: &mut Criterion) {
    let mesh = generate_box(Vec3::new(1.0, 0.5, 2.0));
    let to_planar = pose(Vec3::zeros(), rot_y(0.6) * rot_x(0.3));
    let settings = OutlineSettings::default();
    let mut renderer = SoftwareRenderer::new();
    c.bench_function("extract_outline_tilted_box_128", |b| {
        b.iter(|| extract_outline(black_box(&mesh), &to_planar, &settings, &mut renderer));
    });
}

// ---------------------------------------------------------------------------
// Simplification and triangulation
// ---------------------------------------------------------------------------

fn star(points: usize) -> Vec<Vec2> {
    (0..points)
        .map(|i| {
            let a = i as f32 / points as f32 * std::f32::consts::TAU;
            let r = if i % 2 == 0 { 10.0 } else { 9.0 };
            Vec2::new(a.cos() * r, a.sin() * r)
        })
        .collect()
}

fn bench_simplify(c: &mut Criterion) {
    let contour = star(4096);
    c.bench_function("simplify_closed_4096", |b| {
        b.iter(|| simplify_closed(black_box(&contour), black_box(0.5)));
    });
}

fn bench_triangulate(c: &mut Criterion) {
    let paths = vec![star(256), star(64).into_iter().map(|p| p * 0.3).collect()];
    c.bench_function("triangulate_star_with_hole", |b| {
        b.iter(|| triangulate_paths(black_box(&paths)));
    });
}

// ---------------------------------------------------------------------------
// Box mapping
// ---------------------------------------------------------------------------

fn bench_box_mapping(c: &mut Criterion) {
    let frame = PairFrame::new(pose(Vec3::zeros(), rot_y(0.6) * rot_x(0.3)), Pose::identity());
    let cuboid = Cuboid::default();
    c.bench_function("box_to_polygon_and_check", |b| {
        b.iter(|| {
            let polygon = box_to_polygon(black_box(&cuboid), &frame);
            polygon.map(|p| is_box_shape(&p, &frame))
        });
    });
}

criterion_group!(outline, bench_extract_sphere, bench_extract_tilted_box);
criterion_group!(polylines, bench_simplify, bench_triangulate);
criterion_group!(boxes, bench_box_mapping);
criterion_main!(outline, polylines, boxes);
