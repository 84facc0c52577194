//! Procedural collision meshes for demo scenes, benches and tests.

use std::f32::consts::{PI, TAU};

use super::TriMesh;
use crate::math::Vec3;

/// Closed box around the origin. Corners are shared, winding faces outward.
pub fn generate_box(half_extents: Vec3) -> TriMesh {
    let (x, y, z) = (half_extents.x, half_extents.y, half_extents.z);
    let positions = vec![
        Vec3::new(-x, -y, -z),
        Vec3::new(x, -y, -z),
        Vec3::new(x, y, -z),
        Vec3::new(-x, y, -z),
        Vec3::new(-x, -y, z),
        Vec3::new(x, -y, z),
        Vec3::new(x, y, z),
        Vec3::new(-x, y, z),
    ];
    #[rustfmt::skip]
    let triangles = vec![
        [0, 2, 1], [0, 3, 2], // -Z
        [4, 5, 6], [4, 6, 7], // +Z
        [0, 1, 5], [0, 5, 4], // -Y
        [3, 7, 6], [3, 6, 2], // +Y
        [0, 4, 7], [0, 7, 3], // -X
        [1, 2, 6], [1, 6, 5], // +X
    ];
    TriMesh::new(positions, triangles).with_label("box")
}

/// Latitude/longitude sphere with poles on the Y axis.
///
/// Seam vertices are duplicated, giving `(rings + 1) * (segments + 1)`
/// vertices and `2 * rings * segments` triangles (pole rows included).
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> TriMesh {
    let positions = (0..=rings)
        .flat_map(|ring| {
            let (sin_lat, cos_lat) = (ring as f32 * PI / rings as f32).sin_cos();
            (0..=segments).map(move |segment| {
                let (sin_lon, cos_lon) = (segment as f32 * TAU / segments as f32).sin_cos();
                Vec3::new(sin_lat * cos_lon, cos_lat, sin_lat * sin_lon) * radius
            })
        })
        .collect();

    let stride = segments + 1;
    let triangles = (0..rings)
        .flat_map(|ring| (0..segments).map(move |segment| ring * stride + segment))
        .flat_map(|a| {
            let b = a + stride;
            [[a, b, a + 1], [a + 1, b, b + 1]]
        })
        .collect();

    TriMesh::new(positions, triangles).with_label("sphere")
}

/// Zero-thickness rectangle lying in the XY plane.
pub fn generate_quad(half_width: f32, half_height: f32) -> TriMesh {
    let positions = vec![
        Vec3::new(-half_width, -half_height, 0.0),
        Vec3::new(half_width, -half_height, 0.0),
        Vec3::new(half_width, half_height, 0.0),
        Vec3::new(-half_width, half_height, 0.0),
    ];
    TriMesh::new(positions, vec![[0, 1, 2], [2, 3, 0]]).with_label("quad")
}
