//! Polygon → flat mesh.

use serde::{Deserialize, Serialize};

use dimshift_core::math::{Vec2, Vec3};
use dimshift_core::mesh::TriMesh;

use crate::frame::PairFrame;
use crate::shapes::Polygon;
use crate::triangulate::triangulate_paths;

/// Options for turning a polygon back into a mesh collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonMeshOptions {
    /// Build a new mesh. When off, the previous mesh stays in place.
    pub generate: bool,
    /// Duplicate every triangle with reversed winding for back-face
    /// collision.
    pub double_sided: bool,
    /// Drop the replaced mesh. When off it is handed back to the caller,
    /// since other colliders may still share it.
    pub release_previous: bool,
}

impl Default for PolygonMeshOptions {
    fn default() -> Self {
        Self {
            generate: true,
            double_sided: false,
            release_previous: true,
        }
    }
}

impl PolygonMeshOptions {
    pub fn with_generate(mut self, generate: bool) -> Self {
        self.generate = generate;
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn with_release_previous(mut self, release_previous: bool) -> Self {
        self.release_previous = release_previous;
        self
    }
}

/// Build a flat mesh from `polygon`, laid out at `depth` along the planar
/// frame's Z axis and expressed in volume-local coordinates.
///
/// Returns `None` when the polygon has no triangulable area.
pub fn polygon_to_mesh(
    polygon: &Polygon,
    frame: &PairFrame,
    depth: f32,
    double_sided: bool,
) -> Option<TriMesh> {
    let paths: Vec<Vec<Vec2>> = polygon
        .paths
        .iter()
        .map(|path| path.iter().map(|p| p + polygon.offset).collect())
        .collect();
    let flat = triangulate_paths(&paths);
    if flat.triangles.is_empty() {
        return None;
    }

    let positions = flat
        .vertices
        .iter()
        .map(|p| frame.planar_to_volume(&Vec3::new(p.x, p.y, depth)))
        .collect();

    let mut triangles = flat.triangles;
    if double_sided {
        let back: Vec<[u32; 3]> = triangles.iter().map(|&[a, b, c]| [a, c, b]).collect();
        triangles.extend(back);
    }

    Some(TriMesh::new(positions, triangles).with_label("polygon extrusion"))
}
