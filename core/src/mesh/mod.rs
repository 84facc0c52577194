//! CPU-side triangle meshes.
//!
//! This module provides:
//! - [`TriMesh`] - indexed triangle list used as collision geometry
//! - Generators for common shapes (box, sphere, quad)
//!
//! Collision meshes carry positions only. Normals and UVs belong to the
//! rendering side and are never needed by the conversion pipeline.

pub mod generators;

use crate::math::{Pose, Rot3, Vec3};

/// Indexed triangle mesh with `f32` positions and `u32` indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    label: Option<String>,
}

impl TriMesh {
    /// Create a mesh from positions and triangle indices.
    ///
    /// Triangles referencing out-of-range vertices are dropped with a warning.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        let count = positions.len() as u32;
        let before = triangles.len();
        let triangles: Vec<[u32; 3]> = triangles
            .into_iter()
            .filter(|t| t.iter().all(|&i| i < count))
            .collect();
        if triangles.len() != before {
            log::warn!(
                "TriMesh: dropped {} triangle(s) with out-of-range indices",
                before - triangles.len()
            );
        }
        Self {
            positions,
            triangles,
            label: None,
        }
    }

    /// Set a debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Vertex positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle index triples.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Axis-aligned bounds `(min, max)` of the positions, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        let mut min = first;
        let mut max = first;
        for p in &self.positions[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        Some((min, max))
    }

    /// Return a copy with every vertex rotated.
    pub fn rotated(&self, rotation: &Rot3) -> Self {
        Self {
            positions: self.positions.iter().map(|p| rotation * p).collect(),
            triangles: self.triangles.clone(),
            label: self.label.clone(),
        }
    }

    /// Return a copy with every vertex transformed by `pose`.
    pub fn transformed(&self, pose: &Pose) -> Self {
        Self {
            positions: self
                .positions
                .iter()
                .map(|p| pose.transform_point(&(*p).into()).coords)
                .collect(),
            triangles: self.triangles.clone(),
            label: self.label.clone(),
        }
    }
}
