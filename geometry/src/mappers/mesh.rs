//! Mesh ↔ polygon, through outline extraction and flat-mesh generation.

use std::sync::Arc;

use dimshift_core::math::Vec2;

use crate::extrude::{PolygonMeshOptions, polygon_to_mesh};
use crate::mapper::{MapEnv, MapOutcome, ShapeMapper, SkipReason};
use crate::outline::{OutlineSettings, extract_outline, planar_depth};
use crate::shapes::{MeshVolume, Polygon, ShapeKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct MeshMapper {
    pub outline: OutlineSettings,
    pub mesh_options: PolygonMeshOptions,
}

impl MeshMapper {
    pub fn new(outline: OutlineSettings) -> Self {
        Self {
            outline,
            mesh_options: PolygonMeshOptions::default(),
        }
    }

    pub fn with_mesh_options(mut self, options: PolygonMeshOptions) -> Self {
        self.mesh_options = options;
        self
    }
}

impl ShapeMapper for MeshMapper {
    type Volume = MeshVolume;
    type Planar = Polygon;

    fn kind(&self) -> ShapeKind {
        ShapeKind::Mesh
    }

    fn to_planar(&self, src: &MeshVolume, dst: &mut Polygon, env: &mut MapEnv<'_>) -> MapOutcome {
        let Some(mesh) = src.mesh.as_deref() else {
            return MapOutcome::skip(self.kind(), "to 2D", SkipReason::MissingMesh);
        };

        let to_planar = env.frame.volume_to_planar_pose();
        let outline = extract_outline(mesh, &to_planar, &self.outline, &mut *env.renderer);
        if outline.is_empty() {
            return MapOutcome::skip(self.kind(), "to 2D", SkipReason::DegenerateBounds);
        }

        log::debug!(
            "mesh to 2D: {} loop(s) from a {}x{} raster",
            outline.loops.len(),
            outline.raster_size.0,
            outline.raster_size.1
        );
        *dst = Polygon {
            offset: Vec2::zeros(),
            paths: outline.loops,
        };
        MapOutcome::Converted
    }

    fn to_volume(&self, src: &Polygon, dst: &mut MeshVolume, env: &mut MapEnv<'_>) -> MapOutcome {
        if !self.mesh_options.generate {
            log::debug!("mesh to 3D: generation disabled, keeping previous mesh");
            return MapOutcome::Skipped(SkipReason::GenerationDisabled);
        }
        if src.is_empty() {
            return MapOutcome::skip(self.kind(), "to 3D", SkipReason::EmptyPolygon);
        }

        let to_planar = env.frame.volume_to_planar_pose();
        let depth = dst
            .mesh
            .as_deref()
            .and_then(|m| planar_depth(m, &to_planar))
            .unwrap_or(0.0);

        let Some(mesh) = polygon_to_mesh(src, &env.frame, depth, self.mesh_options.double_sided)
        else {
            return MapOutcome::skip(self.kind(), "to 3D", SkipReason::EmptyPolygon);
        };

        let previous = dst.mesh.replace(Arc::new(mesh));
        if let Some(previous) = previous
            && !self.mesh_options.release_previous
        {
            env.replaced_meshes.push(previous);
        }
        MapOutcome::Converted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::PairFrame;
    use crate::outline::SoftwareRenderer;
    use dimshift_core::math::Vec3;
    use dimshift_core::mesh::generators::{generate_box, generate_quad};

    #[test]
    fn box_mesh_round_trip() {
        let mut renderer = SoftwareRenderer::new();
        let mut env = MapEnv::new(PairFrame::identity(), &mut renderer);
        let mapper = MeshMapper::new(OutlineSettings::default().with_resolution(64));

        let src = MeshVolume::new(generate_box(Vec3::new(1.0, 0.5, 0.25)));
        let mut polygon = Polygon::default();
        assert!(mapper.to_planar(&src, &mut polygon, &mut env).is_converted());
        assert_eq!(polygon.path_count(), 1);

        let mut back = src.clone();
        assert!(mapper.to_volume(&polygon, &mut back, &mut env).is_converted());
        let mesh = back.mesh.as_deref().unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert!((max.x - min.x - 2.0).abs() < 0.1);
        assert!((max.y - min.y - 1.0).abs() < 0.1);
        assert!((max.z - min.z).abs() < 1e-5, "flat mesh");
        assert!(env.replaced_meshes.is_empty());
    }

    #[test]
    fn kept_mesh_is_handed_back() {
        let mut renderer = SoftwareRenderer::new();
        let mut env = MapEnv::new(PairFrame::identity(), &mut renderer);
        let mapper = MeshMapper::default()
            .with_mesh_options(PolygonMeshOptions::default().with_release_previous(false));
        let original = Arc::new(generate_quad(1.0, 1.0));
        let mut dst = MeshVolume {
            mesh: Some(original.clone()),
        };
        let polygon = Polygon::from_points(
            Vec2::zeros(),
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        );
        assert!(mapper.to_volume(&polygon, &mut dst, &mut env).is_converted());
        assert_eq!(env.replaced_meshes.len(), 1);
        assert!(Arc::ptr_eq(&env.replaced_meshes[0], &original));
    }

    #[test]
    fn generation_disabled_keeps_old_mesh() {
        let mut renderer = SoftwareRenderer::new();
        let mut env = MapEnv::new(PairFrame::identity(), &mut renderer);
        let mapper = MeshMapper::default()
            .with_mesh_options(PolygonMeshOptions::default().with_generate(false));
        let original = MeshVolume::new(generate_quad(1.0, 1.0));
        let mut dst = original.clone();
        let outcome = mapper.to_volume(&Polygon::default(), &mut dst, &mut env);
        assert_eq!(outcome, MapOutcome::Skipped(SkipReason::GenerationDisabled));
        assert_eq!(dst, original);
    }

    #[test]
    fn missing_mesh_is_skipped() {
        let mut renderer = SoftwareRenderer::new();
        let mut env = MapEnv::new(PairFrame::identity(), &mut renderer);
        let mut dst = Polygon::default();
        let outcome = MeshMapper::default().to_planar(&MeshVolume::default(), &mut dst, &mut env);
        assert_eq!(outcome, MapOutcome::Skipped(SkipReason::MissingMesh));
    }
}
