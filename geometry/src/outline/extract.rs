//! Mesh → polygon outline extraction.

use dimshift_core::math::{GEOM_EPS, Pose, Vec2, Vec3};
use dimshift_core::mesh::TriMesh;
use dimshift_core::{profile_function, profile_scope};

use super::contour::trace_contours;
use super::render::{SilhouetteRenderer, SilhouetteRequest};
use super::settings::OutlineSettings;
use crate::simplify::simplify_loops;

/// Transparent border around the silhouette, beyond the closing radius.
const BASE_MARGIN: u32 = 2;

/// Closed loops approximating a mesh silhouette, in the planar frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    /// Outer loops wind counter-clockwise, holes clockwise.
    pub loops: Vec<Vec<Vec2>>,
    /// Raster size used, `(0, 0)` when nothing was rendered.
    pub raster_size: (u32, u32),
    /// Loops discarded for having fewer than 3 points after simplification.
    pub dropped_loops: usize,
}

impl Outline {
    pub fn is_empty(&self) -> bool {
        self.loops.is_empty()
    }
}

/// Extract the silhouette outline of `mesh` seen along the planar frame's Z
/// axis.
///
/// `to_planar` maps mesh-local points into the planar frame. Loops come back
/// in planar-frame units, so the resulting polygon needs no extra offset.
/// A mesh with zero planar extent yields an empty outline.
pub fn extract_outline(
    mesh: &TriMesh,
    to_planar: &Pose,
    settings: &OutlineSettings,
    renderer: &mut dyn SilhouetteRenderer,
) -> Outline {
    profile_function!();

    let settings = settings.sanitized();
    let Some((min, max)) = mesh.transformed(to_planar).bounds() else {
        log::warn!("outline: mesh has no vertices");
        return Outline::default();
    };
    let extent = (max - min).xy();
    if extent.x <= GEOM_EPS || extent.y <= GEOM_EPS {
        log::warn!(
            "outline: zero planar extent ({:.4} x {:.4}), producing empty shape",
            extent.x,
            extent.y
        );
        return Outline::default();
    }

    let center = (min + max) * 0.5;
    let half = extent * 0.5;
    let pixels_per_unit = (settings.resolution as f32 * 0.5) / half.x.max(half.y);
    let margin = settings.min_gap + BASE_MARGIN;
    let width = (extent.x * pixels_per_unit).ceil() as u32 + 2 * margin;
    let height = (extent.y * pixels_per_unit).ceil() as u32 + 2 * margin;

    let view = Pose::translation(-center.x, -center.y, -center.z) * to_planar;
    let request = SilhouetteRequest {
        mesh,
        view,
        pixels_per_unit,
        width,
        height,
    };

    let mut raster = renderer.render_silhouette(&request);
    if settings.min_gap > 0 {
        profile_scope!("close_gaps");
        raster = raster.close(settings.closing_radius());
    }

    let traced = trace_contours(&raster);
    let simplified = simplify_loops(&traced, settings.tolerance);
    let dropped_loops = traced.len() - simplified.len();
    if dropped_loops > 0 {
        log::debug!("outline: dropped {dropped_loops} degenerate loop(s)");
    }

    let origin = Vec2::new(width as f32 * 0.5, height as f32 * 0.5);
    let loops = simplified
        .into_iter()
        .map(|l| {
            l.into_iter()
                .map(|p| (p - origin) / pixels_per_unit + center.xy())
                .collect()
        })
        .collect();

    Outline {
        loops,
        raster_size: (width, height),
        dropped_loops,
    }
}

/// Planar bounds `(min, max)` of a set of loops.
pub fn loop_bounds(loops: &[Vec<Vec2>]) -> Option<(Vec2, Vec2)> {
    let mut points = loops.iter().flatten();
    let first = *points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| (lo.inf(p), hi.sup(p))))
}

/// Planar-frame depth of a mesh's bounding-box center.
pub fn planar_depth(mesh: &TriMesh, to_planar: &Pose) -> Option<f32> {
    let (min, max) = mesh.transformed(to_planar).bounds()?;
    let center: Vec3 = (min + max) * 0.5;
    Some(center.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::SoftwareRenderer;
    use dimshift_core::math::{pose, rot_x, signed_area};
    use dimshift_core::mesh::generators::{generate_box, generate_quad, generate_sphere};

    #[test]
    fn box_outline_matches_face() {
        let mesh = generate_box(Vec3::new(1.0, 0.5, 2.0));
        let to_planar = Pose::translation(3.0, -1.0, 0.5);
        let settings = OutlineSettings::default().with_resolution(64).with_tolerance(0.5);
        let outline = extract_outline(&mesh, &to_planar, &settings, &mut SoftwareRenderer::new());

        assert_eq!(outline.loops.len(), 1);
        let area = signed_area(&outline.loops[0]);
        assert!((area - 2.0).abs() < 0.1, "area {area}");

        let (lo, hi) = loop_bounds(&outline.loops).unwrap();
        let px = 1.0 / 32.0;
        assert!((lo - Vec2::new(2.0, -1.5)).norm() < 2.0 * px);
        assert!((hi - Vec2::new(4.0, -0.5)).norm() < 2.0 * px);
    }

    #[test]
    fn sphere_outline_is_roughly_circular() {
        let mesh = generate_sphere(1.0, 48, 24);
        let settings = OutlineSettings::default().with_resolution(128);
        let outline = extract_outline(&mesh, &Pose::identity(), &settings, &mut SoftwareRenderer::new());
        assert_eq!(outline.loops.len(), 1);
        for p in &outline.loops[0] {
            assert!((p.norm() - 1.0).abs() < 0.05, "point {p:?}");
        }
    }

    #[test]
    fn edge_on_quad_is_empty() {
        let mesh = generate_quad(1.0, 1.0);
        let to_planar = pose(Vec3::zeros(), rot_x(std::f32::consts::FRAC_PI_2));
        let mut renderer = SoftwareRenderer::new();
        let outline = extract_outline(&mesh, &to_planar, &OutlineSettings::default(), &mut renderer);
        assert!(outline.is_empty());
        assert_eq!(renderer.rendered(), 0);
    }

    #[test]
    fn gap_closing_merges_islands() {
        // Two boxes one pixel apart at this resolution.
        let a = generate_box(Vec3::new(1.0, 1.0, 1.0)).transformed(&Pose::translation(-1.0, 0.0, 0.0));
        let b = generate_box(Vec3::new(0.98, 1.0, 1.0)).transformed(&Pose::translation(1.02, 0.0, 0.0));
        let mut positions = a.positions().to_vec();
        let offset = positions.len() as u32;
        positions.extend_from_slice(b.positions());
        let mut triangles = a.triangles().to_vec();
        triangles.extend(b.triangles().iter().map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]));
        let mesh = TriMesh::new(positions, triangles);

        let open = OutlineSettings::default().with_resolution(100).with_min_gap(0);
        let closed = open.with_min_gap(2);
        let mut renderer = SoftwareRenderer::new();
        assert_eq!(extract_outline(&mesh, &Pose::identity(), &open, &mut renderer).loops.len(), 2);
        assert_eq!(extract_outline(&mesh, &Pose::identity(), &closed, &mut renderer).loops.len(), 1);
    }
}
