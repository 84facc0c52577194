//! Off-screen silhouette rendering.

use dimshift_core::math::{Pose, Vec2, Vec3, cross2};
use dimshift_core::mesh::TriMesh;
use dimshift_core::profile_scope;

use super::raster::Raster;

/// Orthographic silhouette render of a single mesh.
///
/// `view` maps mesh-local points into view space, where the camera looks
/// down −Z and the raster center sits at the view origin. A view-space
/// point lands on pixel `xy * pixels_per_unit + (width, height) / 2`.
#[derive(Debug, Clone, Copy)]
pub struct SilhouetteRequest<'a> {
    pub mesh: &'a TriMesh,
    pub view: Pose,
    pub pixels_per_unit: f32,
    pub width: u32,
    pub height: u32,
}

impl SilhouetteRequest<'_> {
    /// Pixel-space position of a mesh-local point.
    pub fn to_pixel(&self, point: &Vec3) -> Vec2 {
        let v = self.view.transform_point(&(*point).into());
        Vec2::new(
            v.x * self.pixels_per_unit + self.width as f32 * 0.5,
            v.y * self.pixels_per_unit + self.height as f32 * 0.5,
        )
    }
}

/// Renders mesh silhouettes into binary rasters.
///
/// A pixel is opaque when its center is covered by any triangle, regardless
/// of facing.
pub trait SilhouetteRenderer {
    fn render_silhouette(&mut self, request: &SilhouetteRequest<'_>) -> Raster;
}

/// CPU rasterizer using edge functions at pixel centers.
#[derive(Debug, Default)]
pub struct SoftwareRenderer {
    rendered: u64,
}

impl SoftwareRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of silhouettes rendered so far.
    pub fn rendered(&self) -> u64 {
        self.rendered
    }
}

fn fill_triangle(raster: &mut Raster, a: Vec2, b: Vec2, c: Vec2) {
    let area = cross2(&(b - a), &(c - a));
    if area.abs() <= f32::EPSILON {
        return;
    }
    // Normalize to counter-clockwise so all edge functions are >= 0 inside.
    let (b, c) = if area < 0.0 { (c, b) } else { (b, c) };

    let min = a.inf(&b).inf(&c);
    let max = a.sup(&b).sup(&c);
    let x0 = (min.x.floor().max(0.0)) as u32;
    let y0 = (min.y.floor().max(0.0)) as u32;
    let x1 = (max.x.ceil().min(raster.width() as f32)).max(0.0) as u32;
    let y1 = (max.y.ceil().min(raster.height() as f32)).max(0.0) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if cross2(&(b - a), &(p - a)) >= 0.0
                && cross2(&(c - b), &(p - b)) >= 0.0
                && cross2(&(a - c), &(p - c)) >= 0.0
            {
                raster.set(x, y, true);
            }
        }
    }
}

impl SilhouetteRenderer for SoftwareRenderer {
    fn render_silhouette(&mut self, request: &SilhouetteRequest<'_>) -> Raster {
        profile_scope!("render_silhouette");

        let mut raster = Raster::new(request.width, request.height);
        let projected: Vec<Vec2> = request
            .mesh
            .positions()
            .iter()
            .map(|p| request.to_pixel(p))
            .collect();
        for t in request.mesh.triangles() {
            fill_triangle(
                &mut raster,
                projected[t[0] as usize],
                projected[t[1] as usize],
                projected[t[2] as usize],
            );
        }
        self.rendered += 1;
        raster
    }
}
