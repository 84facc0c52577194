//! Box ↔ polygon.
//!
//! A box projects to the zonotope spanned by its three half axes. When one
//! axis is parallel to the conversion axis the silhouette is a rectangle;
//! otherwise it is a hexagon. Of the four candidate corner pairs
//! `±(g0 ± g1 ± g2)`, the hidden one flips the angularly middle generator,
//! and the remaining six are emitted counter-clockwise with
//! `p[i + 3] == -p[i]`.

use dimshift_core::math::{GEOM_EPS, Vec2, Vec3, cross2};

use crate::frame::PairFrame;
use crate::mapper::{MapEnv, MapOutcome, ShapeMapper, SkipReason};
use crate::shapes::{Cuboid, Polygon, ShapeKind};

/// Projected unit axes shorter than this are treated as facing the viewer.
const MIN_PROJECTED_UNIT: f32 = 1.0e-3;

/// Sine tolerance for "edge is parallel to a projected axis".
const PARALLEL_SIN: f32 = 1.0e-3;

/// Relative tolerance for point symmetry.
const SYMMETRY_TOLERANCE: f32 = 1.0e-3;

/// Box unit axes expressed in the planar frame and projected to 2D.
pub fn projected_unit_axes(frame: &PairFrame) -> [Vec2; 3] {
    let rotation = frame.relative_rotation();
    [
        (rotation * Vec3::x()).xy(),
        (rotation * Vec3::y()).xy(),
        (rotation * Vec3::z()).xy(),
    ]
}

/// Box half axes projected to 2D.
pub fn projected_half_axes(cuboid: &Cuboid, frame: &PairFrame) -> [Vec2; 3] {
    let units = projected_unit_axes(frame);
    [
        units[0] * cuboid.size.x * 0.5,
        units[1] * cuboid.size.y * 0.5,
        units[2] * cuboid.size.z * 0.5,
    ]
}

/// Flip a generator into the upper half plane so angles fall in `[0, π)`.
fn canonical(g: Vec2) -> Vec2 {
    if g.y < 0.0 || (g.y == 0.0 && g.x < 0.0) {
        -g
    } else {
        g
    }
}

/// Silhouette of a box in the planar frame, or `None` when it collapses to
/// a segment or a point.
pub fn box_to_polygon(cuboid: &Cuboid, frame: &PairFrame) -> Option<Polygon> {
    let half = projected_half_axes(cuboid, frame);
    let threshold = GEOM_EPS * cuboid.size.abs().max().max(1.0);

    let mut generators: Vec<Vec2> = half
        .iter()
        .filter(|g| g.norm() > threshold)
        .map(|g| canonical(*g))
        .collect();
    generators.sort_by(|a, b| a.y.atan2(a.x).total_cmp(&b.y.atan2(b.x)));

    let points = match generators.as_slice() {
        [g0, g1, g2] => {
            let a = g0 + g1 + g2;
            let b = -g0 + g1 + g2;
            let c = -g0 - g1 + g2;
            vec![a, b, c, -a, -b, -c]
        }
        [g0, g1] => {
            let a = g0 + g1;
            let b = -g0 + g1;
            vec![a, b, -a, -b]
        }
        _ => return None,
    };

    Some(Polygon::from_points(frame.project(&cuboid.center), points))
}

fn centroid(points: &[Vec2]) -> Vec2 {
    let sum: Vec2 = points.iter().sum();
    sum / points.len() as f32
}

/// Match each of the first `n / 2` edges to a distinct projected axis.
///
/// Returns `(axis index, edge)` pairs, or `None` when an edge has no
/// parallel axis left.
fn match_edges(points: &[Vec2], units: &[Vec2; 3], max_sin: f32) -> Option<Vec<(usize, Vec2)>> {
    let n = points.len();
    let mut used = [false; 3];
    let mut matches = Vec::with_capacity(n / 2);

    for k in 0..n / 2 {
        let edge = points[(k + 1) % n] - points[k];
        let edge_len = edge.norm();
        if edge_len <= GEOM_EPS {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (i, unit) in units.iter().enumerate() {
            let unit_len = unit.norm();
            if used[i] || unit_len < MIN_PROJECTED_UNIT {
                continue;
            }
            let sin = (cross2(&edge, unit) / (edge_len * unit_len)).abs();
            if best.is_none_or(|(_, s)| sin < s) {
                best = Some((i, sin));
            }
        }

        match best {
            Some((i, sin)) if sin <= max_sin => {
                used[i] = true;
                matches.push((i, edge));
            }
            _ => return None,
        }
    }
    Some(matches)
}

/// Whether `polygon` is a plausible silhouette of a box with the frame's
/// relative rotation.
///
/// Requires a single path of 4 or 6 points that is point-symmetric about its
/// centroid and whose edges run parallel to distinct projected box axes.
pub fn is_box_shape(polygon: &Polygon, frame: &PairFrame) -> bool {
    let [points] = polygon.paths.as_slice() else {
        return false;
    };
    let n = points.len();
    if n != 4 && n != 6 {
        return false;
    }

    let units = projected_unit_axes(frame);
    let visible = units
        .iter()
        .filter(|u| u.norm() >= MIN_PROJECTED_UNIT)
        .count();
    if n == 6 && visible < 3 {
        return false;
    }

    let c = centroid(points);
    let scale = points.iter().map(|p| (p - c).norm()).fold(0.0, f32::max);
    if scale <= GEOM_EPS {
        return false;
    }

    let half = n / 2;
    let symmetric = (0..half).all(|i| {
        let a = points[i] - c;
        let b = points[i + half] - c;
        (a + b).norm() <= SYMMETRY_TOLERANCE * scale
    });

    symmetric && match_edges(points, &units, PARALLEL_SIN).is_some()
}

/// Rebuild box sizes from a silhouette polygon.
///
/// Each matched edge gives `size_i = sqrt(|edge|² / |u_i|²)` where `u_i` is
/// the projected unit axis. Axes without a matching edge (the one facing the
/// viewer) and the depth of the center come from `previous`.
pub fn polygon_to_box(polygon: &Polygon, previous: &Cuboid, frame: &PairFrame) -> Option<Cuboid> {
    let points = polygon.paths.first()?;
    if points.len() != 4 && points.len() != 6 {
        return None;
    }

    let units = projected_unit_axes(frame);
    let matches = match_edges(points, &units, 1.0)?;

    let mut size = previous.size;
    for (axis, edge) in matches {
        size[axis] = (edge.norm_squared() / units[axis].norm_squared()).sqrt();
    }

    Some(Cuboid {
        center: frame.lift(&(polygon.offset + centroid(points)), &previous.center),
        size,
    })
}

/// Box mapper. With `safe` set, polygons are checked with
/// [`is_box_shape`] before being turned back into boxes.
#[derive(Debug, Clone, Copy)]
pub struct CuboidMapper {
    pub safe: bool,
}

impl Default for CuboidMapper {
    fn default() -> Self {
        Self { safe: true }
    }
}

impl ShapeMapper for CuboidMapper {
    type Volume = Cuboid;
    type Planar = Polygon;

    fn kind(&self) -> ShapeKind {
        ShapeKind::Box
    }

    fn to_planar(&self, src: &Cuboid, dst: &mut Polygon, env: &mut MapEnv<'_>) -> MapOutcome {
        match box_to_polygon(src, &env.frame) {
            Some(polygon) => {
                *dst = polygon;
                MapOutcome::Converted
            }
            None => MapOutcome::skip(self.kind(), "to 2D", SkipReason::DegenerateBounds),
        }
    }

    fn to_volume(&self, src: &Polygon, dst: &mut Cuboid, env: &mut MapEnv<'_>) -> MapOutcome {
        if self.safe && !is_box_shape(src, &env.frame) {
            return MapOutcome::skip(self.kind(), "to 3D", SkipReason::NotABox);
        }
        match polygon_to_box(src, dst, &env.frame) {
            Some(cuboid) => {
                *dst = cuboid;
                MapOutcome::Converted
            }
            None => MapOutcome::skip(self.kind(), "to 3D", SkipReason::NotABox),
        }
    }
}
