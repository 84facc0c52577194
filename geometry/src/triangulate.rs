//! Triangulation of polygons with holes.
//!
//! Paths are classified by even-odd containment: a path inside an even
//! number of others is an outer boundary, otherwise a hole of the
//! innermost boundary containing it. Each outer boundary and its holes go
//! through `earcutr` as one group.

use dimshift_core::math::{Vec2, cross2, signed_area};
use dimshift_core::profile_function;
use earcutr::earcut;

/// Areas at or below this count as degenerate.
const AREA_EPS: f32 = 1.0e-9;

/// Indexed triangles over a shared vertex list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    pub vertices: Vec<Vec2>,
    /// Counter-clockwise index triples.
    pub triangles: Vec<[u32; 3]>,
}

impl Triangulation {
    /// Total triangle area.
    pub fn area(&self) -> f32 {
        self.triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| self.vertices[i as usize]);
                cross2(&(b - a), &(c - a)) * 0.5
            })
            .sum()
    }

    /// Append one earcut group: `hole_starts` index the first vertex of each
    /// hole inside `points`.
    fn push_group(&mut self, points: &[Vec2], hole_starts: &[usize]) {
        let coords: Vec<f64> = points
            .iter()
            .flat_map(|p| [p.x as f64, p.y as f64])
            .collect();
        let indices = match earcut(&coords, hole_starts, 2) {
            Ok(indices) => indices,
            Err(err) => {
                log::warn!("triangulate: earcut failed on {} points: {err:?}", points.len());
                return;
            }
        };

        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(points);
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]];
            let turn = cross2(&(points[b] - points[a]), &(points[c] - points[a]));
            if turn.abs() <= AREA_EPS {
                continue;
            }
            let tri = if turn > 0.0 { [a, b, c] } else { [a, c, b] };
            self.triangles.push(tri.map(|i| base + i as u32));
        }
    }
}

/// Even-odd point-in-polygon test.
pub fn point_in_polygon(point: &Vec2, polygon: &[Vec2]) -> bool {
    let mut inside = false;
    let n = polygon.len();
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let (a, b) = (polygon[i], polygon[j]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

struct Ring {
    points: Vec<Vec2>,
    depth: usize,
    area: f32,
}

impl Ring {
    fn is_hole(&self) -> bool {
        self.depth % 2 == 1
    }
}

/// Drop repeated and closing points. `None` when nothing with area is left.
fn clean_ring(path: &[Vec2]) -> Option<Ring> {
    let mut points = path.to_vec();
    points.dedup();
    while points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    let area = signed_area(&points);
    (points.len() >= 3 && area.abs() > AREA_EPS).then_some(Ring {
        points,
        depth: 0,
        area,
    })
}

/// Triangulate closed paths (outer boundaries and holes in any winding).
pub fn triangulate_paths(paths: &[Vec<Vec2>]) -> Triangulation {
    profile_function!();

    let mut rings: Vec<Ring> = paths.iter().filter_map(|p| clean_ring(p)).collect();
    let depths: Vec<usize> = (0..rings.len())
        .map(|i| {
            let first = rings[i].points[0];
            (0..rings.len())
                .filter(|&j| j != i && point_in_polygon(&first, &rings[j].points))
                .count()
        })
        .collect();
    for (ring, depth) in rings.iter_mut().zip(depths) {
        ring.depth = depth;
    }

    let mut out = Triangulation::default();
    for (oi, outer) in rings.iter().enumerate().filter(|(_, r)| !r.is_hole()) {
        // Holes of this boundary: one level deeper and not inside a smaller
        // boundary at the same level.
        let holes = rings.iter().enumerate().filter(|(hi, hole)| {
            let first = hole.points[0];
            hole.depth == outer.depth + 1
                && point_in_polygon(&first, &outer.points)
                && !rings.iter().enumerate().any(|(k, other)| {
                    k != oi
                        && k != *hi
                        && other.depth == outer.depth
                        && other.area.abs() < outer.area.abs()
                        && point_in_polygon(&first, &other.points)
                })
        });

        let mut points = outer.points.clone();
        let mut hole_starts = Vec::new();
        for (_, hole) in holes {
            hole_starts.push(points.len());
            points.extend_from_slice(&hole.points);
        }
        out.push_group(&points, &hole_starts);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn square(center: Vec2, half: f32) -> Vec<Vec2> {
        vec![
            center + Vec2::new(-half, -half),
            center + Vec2::new(half, -half),
            center + Vec2::new(half, half),
            center + Vec2::new(-half, half),
        ]
    }

    fn all_counter_clockwise(t: &Triangulation) -> bool {
        t.triangles.iter().all(|tri| {
            let [a, b, c] = tri.map(|i| t.vertices[i as usize]);
            cross2(&(b - a), &(c - a)) > 0.0
        })
    }

    #[rstest]
    #[case::counter_clockwise(false)]
    #[case::clockwise(true)]
    fn square_in_either_winding(#[case] reverse: bool) {
        let mut path = square(Vec2::zeros(), 1.0);
        if reverse {
            path.reverse();
        }
        let t = triangulate_paths(&[path]);
        assert_eq!(t.triangles.len(), 2);
        assert!((t.area() - 4.0).abs() < 1e-5);
        assert!(all_counter_clockwise(&t));
    }

    #[test]
    fn concave_l_shape() {
        let l = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let t = triangulate_paths(&[l]);
        assert_eq!(t.triangles.len(), 4);
        assert!((t.area() - 3.0).abs() < 1e-5);
    }

    #[test]
    fn square_with_hole() {
        let hole = square(Vec2::zeros(), 1.0);
        let t = triangulate_paths(&[square(Vec2::zeros(), 2.0), hole.clone()]);
        assert!((t.area() - 12.0).abs() < 1e-4, "area {}", t.area());
        assert!(all_counter_clockwise(&t));
        for tri in &t.triangles {
            let [a, b, c] = tri.map(|i| t.vertices[i as usize]);
            assert!(!point_in_polygon(&((a + b + c) / 3.0), &hole));
        }
    }

    #[test]
    fn island_inside_hole_is_kept() {
        let t = triangulate_paths(&[
            square(Vec2::zeros(), 3.0),
            square(Vec2::zeros(), 2.0),
            square(Vec2::zeros(), 1.0),
        ]);
        assert!((t.area() - (36.0 - 16.0 + 4.0)).abs() < 1e-3);
    }

    #[test]
    fn separate_boundaries_keep_their_own_holes() {
        let t = triangulate_paths(&[
            square(Vec2::new(-5.0, 0.0), 2.0),
            square(Vec2::new(-5.0, 0.0), 1.0),
            square(Vec2::new(5.0, 0.0), 2.0),
        ]);
        assert!((t.area() - (12.0 + 16.0)).abs() < 1e-3);
    }

    #[test]
    fn degenerate_paths_are_ignored() {
        let t = triangulate_paths(&[
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0)],
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)],
        ]);
        assert!(t.triangles.is_empty());
        assert!(t.vertices.is_empty());
    }
}
