//! Marching-squares contour tracing over a binary raster.
//!
//! Cells span four neighbouring samples; the raster is padded by one
//! transparent sample on every side so every region yields closed loops.
//! Edge midpoints are keyed in doubled integer sample coordinates, which
//! lets segments join through exact lookups.
//!
//! Segments keep the opaque side on their left: outer boundaries come out
//! counter-clockwise and holes clockwise. Saddle cells (5 and 10) are split,
//! so diagonal neighbours belong to separate loops.

use std::collections::BTreeMap;

use dimshift_core::math::Vec2;
use dimshift_core::profile_scope;

use super::raster::Raster;

/// Edge midpoint in doubled sample coordinates.
pub type GridKey = (i32, i32);

/// Cell edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Bottom,
    Right,
    Top,
    Left,
}

use Edge::{Bottom as B, Left as L, Right as R, Top as T};

/// Directed segments per cell case.
///
/// Case bits: 1 = bottom-left, 2 = bottom-right, 4 = top-right, 8 = top-left.
const SEGMENTS: [&[(Edge, Edge)]; 16] = [
    &[],
    &[(B, L)],
    &[(R, B)],
    &[(R, L)],
    &[(T, R)],
    &[(B, L), (T, R)],
    &[(T, B)],
    &[(T, L)],
    &[(L, T)],
    &[(B, T)],
    &[(R, B), (L, T)],
    &[(R, T)],
    &[(L, R)],
    &[(B, R)],
    &[(L, B)],
    &[],
];

fn edge_key(edge: Edge, x: i32, y: i32) -> GridKey {
    match edge {
        Edge::Bottom => (2 * x + 1, 2 * y),
        Edge::Right => (2 * x + 2, 2 * y + 1),
        Edge::Top => (2 * x + 1, 2 * y + 2),
        Edge::Left => (2 * x, 2 * y + 1),
    }
}

fn cell_case(raster: &Raster, x: i32, y: i32) -> usize {
    let mut case = 0;
    if raster.get(x, y) {
        case |= 1;
    }
    if raster.get(x + 1, y) {
        case |= 2;
    }
    if raster.get(x + 1, y + 1) {
        case |= 4;
    }
    if raster.get(x, y + 1) {
        case |= 8;
    }
    case
}

/// Collect every directed boundary segment as a `start -> end` map.
pub fn extract_segments(raster: &Raster) -> BTreeMap<GridKey, GridKey> {
    let mut next = BTreeMap::new();
    for y in -1..raster.height() as i32 {
        for x in -1..raster.width() as i32 {
            for &(from, to) in SEGMENTS[cell_case(raster, x, y)] {
                next.insert(edge_key(from, x, y), edge_key(to, x, y));
            }
        }
    }
    next
}

/// Join segments into closed loops of grid keys.
pub fn connect_segments(mut next: BTreeMap<GridKey, GridKey>) -> Vec<Vec<GridKey>> {
    let mut loops = Vec::new();
    while let Some((&start, _)) = next.first_key_value() {
        let mut points = Vec::new();
        let mut current = start;
        while let Some(to) = next.remove(&current) {
            points.push(current);
            current = to;
            if current == start {
                break;
            }
        }
        if current != start {
            log::debug!("contour: open chain of {} points dropped", points.len());
            continue;
        }
        loops.push(points);
    }
    loops
}

/// Trace every boundary of the opaque region in pixel coordinates.
///
/// Pixel `(x, y)` covers `[x, x + 1] × [y, y + 1]`, so boundaries fall on
/// pixel edges and half-pixel diagonals.
pub fn trace_contours(raster: &Raster) -> Vec<Vec<Vec2>> {
    profile_scope!("trace_contours");

    connect_segments(extract_segments(raster))
        .into_iter()
        .map(|keys| {
            keys.into_iter()
                .map(|(kx, ky)| Vec2::new(kx as f32 * 0.5 + 0.5, ky as f32 * 0.5 + 0.5))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dimshift_core::math::signed_area;

    fn raster_from(rows: &[&str]) -> Raster {
        let height = rows.len() as u32;
        let width = rows[0].len() as u32;
        let mut r = Raster::new(width, height);
        for (row, line) in rows.iter().enumerate() {
            let y = height - 1 - row as u32;
            for (x, ch) in line.chars().enumerate() {
                r.set(x as u32, y, ch == '#');
            }
        }
        r
    }

    #[test]
    fn single_pixel_is_ccw_diamond() {
        let loops = trace_contours(&raster_from(&["#"]));
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
        assert!((signed_area(&loops[0]) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ring_has_outer_and_hole() {
        let loops = trace_contours(&raster_from(&["###", "#.#", "###"]));
        assert_eq!(loops.len(), 2);
        let mut areas: Vec<f32> = loops.iter().map(|l| signed_area(l)).collect();
        areas.sort_by(f32::total_cmp);
        assert!(areas[0] < 0.0, "hole winds clockwise");
        assert!(areas[1] > 0.0, "outer winds counter-clockwise");
    }

    #[test]
    fn diagonal_neighbours_stay_separate() {
        let loops = trace_contours(&raster_from(&[".#", "#."]));
        assert_eq!(loops.len(), 2);
    }

    #[test]
    fn blank_raster_has_no_loops() {
        assert!(trace_contours(&Raster::new(4, 4)).is_empty());
    }

    #[test]
    fn block_boundary_lies_on_pixel_edges() {
        let loops = trace_contours(&raster_from(&["....", ".##.", ".##.", "...."]));
        assert_eq!(loops.len(), 1);
        for p in &loops[0] {
            assert!(p.x >= 1.0 - 1e-6 && p.x <= 3.0 + 1e-6);
            assert!(p.y >= 1.0 - 1e-6 && p.y <= 3.0 + 1e-6);
        }
    }
}
