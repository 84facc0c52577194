//! Douglas-Peucker polyline simplification.
//!
//! A point is kept when its distance to the current chord is at least the
//! tolerance. Splits only depend on the input, so raising the tolerance can
//! only remove points: results are nested across tolerances, and a zero
//! tolerance keeps everything except exact duplicates.

use dimshift_core::math::Vec2;

/// Distance from `p` to the segment `a`–`b`.
pub fn point_segment_distance(p: &Vec2, a: &Vec2, b: &Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Mark points of `points[first..=last]` to keep.
fn mark(points: &[Vec2], first: usize, last: usize, tolerance: f32, keep: &mut [bool]) {
    let mut stack = vec![(first, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start], points[end]);
        let mut farthest = start;
        let mut max_dist = -1.0f32;
        for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = point_segment_distance(p, &a, &b);
            if d > max_dist {
                max_dist = d;
                farthest = i;
            }
        }
        if max_dist >= tolerance {
            keep[farthest] = true;
            stack.push((start, farthest));
            stack.push((farthest, end));
        }
    }
}

/// Simplify an open polyline. Endpoints are always kept.
pub fn douglas_peucker(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    let mut deduped = points.to_vec();
    deduped.dedup();
    if deduped.len() < 3 {
        return deduped;
    }
    let last = deduped.len() - 1;
    let mut keep = vec![false; deduped.len()];
    keep[0] = true;
    keep[last] = true;
    mark(&deduped, 0, last, tolerance, &mut keep);
    collect_kept(&deduped, &keep)
}

/// Simplify a closed loop (the last point implicitly joins the first).
///
/// The loop is split at its first point and the point farthest from it,
/// both of which are kept.
pub fn simplify_closed(points: &[Vec2], tolerance: f32) -> Vec<Vec2> {
    let mut ring = points.to_vec();
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return ring;
    }

    let origin = ring[0];
    let split = ring
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, p)| (i, (p - origin).norm_squared()))
        .fold((1, -1.0f32), |best, cur| if cur.1 > best.1 { cur } else { best })
        .0;

    // Close the ring so the second half ends back at the origin.
    ring.push(origin);
    let closing = ring.len() - 1;
    let mut keep = vec![false; ring.len()];
    keep[0] = true;
    keep[split] = true;
    mark(&ring, 0, split, tolerance, &mut keep);
    mark(&ring, split, closing, tolerance, &mut keep);
    keep[closing] = false;

    collect_kept(&ring, &keep)
}

fn collect_kept(points: &[Vec2], keep: &[bool]) -> Vec<Vec2> {
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

/// Simplify several closed loops, dropping any left with fewer than 3 points.
pub fn simplify_loops(loops: &[Vec<Vec2>], tolerance: f32) -> Vec<Vec<Vec2>> {
    loops
        .iter()
        .map(|l| simplify_closed(l, tolerance))
        .filter(|l| l.len() >= 3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_circle(n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                let r = 10.0 + if i % 3 == 0 { 0.4 } else { -0.2 };
                Vec2::new(a.cos() * r, a.sin() * r)
            })
            .collect()
    }

    #[test]
    fn straight_line_collapses() {
        let line: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32, 0.0)).collect();
        assert_eq!(douglas_peucker(&line, 0.1).len(), 2);
    }

    #[test]
    fn zero_tolerance_keeps_all_but_duplicates() {
        let mut contour = noisy_circle(40);
        let original = contour.len();
        contour.insert(5, contour[5]);
        contour.push(contour[0]);
        assert_eq!(simplify_closed(&contour, 0.0).len(), original);
    }

    #[test]
    fn monotone_in_tolerance() {
        let contour = noisy_circle(120);
        let mut previous = contour.len();
        for tol in [0.0f32, 0.1, 0.3, 0.5, 1.0, 2.0, 5.0, 20.0] {
            let n = simplify_closed(&contour, tol).len();
            assert!(n <= previous, "tolerance {tol}: {n} > {previous}");
            previous = n;
        }
    }

    #[test]
    fn square_outline_reduces_to_corners() {
        let mut square = Vec::new();
        for i in 0..4 {
            square.push(Vec2::new(i as f32, 0.0));
        }
        for i in 0..4 {
            square.push(Vec2::new(4.0, i as f32));
        }
        for i in 0..4 {
            square.push(Vec2::new(4.0 - i as f32, 4.0));
        }
        for i in 0..4 {
            square.push(Vec2::new(0.0, 4.0 - i as f32));
        }
        let simplified = simplify_closed(&square, 0.5);
        assert_eq!(simplified.len(), 4);
    }

    #[test]
    fn degenerate_loops_are_dropped() {
        let loops = vec![
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0)],
            vec![Vec2::zeros(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)],
        ];
        assert_eq!(simplify_loops(&loops, 0.5).len(), 1);
    }
}
