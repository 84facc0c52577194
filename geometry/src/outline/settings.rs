use serde::{Deserialize, Serialize};

/// Smallest raster the extractor will render.
pub const MIN_RESOLUTION: u32 = 8;

/// Parameters of mesh outline extraction.
///
/// Attached to a mesh-shape converter and read-only during conversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineSettings {
    /// Raster size in pixels along the longer planar axis of the mesh.
    /// Default: 128
    pub resolution: u32,

    /// Douglas-Peucker tolerance in pixels. Zero keeps every traced point.
    /// Default: 1.0
    pub tolerance: f32,

    /// Gaps up to this many pixels wide are closed before tracing, so
    /// nearby islands merge into one loop. Odd widths round up to the next
    /// even width.
    /// Default: 1
    pub min_gap: u32,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            resolution: 128,
            tolerance: 1.0,
            min_gap: 1,
        }
    }
}

impl OutlineSettings {
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_gap(mut self, min_gap: u32) -> Self {
        self.min_gap = min_gap;
        self
    }

    /// Copy with out-of-range values clamped.
    pub fn sanitized(self) -> Self {
        let resolution = self.resolution.max(MIN_RESOLUTION);
        Self {
            resolution,
            tolerance: if self.tolerance.is_finite() {
                self.tolerance.max(0.0)
            } else {
                0.0
            },
            min_gap: self.min_gap.min(resolution / 4),
        }
    }

    /// Radius of the morphological closing that bridges `min_gap`.
    pub fn closing_radius(&self) -> u32 {
        self.min_gap.div_ceil(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Raster;
    use rstest::rstest;

    #[test]
    fn sanitized_clamps() {
        let s = OutlineSettings::default()
            .with_resolution(2)
            .with_tolerance(-3.0)
            .with_min_gap(100)
            .sanitized();
        assert_eq!(s.resolution, MIN_RESOLUTION);
        assert_eq!(s.tolerance, 0.0);
        assert_eq!(s.min_gap, MIN_RESOLUTION / 4);
    }

    /// Two 4x4 blocks `gap` pixels apart.
    fn blocks(gap: u32) -> Raster {
        let mut r = Raster::new(16 + gap, 12);
        for y in 4..8 {
            for x in (4..8).chain(8 + gap..12 + gap) {
                r.set(x, y, true);
            }
        }
        r
    }

    #[rstest]
    #[case::exact_width(2, 2, true)]
    #[case::odd_width_rounds_up(1, 2, true)]
    #[case::wider_gap_stays(2, 3, false)]
    #[case::disabled(0, 1, false)]
    fn min_gap_is_bridged_width(#[case] min_gap: u32, #[case] gap: u32, #[case] bridged: bool) {
        let settings = OutlineSettings::default().with_min_gap(min_gap);
        let closed = blocks(gap).close(settings.closing_radius());
        assert_eq!(closed.get(8, 5), bridged);
    }
}
