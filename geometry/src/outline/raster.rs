//! Single-channel coverage raster.

/// Binary coverage image, row-major with row 0 at the bottom (+Y up).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    data: Vec<bool>,
}

impl Raster {
    /// Transparent raster of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![false; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Coverage at `(x, y)`; anything outside the raster is transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.data[self.index(x as u32, y as u32)]
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.data[i] = opaque;
        }
    }

    pub fn opaque_count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    pub fn is_blank(&self) -> bool {
        !self.data.iter().any(|&v| v)
    }

    /// Square-kernel dilation (`grow == true`) or erosion of the given radius.
    fn morph(&self, radius: u32, grow: bool) -> Raster {
        let r = radius as i32;
        let (w, h) = (self.width as i32, self.height as i32);

        // Separable: rows then columns.
        let mut rows = Raster::new(self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                let hit = (-r..=r).any(|d| self.get(x + d, y) == grow);
                rows.set(x as u32, y as u32, hit == grow);
            }
        }
        let mut out = Raster::new(self.width, self.height);
        for y in 0..h {
            for x in 0..w {
                let hit = (-r..=r).any(|d| rows.get(x, y + d) == grow);
                out.set(x as u32, y as u32, hit == grow);
            }
        }
        out
    }

    /// Morphological closing: gaps up to `2 * radius` pixels wide fill in.
    ///
    /// Pixels outside the raster count as transparent, so shapes touching
    /// the border may shrink; callers keep a margin of at least `radius`.
    pub fn close(&self, radius: u32) -> Raster {
        if radius == 0 {
            return self.clone();
        }
        self.morph(radius, true).morph(radius, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(r: &mut Raster, x0: u32, x1: u32, y0: u32, y1: u32) {
        for y in y0..y1 {
            for x in x0..x1 {
                r.set(x, y, true);
            }
        }
    }

    #[test]
    fn out_of_bounds_is_transparent() {
        let mut r = Raster::new(2, 2);
        r.set(5, 5, true);
        assert!(r.is_blank());
        assert!(!r.get(-1, 0));
    }

    #[test]
    fn closing_bridges_narrow_gap() {
        let mut r = Raster::new(20, 10);
        fill(&mut r, 3, 9, 3, 7);
        fill(&mut r, 11, 17, 3, 7);
        assert!(!r.get(9, 5));

        let closed = r.close(1);
        assert!(closed.get(9, 5));
        assert!(closed.get(10, 5));
        assert_eq!(closed.opaque_count(), r.opaque_count() + 2 * 4);
    }

    #[test]
    fn closing_keeps_wide_gap() {
        let mut r = Raster::new(24, 10);
        fill(&mut r, 3, 9, 3, 7);
        fill(&mut r, 14, 20, 3, 7);
        let closed = r.close(1);
        assert_eq!(closed, r);
    }
}
