/// Alpha above which a pixel counts as solid
pub const ALPHA_THRESHOLD: u8 = 127;

/// Per-pixel opacity bitmap of a sprite, used for exact collision tests
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Build a mask from tightly packed RGBA8 pixels.
    ///
    /// Panics if `rgba` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        assert_eq!(
            rgba.len(),
            (width * height * 4) as usize,
            "RGBA buffer does not match a {width}x{height} sprite"
        );
        let bits = rgba
            .chunks_exact(4)
            .map(|px| px[3] > ALPHA_THRESHOLD)
            .collect();
        Self { width, height, bits }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Mirror the mask vertically (for the upside-down top pipe)
    pub fn flipped_vertically(&self) -> Self {
        let w = self.width as usize;
        let bits = self
            .bits
            .chunks_exact(w)
            .rev()
            .flatten()
            .copied()
            .collect();
        Self {
            width: self.width,
            height: self.height,
            bits,
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First point where both masks are solid, with `other` placed at
    /// `offset` relative to this mask's top-left corner.
    /// The point is returned in this mask's coordinates.
    pub fn overlap(&self, other: &CollisionMask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (self.width as i32).min(dx + other.width as i32);
        let y_end = (self.height as i32).min(dy + other.height as i32);

        if x_start >= x_end || y_start >= y_end {
            return None;
        }

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32) -> CollisionMask {
        CollisionMask::from_rgba(width, height, &vec![255; (width * height * 4) as usize])
    }

    /// A 4x4 mask with only the top-left 2x2 block solid
    fn corner() -> CollisionMask {
        let mut rgba = vec![0u8; 4 * 4 * 4];
        for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            rgba[(y * 4 + x) * 4 + 3] = 255;
        }
        CollisionMask::from_rgba(4, 4, &rgba)
    }

    #[test]
    fn threshold_decides_opacity() {
        let rgba = [0, 0, 0, 127, 0, 0, 0, 128];
        let mask = CollisionMask::from_rgba(2, 1, &rgba);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
    }

    #[test]
    #[should_panic(expected = "does not match")]
    fn short_buffer_is_rejected() {
        CollisionMask::from_rgba(2, 2, &[255; 12]);
    }

    #[test]
    fn overlapping_solids_collide() {
        let a = solid(10, 10);
        let b = solid(5, 5);
        assert_eq!(a.overlap(&b, (8, 8)), Some((8, 8)));
        assert_eq!(a.overlap(&b, (-4, -4)), Some((0, 0)));
    }

    #[test]
    fn disjoint_boxes_do_not_collide() {
        let a = solid(10, 10);
        let b = solid(5, 5);
        assert_eq!(a.overlap(&b, (10, 0)), None);
        assert_eq!(a.overlap(&b, (0, -5)), None);
    }

    #[test]
    fn transparent_pixels_inside_the_box_do_not_collide() {
        // Bounding boxes overlap, but only transparent pixels of `corner` are covered
        let a = corner();
        let b = solid(2, 2);
        assert_eq!(a.overlap(&b, (2, 2)), None);
        assert_eq!(a.overlap(&b, (1, 1)), Some((1, 1)));
    }

    #[test]
    fn vertical_flip_moves_rows() {
        let flipped = corner().flipped_vertically();
        assert!(flipped.get(0, 3));
        assert!(!flipped.get(0, 0));
        assert_eq!(flipped.count(), 4);
    }
}
