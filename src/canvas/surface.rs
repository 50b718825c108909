use image::{Rgba, RgbaImage};

use crate::geom::Point;

/// Ink color for brush stamps: opaque white, matching the white-on-black
/// convention the downsampler and classifier expect.
const INK: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Background: fully transparent. The downsampler composites this over black,
/// so untouched pixels read as zero intensity.
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// The full-resolution drawing surface.
///
/// Owned by the drawing session controller; the downsampler only ever sees a
/// `snapshot()`, so sampling can never mutate drawing state. Stamping is
/// hard-edged (no anti-aliasing) to keep downsampling reproducible.
pub struct Surface {
    pixels: RgbaImage,
}

impl Surface {
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Surface {
        assert!(width > 0 && height > 0, "surface dimensions must be nonzero");
        Surface {
            pixels: RgbaImage::from_pixel(width, height, BACKGROUND),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Erases all ink.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = BACKGROUND;
        }
    }

    /// Renders one filled disk of ink centered at `center`.
    ///
    /// Pixels are tested at their centers against the disk boundary; there is
    /// no edge smoothing. Centers outside the surface are fine, only the
    /// intersecting region is written.
    pub fn stamp_disk(&mut self, center: Point, radius: f64) {
        if radius <= 0.0 {
            return;
        }
        let w = self.pixels.width() as f64;
        let h = self.pixels.height() as f64;

        let x0 = (center.x - radius).floor().clamp(0.0, w - 1.0) as u32;
        let x1 = (center.x + radius).ceil().clamp(0.0, w - 1.0) as u32;
        let y0 = (center.y - radius).floor().clamp(0.0, h - 1.0) as u32;
        let y1 = (center.y + radius).ceil().clamp(0.0, h - 1.0) as u32;

        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f64 + 0.5 - center.x;
                let dy = y as f64 + 0.5 - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.pixels.put_pixel(x, y, INK);
                }
            }
        }
    }

    /// Read-only copy of the current pixels for downsampling.
    pub fn snapshot(&self) -> RgbaImage {
        self.pixels.clone()
    }

    /// True when no ink has been stamped since the last clear.
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|px| *px == BACKGROUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_blank() {
        assert!(Surface::new(40, 40).is_blank());
    }

    #[test]
    fn stamp_writes_ink_inside_disk_only() {
        let mut s = Surface::new(40, 40);
        s.stamp_disk(Point::new(20.0, 20.0), 5.0);
        let snap = s.snapshot();
        assert_eq!(*snap.get_pixel(20, 20), INK);
        assert_eq!(*snap.get_pixel(0, 0), BACKGROUND);
        // Just outside the radius along the axis.
        assert_eq!(*snap.get_pixel(26, 20), BACKGROUND);
    }

    #[test]
    fn stamp_near_edge_does_not_panic() {
        let mut s = Surface::new(40, 40);
        s.stamp_disk(Point::new(-3.0, -3.0), 5.0);
        s.stamp_disk(Point::new(39.5, 39.5), 5.0);
        s.stamp_disk(Point::new(-100.0, 20.0), 5.0);
        assert_eq!(*s.snapshot().get_pixel(39, 39), INK);
    }

    #[test]
    fn clear_resets_to_blank() {
        let mut s = Surface::new(40, 40);
        s.stamp_disk(Point::new(20.0, 20.0), 8.0);
        assert!(!s.is_blank());
        s.clear();
        assert!(s.is_blank());
    }

    #[test]
    fn snapshot_is_detached_from_the_surface() {
        let mut s = Surface::new(40, 40);
        let snap = s.snapshot();
        s.stamp_disk(Point::new(20.0, 20.0), 8.0);
        assert_eq!(*snap.get_pixel(20, 20), BACKGROUND);
    }
}
