use image::{imageops, Rgba, RgbaImage};

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// A downsampled grayscale rendering of the drawing surface: one intensity
/// per target-grid cell, row-major, top-to-bottom then left-to-right.
///
/// `u8` makes the [0, 255] range invariant structural. A vector is produced
/// fresh on every sampling tick and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    width:  u32,
    height: u32,
    values: Vec<u8>,
}

impl FeatureVector {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row-major intensities.
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Intensity at grid cell (x, y).
    pub fn at(&self, x: u32, y: u32) -> u8 {
        self.values[(y * self.width + x) as usize]
    }
}

// ---------------------------------------------------------------------------
// Downsampling
// ---------------------------------------------------------------------------

/// Reduces a full-resolution surface snapshot to a classifier-ready
/// [`FeatureVector`].
///
/// Steps, in order:
/// 1. Allocate a target-sized buffer filled with opaque black ("no ink").
/// 2. Scale-blit the **full** source into the target box with
///    nearest-neighbor sampling. The whole surface is stretched, so aspect
///    distortion is intentional; nearest keeps edges crisp and the result
///    reproducible.
/// 3. Reduce each pixel to the plain average of its three color channels.
///    Alpha is ignored; no gamma correction, no channel weighting.
///
/// Deterministic: byte-identical snapshots produce byte-identical vectors.
///
/// # Panics
/// Panics if either target dimension is zero.
pub fn downsample(snapshot: &RgbaImage, target_width: u32, target_height: u32) -> FeatureVector {
    assert!(
        target_width > 0 && target_height > 0,
        "target grid dimensions must be nonzero"
    );

    let mut target = RgbaImage::from_pixel(target_width, target_height, Rgba([0, 0, 0, 255]));

    let scaled = imageops::resize(
        snapshot,
        target_width,
        target_height,
        imageops::FilterType::Nearest,
    );
    imageops::overlay(&mut target, &scaled, 0, 0);

    let values = target
        .pixels()
        .map(|px| {
            let [r, g, b, _] = px.0;
            ((r as u16 + g as u16 + b as u16) / 3) as u8
        })
        .collect();

    FeatureVector {
        width:  target_width,
        height: target_height,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Surface;
    use crate::geom::Point;

    #[test]
    fn output_length_matches_grid() {
        let surface = Surface::new(280, 280);
        let fv = downsample(&surface.snapshot(), 28, 28);
        assert_eq!(fv.len(), 28 * 28);
        assert_eq!(fv.width(), 28);
        assert_eq!(fv.height(), 28);
    }

    #[test]
    fn blank_surface_maps_to_all_zeros() {
        let surface = Surface::new(280, 280);
        let fv = downsample(&surface.snapshot(), 28, 28);
        assert!(fv.values().iter().all(|&v| v == 0));
    }

    #[test]
    fn deterministic_for_identical_snapshots() {
        let mut surface = Surface::new(280, 280);
        surface.stamp_disk(Point::new(140.0, 140.0), 25.0);
        surface.stamp_disk(Point::new(90.0, 200.0), 10.0);
        let a = downsample(&surface.snapshot(), 28, 28);
        let b = downsample(&surface.snapshot(), 28, 28);
        assert_eq!(a, b);
    }

    #[test]
    fn ink_lands_in_the_matching_grid_cell() {
        let mut surface = Surface::new(280, 280);
        // A disk around (140, 140) covers the center of the 10x-scaled grid.
        surface.stamp_disk(Point::new(140.0, 140.0), 25.0);
        let fv = downsample(&surface.snapshot(), 28, 28);
        assert_eq!(fv.at(14, 14), 255);
        assert_eq!(fv.at(0, 0), 0);
        assert_eq!(fv.at(27, 27), 0);
    }

    #[test]
    fn full_surface_is_stretched_not_cropped() {
        // Non-square source: ink in the far corner must land in the far
        // corner cell of the grid.
        let mut surface = Surface::new(400, 100);
        surface.stamp_disk(Point::new(395.0, 95.0), 6.0);
        let fv = downsample(&surface.snapshot(), 28, 28);
        assert!(fv.at(27, 27) > 0);
    }
}
