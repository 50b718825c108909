use std::time::Duration;

use crate::error::PadError;

/// Tunables for the sketchpad and its two telemetry panels.
///
/// Everything here is overridable; `Default` gives the consolidated values
/// used by the shipped binaries. The brush radius in particular varied across
/// earlier iterations of this app (10/20/25 px); it is configuration now,
/// defaulting to 10.
#[derive(Debug, Clone)]
pub struct PadConfig {
    /// Full-resolution drawing surface width in pixels.
    pub surface_width: u32,
    /// Full-resolution drawing surface height in pixels.
    pub surface_height: u32,
    /// Radius of a single brush stamp, in surface pixels.
    pub brush_radius: f64,
    /// Stamp count per pointer-move segment. Higher is smoother, costs CPU.
    pub interpolation_steps: usize,
    /// How often an active drawing session samples the surface for the
    /// classifier.
    pub sample_interval: Duration,
    /// Downsample grid width (classifier input columns).
    pub target_width: u32,
    /// Downsample grid height (classifier input rows).
    pub target_height: u32,
    /// Local ETA countdown granularity.
    pub eta_tick: Duration,
}

impl Default for PadConfig {
    fn default() -> Self {
        PadConfig {
            surface_width:       280,
            surface_height:      280,
            brush_radius:        10.0,
            interpolation_steps: 5,
            sample_interval:     Duration::from_millis(200),
            target_width:        28,
            target_height:       28,
            eta_tick:            Duration::from_millis(1000),
        }
    }
}

impl PadConfig {
    /// Rejects configs no component can work with. Called once at startup;
    /// a failure here is fatal.
    pub fn validate(&self) -> Result<(), PadError> {
        if self.surface_width == 0 || self.surface_height == 0 {
            return Err(PadError::Config("surface dimensions must be nonzero".into()));
        }
        if self.target_width == 0 || self.target_height == 0 {
            return Err(PadError::Config("target grid dimensions must be nonzero".into()));
        }
        if self.brush_radius <= 0.0 {
            return Err(PadError::Config("brush radius must be positive".into()));
        }
        Ok(())
    }

    /// Feature vector length produced by the downsampler for this config.
    pub fn feature_len(&self) -> usize {
        self.target_width as usize * self.target_height as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PadConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_grid_is_rejected() {
        let mut cfg = PadConfig::default();
        cfg.target_width = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn feature_len_matches_grid() {
        assert_eq!(PadConfig::default().feature_len(), 28 * 28);
    }
}
