pub mod surface;
pub mod downsample;

pub use surface::Surface;
pub use downsample::{downsample, FeatureVector};
