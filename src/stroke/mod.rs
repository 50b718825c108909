pub mod interpolate;

pub use interpolate::{interpolate, StampPath};
