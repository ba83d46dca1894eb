//! Pure calculation functions for icon dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::DensityFactor;

/// Pixel edge of the stored buffer for a nominal edge length.
///
/// Divides by the density factor and rounds half away from zero, so with
/// the default factor of 2.0 a `29` slot becomes 15 pixels.
///
/// # Examples
/// ```
/// # use appicon::imaging::{DensityFactor, pixel_edge};
/// assert_eq!(pixel_edge(128, DensityFactor::default()), 64);
/// assert_eq!(pixel_edge(29, DensityFactor::default()), 15);
/// assert_eq!(pixel_edge(29, DensityFactor::new(1.0).unwrap()), 29);
/// ```
pub fn pixel_edge(edge_length: u32, density: DensityFactor) -> u32 {
    (edge_length as f64 / density.value() as f64).round() as u32
}

/// Largest pixel edge a nominal edge may be stored at.
///
/// Matches the lowest accepted density factor.
pub fn max_pixel_edge(edge_length: u32) -> u32 {
    (edge_length as f64 / DensityFactor::MIN as f64) as u32
}

/// Whether a source of the given dimensions can be used as an icon master.
pub fn is_square((width, height): (u32, u32)) -> bool {
    width == height
}
