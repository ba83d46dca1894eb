//! Parameter types for icon rendering.
//!
//! These structs describe *what* to render, not *how*. They sit between the
//! [`operations`](super::operations) module (which decides what each catalog
//! entry becomes) and the [`backend`](super::backend) (which does the pixel
//! work), so a mock backend can be swapped in without touching the plan.
//!
//! ## Types
//!
//! - [`DensityFactor`]: ratio between nominal edge length and stored pixels (default 2.0).
//! - [`ResizeFilter`]: resampling filter, serialized in kebab-case for config files.
//! - [`ResizeParams`]: full specification for one resize: nominal edge, pixel edge, filter.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Multiplier between an icon's nominal edge length and its stored pixels.
///
/// Historically the icons were drawn on a 2x surface, so a `128` slot is
/// stored as a 64×64 pixel buffer. This is the knob that decides real
/// output dimensions.
///
/// Always at least [`DensityFactor::MIN`], so a stored icon is never more
/// than four times its nominal edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct DensityFactor(f32);

impl DensityFactor {
    pub const MIN: f32 = 0.25;

    pub fn new(value: f32) -> Option<Self> {
        (value.is_finite() && value >= Self::MIN).then_some(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for DensityFactor {
    fn default() -> Self {
        Self(2.0)
    }
}

impl TryFrom<f32> for DensityFactor {
    type Error = String;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| {
            format!(
                "density factor must be a finite number of at least {}, got {value}",
                Self::MIN
            )
        })
    }
}

impl From<DensityFactor> for f32 {
    fn from(density: DensityFactor) -> f32 {
        density.0
    }
}

/// Resampling filter used by the rescaler.
///
/// Exact pixel values are not part of any contract, only dimensions are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub fn filter_type(self) -> FilterType {
        match self {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Parameters for rendering one catalog entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeParams {
    /// Nominal edge length from the catalog (also the output file stem).
    pub edge_length: u32,
    /// Actual pixel edge of the square output buffer.
    pub pixel_edge: u32,
    pub filter: ResizeFilter,
}
