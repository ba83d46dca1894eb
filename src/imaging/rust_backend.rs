//! Pure Rust rendering backend on top of the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode source (JPEG, PNG, TIFF, WebP) | `image::ImageReader` |
//! | Resize | `image::imageops::resize`, filter from config (Lanczos3 by default) |
//! | Encode → PNG | `image::codecs::png::PngEncoder`, RGBA8 |

use super::backend::{BackendError, IconBackend};
use super::params::ResizeParams;
use super::source::SourceImage;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Scale a square source to `pixel_edge × pixel_edge`.
///
/// # Panics
///
/// Panics if `params.edge_length` is zero. Catalog values are trusted, so a
/// zero edge is a programming error rather than a recoverable condition.
pub fn resize_icon(source: &SourceImage, params: &ResizeParams) -> RgbaImage {
    assert!(params.edge_length > 0, "icon edge length must be positive");

    // A density factor larger than the edge rounds to nothing; hand back an
    // empty buffer and let the encoder reject it.
    if params.pixel_edge == 0 {
        return RgbaImage::new(0, 0);
    }
    image::imageops::resize(
        source.pixels(),
        params.pixel_edge,
        params.pixel_edge,
        params.filter.filter_type(),
    )
}

/// Encode an RGBA raster as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, BackendError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(BackendError::Encoding(format!(
            "cannot encode a {width}x{height} image"
        )));
    }
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| BackendError::Encoding(format!("PNG encode failed: {}", e)))?;
    Ok(bytes)
}

impl IconBackend for RustBackend {
    fn resize(&self, source: &SourceImage, params: &ResizeParams) -> RgbaImage {
        resize_icon(source, params)
    }

    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError> {
        encode_png(image)
    }
}
