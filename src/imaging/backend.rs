//! Icon rendering backend trait and shared types.
//!
//! The [`IconBackend`] trait defines the two operations every backend must
//! support: resize and encode. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate and statically linked into the binary.

use super::params::ResizeParams;
use super::source::SourceImage;
use image::RgbaImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decoding failed: {0}")]
    Decode(String),
    #[error("Encoding failed: {0}")]
    Encoding(String),
    #[error("Invalid icon size: {0}")]
    Size(String),
}

/// Trait for icon rendering backends.
///
/// `Sync` so a single backend can be shared across rayon workers.
pub trait IconBackend: Sync {
    /// Scale the source into a square `pixel_edge × pixel_edge` buffer.
    fn resize(&self, source: &SourceImage, params: &ResizeParams) -> RgbaImage;

    /// Encode a raster as PNG bytes.
    fn encode(&self, image: &RgbaImage) -> Result<Vec<u8>, BackendError>;
}
