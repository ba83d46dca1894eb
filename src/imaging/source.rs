//! The decoded master image an icon set is rendered from.

use super::backend::BackendError;
use image::{DynamicImage, ImageReader, RgbaImage};
use std::path::Path;

/// A decoded source raster, normalised to RGBA8 once at load time.
///
/// Every rendered size reads from the same buffer, so the conversion cost
/// is paid once per run instead of once per size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Load and decode an image from disk.
    pub fn open(path: &Path) -> Result<Self, BackendError> {
        let img = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?
            .decode()
            .map_err(|e| {
                BackendError::Decode(format!("Failed to decode {}: {}", path.display(), e))
            })?;
        Ok(Self::from_dynamic(img))
    }

    pub fn from_dynamic(img: DynamicImage) -> Self {
        Self {
            pixels: img.into_rgba8(),
        }
    }

    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.width() == 0 || self.pixels.height() == 0
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl From<DynamicImage> for SourceImage {
    fn from(img: DynamicImage) -> Self {
        Self::from_dynamic(img)
    }
}
