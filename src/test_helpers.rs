//! Shared test utilities for the appicon test suite.
//!
//! Synthetic images are generated in memory, so no fixture files are needed.

use image::{ImageEncoder, RgbaImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// A square RGBA gradient with a varying alpha channel.
pub fn gradient_rgba(edge: u32) -> RgbaImage {
    RgbaImage::from_fn(edge, edge, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 128, ((x + y) % 256) as u8])
    })
}

/// Write a square gradient PNG to `path`.
pub fn write_test_png(path: &Path, edge: u32) {
    let img = gradient_rgba(edge);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::png::PngEncoder::new(writer)
        .write_image(img.as_raw(), edge, edge, image::ExtendedColorType::Rgba8)
        .unwrap();
}

// =========================================================================
// Filesystem inspection
// =========================================================================

/// Sorted names of the direct children of `dir`.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("cannot list {}: {e}", dir.display()))
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Pixel dimensions of a PNG on disk. Panics if it cannot be read.
pub fn png_dimensions(path: &Path) -> (u32, u32) {
    image::image_dimensions(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
}
