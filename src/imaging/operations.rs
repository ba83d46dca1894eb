//! High-level icon operations.
//!
//! These functions combine calculations with backend execution: they take a
//! catalog entry and rendering settings, compute parameters, and call the
//! backend.

use super::backend::{BackendError, IconBackend};
use super::calculations::{max_pixel_edge, pixel_edge};
use super::params::{DensityFactor, ResizeFilter, ResizeParams};
use super::source::SourceImage;
use crate::catalog::IconSpec;
use std::path::{Path, PathBuf};

/// Rendering settings shared by every size in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderConfig {
    pub density: DensityFactor,
    pub filter: ResizeFilter,
}

/// An encoded icon, ready to be written as `<edge_length>.png`.
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    pub edge_length: u32,
    /// Pixel edge of the encoded image.
    pub pixels: u32,
    pub bytes: Vec<u8>,
}

/// Plan a resize without executing it.
pub fn plan_resize(edge_length: u32, config: &RenderConfig) -> ResizeParams {
    ResizeParams {
        edge_length,
        pixel_edge: pixel_edge(edge_length, config.density),
        filter: config.filter,
    }
}

/// Reject a planned buffer larger than any accepted density can produce.
pub fn check_resize(params: &ResizeParams) -> Result<(), BackendError> {
    let limit = max_pixel_edge(params.edge_length);
    if params.pixel_edge > limit {
        return Err(BackendError::Size(format!(
            "{}px exceeds the {}px limit for a {} icon",
            params.pixel_edge, limit, params.edge_length
        )));
    }
    Ok(())
}

/// Resize and encode one catalog entry.
pub fn render_icon(
    backend: &impl IconBackend,
    source: &SourceImage,
    spec: &IconSpec,
    config: &RenderConfig,
) -> Result<GeneratedAsset, BackendError> {
    let params = plan_resize(spec.edge_length, config);
    check_resize(&params)?;
    let raster = backend.resize(source, &params);
    let bytes = backend.encode(&raster)?;
    Ok(GeneratedAsset {
        edge_length: spec.edge_length,
        pixels: raster.width(),
        bytes,
    })
}

/// Write an asset into the icon-set folder as `<edge_length>.png`.
///
/// `tag` must be unique per concurrent writer; the catalog index works.
pub fn write_asset(folder: &Path, asset: &GeneratedAsset, tag: usize) -> std::io::Result<PathBuf> {
    let path = folder.join(format!("{}.png", asset.edge_length));
    crate::manifest::write_atomic_tagged(&path, &asset.bytes, tag)?;
    Ok(path)
}
