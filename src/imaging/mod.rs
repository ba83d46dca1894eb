//! Icon rasterisation in pure Rust, on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Load source** | `image::ImageReader`, normalised to RGBA8 |
//! | **Resize** | `image::imageops::resize` (Lanczos3 by default) |
//! | **Encode** | `image::codecs::png::PngEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a resize
//! - **Backend**: [`IconBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;
mod source;

pub use backend::{BackendError, IconBackend};
pub use calculations::{is_square, max_pixel_edge, pixel_edge};
pub use operations::{
    GeneratedAsset, RenderConfig, check_resize, plan_resize, render_icon, write_asset,
};
pub use params::{DensityFactor, ResizeFilter, ResizeParams};
pub use rust_backend::{RustBackend, encode_png, resize_icon};
pub use source::SourceImage;
