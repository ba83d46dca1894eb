//! # appicon
//!
//! Turns one square source image into a complete app icon set: an
//! `AppIcon.appiconset` folder holding one PNG per catalog size plus the
//! `Contents.json` manifest that tells the asset catalog which file fills
//! which slot.
//!
//! # Architecture: One Run, Many Independent Sizes
//!
//! ```text
//! source image ──┐
//!                ├─ create folder ─ write Contents.json ─┬─ 16.png
//! destination ───┘                                        ├─ 20.png
//!                                                         ├─ ...
//!                                                         └─ 1024.png
//! ```
//!
//! Folder creation and the manifest are all-or-nothing: if either fails the
//! run stops. Every size after that is independent. A size that cannot be
//! encoded or written is recorded in the report, and its siblings carry on.
//! The run ends with exactly one [`pipeline::Completion`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | The fixed list of icon sizes and the asset-catalog slots each fills |
//! | [`manifest`] | `Contents.json` model, rendering, and atomic file writes |
//! | [`imaging`] | Pure-Rust image operations: load, resize, PNG encode |
//! | [`pipeline`] | One generation run: validation, folder, manifest, per-size rendering, report |
//! | [`worker`] | Background thread with busy state, cancellation, and a single completion |
//! | [`config`] | `appicon.toml` loading and validation |
//! | [`output`] | CLI output formatting for progress events and the catalog |
//!
//! # Design Decisions
//!
//! ## Manifest Derived From the Catalog
//!
//! `Contents.json` is generated from the same table that drives rendering, so
//! every filename it references is a file the run attempts to write. There is
//! no bundled manifest to drift out of sync.
//!
//! ## Density-Scaled Storage
//!
//! A catalog entry's edge length is nominal. The stored PNG is
//! `edge / density_factor` pixels on each side (2.0 by default), rounded to
//! the nearest pixel. Set `density_factor = 1.0` to store full-size files.
//!
//! ## Atomic Writes
//!
//! Each PNG and the manifest are written to a hidden temporary file in the
//! target folder and renamed into place, so an interrupted run never leaves a
//! truncated file under a final name.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod manifest;
pub mod output;
pub mod pipeline;
pub mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;
