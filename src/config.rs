//! Icon generation configuration.
//!
//! Handles loading and validating `appicon.toml`. Every key is optional;
//! stock defaults reproduce the historical behaviour (2x density, Lanczos3,
//! one icon at a time, full catalog).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! folder_name = "AppIcon.appiconset"  # Created under the destination
//! # sizes = [16, 32, 1024]            # Subset of the standard catalog
//!
//! [rendering]
//! density_factor = 2.0      # Nominal edge / stored pixel edge, >= 0.25
//! filter = "lanczos3"       # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [processing]
//! max_processes = 1         # Parallel workers, 0 = one per CPU core
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::catalog::{CatalogError, SizeCatalog};
use crate::imaging::{DensityFactor, ResizeFilter};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config file name looked up next to the working directory.
pub const CONFIG_FILENAME: &str = "appicon.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

impl From<CatalogError> for ConfigError {
    fn from(err: CatalogError) -> Self {
        ConfigError::Validation(format!("sizes: {err}"))
    }
}

/// Icon generation configuration loaded from `appicon.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconConfig {
    /// Name of the icon-set folder created under the destination root.
    pub folder_name: String,
    /// Restrict generation to these catalog sizes. `None` renders all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<u32>>,
    /// Resampling settings.
    pub rendering: RenderingConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            folder_name: "AppIcon.appiconset".to_string(),
            sizes: None,
            rendering: RenderingConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl IconConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.folder_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "folder_name must be a single path component".into(),
            ));
        }
        self.catalog()?;
        Ok(())
    }

    /// The catalog this config selects.
    pub fn catalog(&self) -> Result<SizeCatalog, CatalogError> {
        match &self.sizes {
            Some(sizes) => SizeCatalog::only(sizes),
            None => Ok(SizeCatalog::standard()),
        }
    }
}

/// Resampling settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderingConfig {
    /// Ratio between nominal edge length and stored pixels.
    pub density_factor: DensityFactor,
    /// Resampling filter.
    pub filter: ResizeFilter,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel icon workers. `0` means one per core.
    pub max_processes: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { max_processes: 1 }
    }
}

/// Resolve the effective thread count from config.
///
/// - `0` → use all available cores
/// - `n` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match config.max_processes {
        0 => cores,
        n => n.min(cores),
    }
}

/// Load config from a TOML file and validate it.
pub fn load_config(path: &Path) -> Result<IconConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: IconConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `appicon.toml` from `dir` if present, stock defaults otherwise.
pub fn load_config_in(dir: &Path) -> Result<IconConfig, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        return Ok(IconConfig::default());
    }
    load_config(&path)
}

/// Returns a fully-commented stock `appicon.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# appicon Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Folder created under the destination directory.
folder_name = "AppIcon.appiconset"

# Render only these sizes (must be part of the standard catalog).
# Omit to render the full set; run `appicon sizes` to list it.
# sizes = [16, 32, 64, 128, 256, 512, 1024]

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[rendering]
# Nominal edge length divided by this gives the stored pixel edge.
# 2.0 stores a 128 icon as 64x64 pixels; 1.0 stores it as 128x128.
# Must be at least 0.25.
density_factor = 2.0

# Resampling filter: nearest, triangle, catmull-rom, gaussian, lanczos3.
filter = "lanczos3"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel icon workers. 1 renders sizes one after another,
# 0 uses one worker per CPU core.
max_processes = 1
"##
}
