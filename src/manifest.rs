//! `Contents.json` rendering for the icon set.
//!
//! Xcode reads the asset catalog's `Contents.json` to map each file to the
//! device slots it serves. The layout below is the one Xcode writes itself:
//!
//! ```json
//! {
//!   "images": [
//!     { "filename": "40.png", "idiom": "iphone", "scale": "2x", "size": "20x20" },
//!     { "filename": "48.png", "idiom": "watch", "role": "notificationCenter",
//!       "scale": "2x", "size": "24x24", "subtype": "38mm" }
//!   ],
//!   "info": { "author": "xcode", "version": 1 }
//! }
//! ```
//!
//! Records are derived from [`SizeCatalog`] slots, one per slot, in catalog
//! order. Output depends only on the catalog, never on the source image.

use crate::catalog::{Idiom, Role, SizeCatalog};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the manifest file inside the icon-set folder.
pub const MANIFEST_FILENAME: &str = "Contents.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    pub images: Vec<ContentsImage>,
    pub info: ContentsInfo,
}

/// Field order matches Xcode's alphabetical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentsImage {
    pub filename: String,
    pub idiom: Idiom,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub scale: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentsInfo {
    pub author: String,
    pub version: u32,
}

impl Default for ContentsInfo {
    fn default() -> Self {
        Self {
            author: "xcode".to_string(),
            version: 1,
        }
    }
}

impl Contents {
    pub fn from_catalog(catalog: &SizeCatalog) -> Self {
        let images = catalog
            .iter()
            .flat_map(|spec| {
                spec.slots.iter().map(move |slot| ContentsImage {
                    filename: spec.filename(),
                    idiom: slot.idiom,
                    role: slot.role,
                    scale: slot.scale_label(),
                    size: slot.size_label(),
                    subtype: slot.subtype.map(str::to_string),
                })
            })
            .collect();
        Self {
            images,
            info: ContentsInfo::default(),
        }
    }
}

/// Render the manifest for a catalog as pretty JSON with a trailing newline.
pub fn render(catalog: &SizeCatalog) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(&Contents::from_catalog(catalog))?;
    json.push('\n');
    Ok(json)
}

/// Write `Contents.json` into `folder`, returning its path.
pub fn write(folder: &Path, catalog: &SizeCatalog) -> io::Result<PathBuf> {
    let path = folder.join(MANIFEST_FILENAME);
    let json = render(catalog)?;
    write_atomic(&path, json.as_bytes())?;
    Ok(path)
}

/// Write through a hidden sibling temp file and rename into place.
///
/// `tag` keeps temp names distinct when several writers share a folder.
/// The temp file is removed if anything fails.
pub(crate) fn write_atomic_tagged(path: &Path, bytes: &[u8], tag: usize) -> io::Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp = path.with_file_name(format!(".{name}.{tag}.tmp"));
    let result = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    write_atomic_tagged(path, bytes, 0)
}
