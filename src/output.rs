//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Generate
//!
//! ```text
//! AppIcon.appiconset → icons/AppIcon.appiconset
//!     Contents.json (52 records)
//!     16.png    8px
//!     57.png    failed: Encoding failed: cannot encode a 0x0 image
//!     64.png    skipped
//!
//! Icon set incomplete: 1 of 31 icons failed (57)
//! ```
//!
//! ## Sizes
//!
//! ```text
//!   16.png   8px  mac 16x16@1x
//!   32.png  16px  mac 16x16@2x, mac 32x32@1x
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions do no I/O.

use crate::catalog::{IconSlot, SizeCatalog};
use crate::imaging::{DensityFactor, pixel_edge};
use crate::pipeline::{Completion, GenerateEvent};

/// Format a single progress event as display lines.
pub fn format_generate_event(event: &GenerateEvent) -> Vec<String> {
    match event {
        GenerateEvent::FolderCreated { path } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            vec![format!("{} \u{2192} {}", name, path.display())]
        }
        GenerateEvent::ManifestWritten { path, records } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            vec![format!("    {} ({} records)", name, records)]
        }
        GenerateEvent::IconWritten {
            edge_length,
            pixels,
        } => vec![format!("    {:<9} {}px", icon_name(*edge_length), pixels)],
        GenerateEvent::IconFailed {
            edge_length,
            reason,
        } => vec![format!("    {:<9} failed: {}", icon_name(*edge_length), reason)],
        GenerateEvent::IconSkipped { edge_length } => {
            vec![format!("    {:<9} skipped", icon_name(*edge_length))]
        }
    }
}

fn icon_name(edge_length: u32) -> String {
    format!("{}.png", edge_length)
}

/// Format the final completion line, preceded by a blank separator.
pub fn format_completion(completion: &Completion) -> Vec<String> {
    vec![String::new(), completion.message.clone()]
}

fn slot_label(slot: &IconSlot) -> String {
    let idiom = serde_json::to_value(slot.idiom)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let mut label = format!("{} {}@{}", idiom, slot.size_label(), slot.scale_label());
    if let Some(subtype) = slot.subtype {
        label.push_str(&format!(" ({})", subtype));
    }
    label
}

/// Format the catalog: file name, stored pixel edge, slots it fills.
pub fn format_catalog(catalog: &SizeCatalog, density: DensityFactor) -> Vec<String> {
    catalog
        .iter()
        .map(|spec| {
            let slots: Vec<String> = spec.slots.iter().map(slot_label).collect();
            format!(
                "{:>9} {:>4}px  {}",
                spec.filename(),
                pixel_edge(spec.edge_length, density),
                slots.join(", ")
            )
        })
        .collect()
}

/// Print the catalog to stdout.
pub fn print_catalog(catalog: &SizeCatalog, density: DensityFactor) {
    for line in format_catalog(catalog, density) {
        println!("{}", line);
    }
}
