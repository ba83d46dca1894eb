//! The ordered set of icon sizes an icon set is made of.
//!
//! Each [`IconSpec`] is one output file (`<edge_length>.png`) together with
//! the asset-catalog slots that file fills. The manifest is rendered from
//! these slots, so adding or removing a size here changes both the files on
//! disk and `Contents.json` in one place.
//!
//! ## Standard catalog
//!
//! ```text
//! 16 20 29 32 40 48 50 55 57 58 60 64 72 76 80 87 88 100 114 120
//! 128 144 152 167 172 180 196 216 256 512 1024
//! ```
//!
//! Every slot satisfies `points × scale == edge_length`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("size {0} is not part of the standard icon catalog")]
    UnknownSize(u32),
    #[error("icon catalog must not be empty")]
    Empty,
}

/// Device family an icon slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Idiom {
    Iphone,
    Ipad,
    Mac,
    Watch,
    IosMarketing,
    WatchMarketing,
}

/// What a watch icon is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    NotificationCenter,
    CompanionSettings,
    AppLauncher,
    QuickLook,
}

/// One asset-catalog record served by an icon file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconSlot {
    pub idiom: Idiom,
    /// Nominal size in points; fractional for a few iPad and watch slots.
    pub points: f32,
    pub scale: u32,
    pub role: Option<Role>,
    /// Watch case size, e.g. `"38mm"`.
    pub subtype: Option<&'static str>,
}

impl IconSlot {
    pub const fn new(idiom: Idiom, points: f32, scale: u32) -> Self {
        Self {
            idiom,
            points,
            scale,
            role: None,
            subtype: None,
        }
    }

    pub const fn watch(points: f32, scale: u32, role: Role, subtype: &'static str) -> Self {
        Self {
            idiom: Idiom::Watch,
            points,
            scale,
            role: Some(role),
            subtype: Some(subtype),
        }
    }

    /// `"20x20"`, `"83.5x83.5"`.
    pub fn size_label(&self) -> String {
        format!("{}x{}", self.points, self.points)
    }

    /// `"2x"`.
    pub fn scale_label(&self) -> String {
        format!("{}x", self.scale)
    }

    /// Pixel edge this slot expects its image to have.
    pub fn pixel_size(&self) -> f32 {
        self.points * self.scale as f32
    }
}

/// One output file and the slots it fills.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconSpec {
    pub edge_length: u32,
    pub slots: &'static [IconSlot],
}

impl IconSpec {
    pub const fn new(edge_length: u32, slots: &'static [IconSlot]) -> Self {
        Self { edge_length, slots }
    }

    pub fn filename(&self) -> String {
        format!("{}.png", self.edge_length)
    }
}

use Idiom::{IosMarketing, Ipad, Iphone, Mac, WatchMarketing};
use Role::{AppLauncher, CompanionSettings, NotificationCenter, QuickLook};

const STANDARD: &[IconSpec] = &[
    IconSpec::new(16, &[IconSlot::new(Mac, 16.0, 1)]),
    IconSpec::new(20, &[IconSlot::new(Ipad, 20.0, 1)]),
    IconSpec::new(29, &[IconSlot::new(Ipad, 29.0, 1)]),
    IconSpec::new(32, &[IconSlot::new(Mac, 16.0, 2), IconSlot::new(Mac, 32.0, 1)]),
    IconSpec::new(
        40,
        &[
            IconSlot::new(Iphone, 20.0, 2),
            IconSlot::new(Ipad, 20.0, 2),
            IconSlot::new(Ipad, 40.0, 1),
        ],
    ),
    IconSpec::new(48, &[IconSlot::watch(24.0, 2, NotificationCenter, "38mm")]),
    IconSpec::new(50, &[IconSlot::new(Ipad, 50.0, 1)]),
    IconSpec::new(55, &[IconSlot::watch(27.5, 2, NotificationCenter, "42mm")]),
    IconSpec::new(57, &[IconSlot::new(Iphone, 57.0, 1)]),
    IconSpec::new(
        58,
        &[
            IconSlot::new(Iphone, 29.0, 2),
            IconSlot::new(Ipad, 29.0, 2),
            IconSlot::watch(29.0, 2, CompanionSettings, "38mm"),
        ],
    ),
    IconSpec::new(60, &[IconSlot::new(Iphone, 20.0, 3)]),
    IconSpec::new(64, &[IconSlot::new(Mac, 32.0, 2)]),
    IconSpec::new(72, &[IconSlot::new(Ipad, 72.0, 1)]),
    IconSpec::new(76, &[IconSlot::new(Ipad, 76.0, 1)]),
    IconSpec::new(
        80,
        &[
            IconSlot::new(Iphone, 40.0, 2),
            IconSlot::new(Ipad, 40.0, 2),
            IconSlot::watch(40.0, 2, AppLauncher, "38mm"),
        ],
    ),
    IconSpec::new(
        87,
        &[
            IconSlot::new(Iphone, 29.0, 3),
            IconSlot::watch(29.0, 3, CompanionSettings, "42mm"),
        ],
    ),
    IconSpec::new(88, &[IconSlot::watch(44.0, 2, AppLauncher, "40mm")]),
    IconSpec::new(
        100,
        &[
            IconSlot::new(Ipad, 50.0, 2),
            IconSlot::watch(50.0, 2, AppLauncher, "44mm"),
        ],
    ),
    IconSpec::new(114, &[IconSlot::new(Iphone, 57.0, 2)]),
    IconSpec::new(
        120,
        &[IconSlot::new(Iphone, 40.0, 3), IconSlot::new(Iphone, 60.0, 2)],
    ),
    IconSpec::new(128, &[IconSlot::new(Mac, 128.0, 1)]),
    IconSpec::new(144, &[IconSlot::new(Ipad, 72.0, 2)]),
    IconSpec::new(152, &[IconSlot::new(Ipad, 76.0, 2)]),
    IconSpec::new(167, &[IconSlot::new(Ipad, 83.5, 2)]),
    IconSpec::new(172, &[IconSlot::watch(86.0, 2, QuickLook, "38mm")]),
    IconSpec::new(180, &[IconSlot::new(Iphone, 60.0, 3)]),
    IconSpec::new(196, &[IconSlot::watch(98.0, 2, QuickLook, "42mm")]),
    IconSpec::new(216, &[IconSlot::watch(108.0, 2, QuickLook, "44mm")]),
    IconSpec::new(
        256,
        &[IconSlot::new(Mac, 128.0, 2), IconSlot::new(Mac, 256.0, 1)],
    ),
    IconSpec::new(
        512,
        &[IconSlot::new(Mac, 256.0, 2), IconSlot::new(Mac, 512.0, 1)],
    ),
    IconSpec::new(
        1024,
        &[
            IconSlot::new(IosMarketing, 1024.0, 1),
            IconSlot::new(WatchMarketing, 1024.0, 1),
            IconSlot::new(Mac, 512.0, 2),
        ],
    ),
];

/// Ordered sequence of icon sizes to render.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeCatalog {
    specs: Vec<IconSpec>,
}

impl SizeCatalog {
    /// The full icon set for iPhone, iPad, Mac and Apple Watch.
    pub fn standard() -> Self {
        Self {
            specs: STANDARD.to_vec(),
        }
    }

    /// Build a catalog from custom entries. Order is preserved.
    pub fn new(specs: Vec<IconSpec>) -> Result<Self, CatalogError> {
        if specs.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { specs })
    }

    /// A subset of the standard catalog, in the requested order.
    pub fn only(edges: &[u32]) -> Result<Self, CatalogError> {
        let specs = edges
            .iter()
            .map(|&edge| {
                STANDARD
                    .iter()
                    .find(|spec| spec.edge_length == edge)
                    .copied()
                    .ok_or(CatalogError::UnknownSize(edge))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(specs)
    }

    pub fn get(&self, edge_length: u32) -> Option<&IconSpec> {
        self.specs.iter().find(|s| s.edge_length == edge_length)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IconSpec> {
        self.specs.iter()
    }

    pub fn specs(&self) -> &[IconSpec] {
        &self.specs
    }

    pub fn edge_lengths(&self) -> Vec<u32> {
        self.specs.iter().map(|s| s.edge_length).collect()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for SizeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> IntoIterator for &'a SizeCatalog {
    type Item = &'a IconSpec;
    type IntoIter = std::slice::Iter<'a, IconSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
