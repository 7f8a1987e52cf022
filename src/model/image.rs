//! Images being annotated.

use serde::{Deserialize, Serialize};

use super::region::RegionStore;

/// Decoded pixel dimensions, reported once the image element has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelSize {
    pub w: u32,
    pub h: u32,
}

/// Real-world size of the imaged area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealSize {
    pub w: f32,
    pub h: f32,
    pub unit_name: String,
}

/// An image and the regions drawn on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Source reference (URL or path) handed to the renderer.
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_src: Option<String>,
    pub name: String,
    #[serde(default)]
    pub regions: RegionStore,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_size: Option<PixelSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_size: Option<RealSize>,
    /// Image-level classification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    /// Image-level tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Image {
    /// Create an image without regions.
    pub fn new(src: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            thumbnail_src: None,
            name: name.into(),
            regions: RegionStore::new(),
            pixel_size: None,
            real_size: None,
            cls: None,
            tags: Vec::new(),
        }
    }
}

/// A partial update of image-level labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDelta {
    #[serde(default)]
    pub cls: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
