//! Session configuration supplied by the host.
//!
//! This module deserializes everything a host hands to an editing session at
//! start-up: the images, the initial tool and class selection, vocabularies and
//! feature flags. Defaults mirror what an embedding application gets when it
//! leaves a field out.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MAX_HISTORY;
use crate::error::ConfigError;
use crate::model::{BoundingBox, Image, KeypointsDefinition, Tool};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which image to open first: an index or an image name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSelector {
    Index(i64),
    Name(String),
}

impl ImageSelector {
    /// Resolve against the image list. Negative, out-of-range and unknown
    /// selectors resolve to no image.
    pub fn resolve(&self, images: &[Image]) -> Option<usize> {
        match self {
            ImageSelector::Index(index) => usize::try_from(*index)
                .ok()
                .filter(|i| *i < images.len()),
            ImageSelector::Name(name) => images.iter().position(|img| &img.name == name),
        }
    }
}

/// A region class: a bare name or a name with display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClsEntry {
    Name(String),
    Detailed {
        id: String,
        label: String,
        #[serde(default)]
        color: Option<String>,
    },
}

impl ClsEntry {
    /// Identifier stored in `Region::cls`.
    pub fn id(&self) -> &str {
        match self {
            ClsEntry::Name(name) => name,
            ClsEntry::Detailed { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ClsEntry::Name(name) => name,
            ClsEntry::Detailed { label, .. } => label,
        }
    }

    pub fn color(&self) -> Option<&str> {
        match self {
            ClsEntry::Name(_) => None,
            ClsEntry::Detailed { color, .. } => color.as_deref(),
        }
    }
}

/// Which per-region actions the sidebar offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionAllowedActions {
    pub remove: bool,
    pub lock: bool,
    pub visibility: bool,
}

impl Default for RegionAllowedActions {
    fn default() -> Self {
        Self {
            remove: true,
            lock: true,
            visibility: true,
        }
    }
}

/// Undo history settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HistoryConfig {
    /// Maximum number of entries to keep in history
    pub max_entries: usize,
    /// Record an entry for every pointer move that changes geometry
    pub record_pointer_moves: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_HISTORY,
            record_pointer_moves: false,
        }
    }
}

/// Everything a host passes to start an editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Images to annotate. `None` renders a placeholder instead of the editor.
    pub images: Option<Vec<Image>>,
    /// Image to open first; defaults to the first image
    pub selected_image: Option<ImageSelector>,
    pub selected_tool: Tool,
    pub selected_cls: Option<String>,
    pub enabled_tools: Vec<Tool>,
    /// Region edits are confined to this area
    pub allowed_area: Option<BoundingBox>,

    pub region_cls_list: Vec<ClsEntry>,
    pub region_tag_list: Vec<String>,
    pub region_tag_single_selection: bool,
    pub region_allowed_actions: RegionAllowedActions,
    pub image_cls_list: Vec<String>,
    pub image_tag_list: Vec<String>,
    pub keypoint_definitions: BTreeMap<String, KeypointsDefinition>,

    pub task_description: String,
    pub show_tags: bool,
    pub show_point_distances: bool,
    pub point_distance_precision: Option<u32>,
    pub allow_comments: bool,
    pub full_image_segmentation_mode: bool,

    /// Verbose dispatch logging
    pub debug: bool,
    pub history: HistoryConfig,
    pub log_level: LogLevel,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            images: None,
            selected_image: None,
            selected_tool: Tool::CreateBox,
            selected_cls: None,
            enabled_tools: Tool::default_enabled(),
            allowed_area: None,
            region_cls_list: Vec::new(),
            region_tag_list: Vec::new(),
            region_tag_single_selection: false,
            region_allowed_actions: RegionAllowedActions::default(),
            image_cls_list: Vec::new(),
            image_tag_list: Vec::new(),
            keypoint_definitions: BTreeMap::new(),
            task_description: String::new(),
            show_tags: true,
            show_point_distances: false,
            point_distance_precision: None,
            allow_comments: false,
            full_image_segmentation_mode: false,
            debug: false,
            history: HistoryConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration for `images` with all other settings at their defaults.
    pub fn with_images(images: Vec<Image>) -> Self {
        Self {
            images: Some(images),
            ..Default::default()
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Serialize the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Index of the image to open first.
    pub fn initial_image(&self) -> Option<usize> {
        let images = self.images.as_deref().unwrap_or_default();
        match &self.selected_image {
            Some(selector) => selector.resolve(images),
            None => (!images.is_empty()).then_some(0),
        }
    }

    /// Check host input against the invariants the editor relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                expected: CONFIG_VERSION,
                found: self.version,
            });
        }

        if !self.selected_tool.is_toggle() && !self.enabled_tools.contains(&self.selected_tool) {
            return Err(ConfigError::ToolNotEnabled {
                tool: self.selected_tool.name().to_string(),
            });
        }

        for image in self.images.iter().flatten() {
            for region in image.regions.iter() {
                region.shape.validate().map_err(|message| {
                    ConfigError::invalid_geometry(&image.name, &region.id, message)
                })?;
            }
        }

        Ok(())
    }
}
