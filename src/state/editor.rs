//! Editor state: everything in a session except the undo history.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::mode::Mode;
use crate::config::{ClsEntry, RegionAllowedActions, SessionConfig};
use crate::constants::REGION_ID_PREFIX;
use crate::model::{BoundingBox, Image, KeypointsDefinition, Point, RegionId, Tool, default_color};

/// Per-feature options fixed at session start, plus the class list that
/// grows as the user adds classes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    pub task_description: String,
    pub enabled_tools: Vec<Tool>,
    pub region_cls_list: Vec<ClsEntry>,
    pub region_tag_list: Vec<String>,
    pub region_tag_single_selection: bool,
    pub region_allowed_actions: RegionAllowedActions,
    pub image_cls_list: Vec<String>,
    pub image_tag_list: Vec<String>,
    /// Whole images get labels, not just regions
    pub label_images: bool,
    pub keypoint_definitions: BTreeMap<String, KeypointsDefinition>,
    pub show_point_distances: bool,
    pub point_distance_precision: Option<u32>,
    pub allow_comments: bool,
    pub full_image_segmentation_mode: bool,
}

/// The snapshot-able part of a session.
///
/// Images and options sit behind `Arc`: cloning the state is cheap, and
/// `Arc::make_mut` copies only what an update touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub images: Vec<Arc<Image>>,
    pub selected_image: Option<usize>,
    pub selected_tool: Tool,
    pub selected_cls: Option<String>,
    pub mode: Mode,
    pub allowed_area: Option<BoundingBox>,
    /// Where the current press started, until the matching release
    pub mouse_down_at: Option<Point>,
    pub show_tags: bool,
    pub show_mask: bool,
    pub settings_open: bool,
    pub full_screen: bool,
    pub options: Arc<EditorOptions>,
    /// Sequence number for the next editor-created region id
    pub next_region_seq: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::from_config(&SessionConfig::default())
    }
}

impl EditorState {
    /// Build the initial state from host configuration.
    pub fn from_config(config: &SessionConfig) -> Self {
        let images: Vec<Arc<Image>> = config
            .images
            .iter()
            .flatten()
            .cloned()
            .map(Arc::new)
            .collect();

        Self {
            selected_image: config.initial_image(),
            images,
            selected_tool: config.selected_tool,
            selected_cls: config.selected_cls.clone(),
            mode: Mode::Idle,
            allowed_area: config.allowed_area,
            mouse_down_at: None,
            show_tags: config.show_tags,
            show_mask: true,
            settings_open: false,
            full_screen: false,
            options: Arc::new(EditorOptions {
                task_description: config.task_description.clone(),
                enabled_tools: config.enabled_tools.clone(),
                region_cls_list: config.region_cls_list.clone(),
                region_tag_list: config.region_tag_list.clone(),
                region_tag_single_selection: config.region_tag_single_selection,
                region_allowed_actions: config.region_allowed_actions,
                image_cls_list: config.image_cls_list.clone(),
                image_tag_list: config.image_tag_list.clone(),
                label_images: !config.image_cls_list.is_empty()
                    || !config.image_tag_list.is_empty(),
                keypoint_definitions: config.keypoint_definitions.clone(),
                show_point_distances: config.show_point_distances,
                point_distance_precision: config.point_distance_precision,
                allow_comments: config.allow_comments,
                full_image_segmentation_mode: config.full_image_segmentation_mode,
            }),
            next_region_seq: 1,
        }
    }

    /// Allocate a region id not used by any region of the active image.
    pub fn allocate_region_id(&mut self) -> RegionId {
        loop {
            let id = format!("{}-{}", REGION_ID_PREFIX, self.next_region_seq);
            self.next_region_seq += 1;
            let taken = super::active_image(self)
                .image
                .is_some_and(|img| img.regions.contains(&id));
            if !taken {
                return id;
            }
        }
    }

    /// Display color for regions of class `cls`.
    pub fn color_for_cls(&self, cls: Option<&str>) -> String {
        let list = &self.options.region_cls_list;
        let index = cls.and_then(|c| list.iter().position(|entry| entry.id() == c));
        match index {
            Some(i) => list[i]
                .color()
                .map(str::to_string)
                .unwrap_or_else(|| default_color(i)),
            None => default_color(0),
        }
    }

    /// Check if `point` lies where regions may be created.
    pub fn in_allowed_area(&self, point: &Point) -> bool {
        self.allowed_area.is_none_or(|area| area.contains(point))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Region, Shape};

    #[test]
    fn test_from_config_copies_options() {
        let config = SessionConfig {
            image_tag_list: vec!["blurry".to_string()],
            ..SessionConfig::with_images(vec![Image::new("a.png", "a")])
        };
        let state = EditorState::from_config(&config);
        assert_eq!(state.selected_image, Some(0));
        assert!(state.options.label_images);
        assert!(state.mode.is_idle());
        assert!(state.show_mask);
    }

    #[test]
    fn test_allocate_region_id_skips_taken_ids() {
        let mut image = Image::new("a.png", "a");
        image
            .regions
            .upsert(Region::new("region-1", Shape::Point(Point::new(0.1, 0.1))));
        let mut state = EditorState::from_config(&SessionConfig::with_images(vec![image]));

        assert_eq!(state.allocate_region_id(), "region-2");
        assert_eq!(state.allocate_region_id(), "region-3");
    }

    #[test]
    fn test_color_for_cls_prefers_configured_color() {
        let config = SessionConfig {
            region_cls_list: vec![
                ClsEntry::Name("cat".to_string()),
                ClsEntry::Detailed {
                    id: "dog".to_string(),
                    label: "Dog".to_string(),
                    color: Some("#123456".to_string()),
                },
            ],
            ..Default::default()
        };
        let state = EditorState::from_config(&config);
        assert_eq!(state.color_for_cls(Some("dog")), "#123456");
        assert_eq!(state.color_for_cls(Some("cat")), default_color(0));
    }

    #[test]
    fn test_allowed_area_check() {
        let mut state = EditorState::default();
        assert!(state.in_allowed_area(&Point::new(5.0, 5.0)));
        state.allowed_area = Some(BoundingBox::new(0.25, 0.25, 0.5, 0.5));
        assert!(state.in_allowed_area(&Point::new(0.5, 0.5)));
        assert!(!state.in_allowed_area(&Point::new(0.1, 0.5)));
    }
}
