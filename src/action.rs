//! Actions: the only way to request a state transition.
//!
//! Actions serialize as tagged records, e.g.
//! `{"type": "MOUSE_MOVE", "x": 0.5, "y": 0.25}`.

use serde::{Deserialize, Serialize};

use crate::model::{ImageDelta, Point, Region, RegionId, Tool};

/// A requested state transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Action {
    // Pointer
    MouseDown { x: f32, y: f32 },
    MouseMove { x: f32, y: f32 },
    MouseUp { x: f32, y: f32 },
    Cancel,

    // Gesture starts
    /// Start dragging box edges; `directions` of `[0, 0]` moves the box instead.
    BeginBoxTransform { region: Region, directions: [i8; 2] },
    BeginMovePoint { region_id: RegionId },
    BeginMoveRegion { region_id: RegionId },
    BeginMovePolygonPoint { region_id: RegionId, point_index: usize },
    BeginMoveKeypoint { region_id: RegionId, keypoint_id: String },
    /// Start scaling a whole skeleton.
    ResizeKeypoints { region_id: RegionId },

    // Polygon drawing
    AddPolygonPoint {
        region_id: RegionId,
        point: Point,
        point_index: usize,
    },
    ClosePolygon { region_id: RegionId },

    // Mode-independent region edits
    SelectRegion { region_id: RegionId },
    ChangeRegion { region: Region },
    DeleteRegion { region_id: RegionId },
    DeleteSelectedRegion,
    OpenRegionEditor { region_id: RegionId },
    CloseRegionEditor { region_id: RegionId },

    // General
    SelectTool { tool: Tool },
    SelectClassification { cls: String },
    OnClsAdded { cls: String },
    SelectImage { image_index: usize },
    ImageLoaded { natural_width: u32, natural_height: u32 },
    ChangeImage { delta: ImageDelta },
    HeaderButtonClicked { button_name: String },

    /// Restore the history entry at `index` (the newest when absent).
    RestoreHistory {
        #[serde(default)]
        index: Option<usize>,
    },
}

impl Action {
    /// The action type label, also used to name history entries.
    pub fn name(&self) -> &'static str {
        match self {
            Action::MouseDown { .. } => "MOUSE_DOWN",
            Action::MouseMove { .. } => "MOUSE_MOVE",
            Action::MouseUp { .. } => "MOUSE_UP",
            Action::Cancel => "CANCEL",
            Action::BeginBoxTransform { .. } => "BEGIN_BOX_TRANSFORM",
            Action::BeginMovePoint { .. } => "BEGIN_MOVE_POINT",
            Action::BeginMoveRegion { .. } => "BEGIN_MOVE_REGION",
            Action::BeginMovePolygonPoint { .. } => "BEGIN_MOVE_POLYGON_POINT",
            Action::BeginMoveKeypoint { .. } => "BEGIN_MOVE_KEYPOINT",
            Action::ResizeKeypoints { .. } => "RESIZE_KEYPOINTS",
            Action::AddPolygonPoint { .. } => "ADD_POLYGON_POINT",
            Action::ClosePolygon { .. } => "CLOSE_POLYGON",
            Action::SelectRegion { .. } => "SELECT_REGION",
            Action::ChangeRegion { .. } => "CHANGE_REGION",
            Action::DeleteRegion { .. } => "DELETE_REGION",
            Action::DeleteSelectedRegion => "DELETE_SELECTED_REGION",
            Action::OpenRegionEditor { .. } => "OPEN_REGION_EDITOR",
            Action::CloseRegionEditor { .. } => "CLOSE_REGION_EDITOR",
            Action::SelectTool { .. } => "SELECT_TOOL",
            Action::SelectClassification { .. } => "SELECT_CLASSIFICATION",
            Action::OnClsAdded { .. } => "ON_CLS_ADDED",
            Action::SelectImage { .. } => "SELECT_IMAGE",
            Action::ImageLoaded { .. } => "IMAGE_LOADED",
            Action::ChangeImage { .. } => "CHANGE_IMAGE",
            Action::HeaderButtonClicked { .. } => "HEADER_BUTTON_CLICKED",
            Action::RestoreHistory { .. } => "RESTORE_HISTORY",
        }
    }

    /// Check if this is a high-frequency pointer move.
    pub fn is_pointer_move(&self) -> bool {
        matches!(self, Action::MouseMove { .. })
    }
}

/// Buttons in the editor header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Exit,
    Done,
    Save,
    Complete,
    Next,
    Prev,
    Clone,
    Settings,
    Fullscreen,
    Window,
}

impl HeaderButton {
    /// Parse a button name, ignoring case. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let button = match name.to_ascii_lowercase().as_str() {
            "exit" => HeaderButton::Exit,
            "done" => HeaderButton::Done,
            "save" => HeaderButton::Save,
            "complete" => HeaderButton::Complete,
            "next" => HeaderButton::Next,
            "prev" => HeaderButton::Prev,
            "clone" => HeaderButton::Clone,
            "settings" => HeaderButton::Settings,
            "fullscreen" => HeaderButton::Fullscreen,
            "window" | "exit fullscreen" => HeaderButton::Window,
            _ => return None,
        };
        Some(button)
    }

    /// Check if this button ends the session through the host's exit callback.
    pub fn is_exit(&self) -> bool {
        matches!(
            self,
            HeaderButton::Exit | HeaderButton::Done | HeaderButton::Save | HeaderButton::Complete
        )
    }
}
