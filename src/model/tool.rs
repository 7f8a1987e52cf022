//! Editor tools.

use serde::{Deserialize, Serialize};

/// Tools the user can pick from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tool {
    /// Selection of existing regions
    Select,
    Pan,
    Zoom,
    CreatePoint,
    #[default]
    CreateBox,
    CreatePolygon,
    /// Pixel masks, produced by an external segmentation worker
    CreatePixel,
    CreateExpandingLine,
    CreateKeypoints,
    CreateLine,
    CreatePointLine,
    ModifyAllowedArea,
    /// Toggles tag display instead of becoming the active tool
    ShowTags,
    /// Toggles mask display instead of becoming the active tool
    ShowMask,
}

impl Tool {
    /// Get the serialized name for this tool.
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "select",
            Tool::Pan => "pan",
            Tool::Zoom => "zoom",
            Tool::CreatePoint => "create-point",
            Tool::CreateBox => "create-box",
            Tool::CreatePolygon => "create-polygon",
            Tool::CreatePixel => "create-pixel",
            Tool::CreateExpandingLine => "create-expanding-line",
            Tool::CreateKeypoints => "create-keypoints",
            Tool::CreateLine => "create-line",
            Tool::CreatePointLine => "create-point-line",
            Tool::ModifyAllowedArea => "modify-allowed-area",
            Tool::ShowTags => "show-tags",
            Tool::ShowMask => "show-mask",
        }
    }

    /// Tools enabled when the host does not pass a list.
    pub fn default_enabled() -> Vec<Tool> {
        vec![
            Tool::Select,
            Tool::CreatePoint,
            Tool::CreateBox,
            Tool::CreatePolygon,
            Tool::CreateLine,
            Tool::CreateExpandingLine,
            Tool::ShowMask,
        ]
    }

    /// Check if selecting this tool flips a display flag rather than switching tools.
    pub fn is_toggle(&self) -> bool {
        matches!(self, Tool::ShowTags | Tool::ShowMask)
    }

    /// Check if a mouse down with this tool creates a region.
    pub fn is_drawing_tool(&self) -> bool {
        matches!(
            self,
            Tool::CreatePoint
                | Tool::CreateBox
                | Tool::CreatePolygon
                | Tool::CreateExpandingLine
                | Tool::CreateKeypoints
                | Tool::CreateLine
                | Tool::CreatePointLine
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_match_serde() {
        for tool in [Tool::CreateBox, Tool::CreateExpandingLine, Tool::ShowMask] {
            let json = serde_json::to_string(&tool).expect("serialize tool");
            assert_eq!(json, format!("\"{}\"", tool.name()));
        }
    }

    #[test]
    fn test_toggles_are_not_drawing_tools() {
        assert!(Tool::ShowTags.is_toggle());
        assert!(!Tool::ShowTags.is_drawing_tool());
        assert!(Tool::CreatePolygon.is_drawing_tool());
        assert!(!Tool::Select.is_drawing_tool());
    }
}
