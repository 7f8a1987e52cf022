//! The in-progress interactive gesture.
//!
//! Every variant carries what is needed to recompute the target geometry from
//! the latest pointer position alone, plus the region as it was before the
//! gesture so a cancel can put its geometry back. A `before` of `None` means the gesture
//! created the region.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::model::{BoundingBox, Point, Region, RegionId, Shape};

/// The single active gesture, or [`Mode::Idle`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(
    tag = "mode",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum Mode {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Clicking out the vertices of a new polygon.
    DrawingPolygon { region_id: RegionId },
    /// Dragging one polygon vertex.
    MovingPolygonPoint {
        region_id: RegionId,
        point_index: usize,
        before: Arc<Region>,
    },
    /// Dragging box edges. `freedom` holds -1 (left/top edge moves),
    /// 1 (right/bottom edge moves) or 0 (axis fixed) per axis.
    ResizingBox {
        region_id: RegionId,
        freedom: [i8; 2],
        original: BoundingBox,
        before: Option<Arc<Region>>,
    },
    /// Dragging a whole region; `original` follows the cursor offset from `grab`.
    MovingRegion {
        region_id: RegionId,
        grab: Point,
        original: Shape,
        before: Option<Arc<Region>>,
    },
    /// Dragging a single landmark of a skeleton.
    MovingKeypoint {
        region_id: RegionId,
        keypoint_id: String,
        before: Arc<Region>,
    },
    /// Scaling a whole skeleton about `center`. Landmarks sit at
    /// `center + offset * distance(cursor, center) / reference`.
    ResizingKeypoints {
        region_id: RegionId,
        center: Point,
        landmarks: BTreeMap<String, Point>,
        reference: f32,
        grab: Option<Point>,
        before: Option<Arc<Region>>,
    },
    /// Placing the end point of a new line.
    DrawingLine { region_id: RegionId },
    /// Placing the vertices of a new expanding line.
    DrawingExpandingLine { region_id: RegionId },
    /// Choosing the stroke width of a just-placed expanding line.
    SettingExpandingLineWidth { region_id: RegionId },
    /// Dropping a chain of points.
    CreatingPointLine { region_ids: Vec<RegionId> },
}

impl Mode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Mode::Idle)
    }

    /// Name of the mode for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Idle => "IDLE",
            Mode::DrawingPolygon { .. } => "DRAWING_POLYGON",
            Mode::MovingPolygonPoint { .. } => "MOVING_POLYGON_POINT",
            Mode::ResizingBox { .. } => "RESIZING_BOX",
            Mode::MovingRegion { .. } => "MOVING_REGION",
            Mode::MovingKeypoint { .. } => "MOVING_KEYPOINT",
            Mode::ResizingKeypoints { .. } => "RESIZING_KEYPOINTS",
            Mode::DrawingLine { .. } => "DRAWING_LINE",
            Mode::DrawingExpandingLine { .. } => "DRAWING_EXPANDING_LINE",
            Mode::SettingExpandingLineWidth { .. } => "SETTING_EXPANDING_LINE_WIDTH",
            Mode::CreatingPointLine { .. } => "CREATING_POINT_LINE",
        }
    }

    /// All region ids this gesture depends on.
    pub fn region_ids(&self) -> Vec<&str> {
        match self {
            Mode::Idle => Vec::new(),
            Mode::DrawingPolygon { region_id }
            | Mode::MovingPolygonPoint { region_id, .. }
            | Mode::ResizingBox { region_id, .. }
            | Mode::MovingRegion { region_id, .. }
            | Mode::MovingKeypoint { region_id, .. }
            | Mode::ResizingKeypoints { region_id, .. }
            | Mode::DrawingLine { region_id }
            | Mode::DrawingExpandingLine { region_id }
            | Mode::SettingExpandingLineWidth { region_id } => vec![region_id.as_str()],
            Mode::CreatingPointLine { region_ids } => {
                region_ids.iter().map(String::as_str).collect()
            }
        }
    }

    /// Check if this gesture depends on region `id`.
    pub fn references(&self, id: &str) -> bool {
        self.region_ids().contains(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_references_nothing() {
        assert!(Mode::Idle.region_ids().is_empty());
        assert!(!Mode::Idle.references("a"));
    }

    #[test]
    fn test_point_line_references_every_point() {
        let mode = Mode::CreatingPointLine {
            region_ids: vec!["a".to_string(), "b".to_string()],
        };
        assert!(mode.references("a"));
        assert!(mode.references("b"));
        assert!(!mode.references("c"));
    }

    #[test]
    fn test_mode_json_tag() {
        let mode = Mode::DrawingPolygon {
            region_id: "p1".to_string(),
        };
        let json = serde_json::to_value(&mode).expect("serialize mode");
        assert_eq!(json["mode"], "DRAWING_POLYGON");
        assert_eq!(json["regionId"], "p1");
    }
}
