//! End-to-end tests for the editor pipeline.
//!
//! These drive the full history-wrapped reducer with action sequences and
//! check the gesture, deletion and history laws the editor guarantees.

mod coalescing_tests;
mod polygon_tests;

use crate::action::Action;
use crate::config::SessionConfig;
use crate::model::{Image, Region, Shape};
use crate::state::EditorState;

use super::{HistoryHandler, Reducer, SessionState, editor_reducer};

/// A session over one image holding `regions`.
fn session_with(regions: Vec<Region>) -> SessionState {
    let mut image = Image::new("scene.png", "scene");
    for region in regions {
        image.regions.upsert(region);
    }
    let config = SessionConfig::with_images(vec![image]);
    SessionState::new(
        EditorState::from_config(&config),
        super::History::with_config(config.history),
    )
}

/// Run `actions` through the history-wrapped pipeline.
fn run(session: SessionState, actions: &[Action]) -> SessionState {
    let handler = HistoryHandler::new(editor_reducer());
    actions
        .iter()
        .fold(session, |session, action| handler.reduce(session, action))
}

/// Run `actions` through the pipeline without history.
fn run_state(state: EditorState, actions: &[Action]) -> EditorState {
    let reducer = editor_reducer();
    actions
        .iter()
        .fold(state, |state, action| reducer.reduce(state, action))
}

fn shape(session: &SessionState, id: &str) -> Option<Shape> {
    session
        .state
        .images
        .first()
        .and_then(|image| image.regions.get(id))
        .map(|region| region.shape.clone())
}

fn mouse_move(x: f32, y: f32) -> Action {
    Action::MouseMove { x, y }
}

fn mouse_up(x: f32, y: f32) -> Action {
    Action::MouseUp { x, y }
}

/// One region of every draggable kind: box `b`, point `p`, polygon `g` and
/// skeleton `k`.
fn fixture_regions() -> Vec<Region> {
    use std::collections::BTreeMap;

    use crate::model::{BoundingBox, Keypoints, Point, Polygon};

    let polygon = Polygon {
        points: vec![
            Point::new(0.5, 0.5),
            Point::new(0.75, 0.5),
            Point::new(0.625, 0.75),
        ],
        open: false,
    };
    let mut landmarks = BTreeMap::new();
    landmarks.insert("head".to_string(), Point::new(0.25, 0.625));
    landmarks.insert("tail".to_string(), Point::new(0.25, 0.875));

    vec![
        Region::new("b", Shape::Box(BoundingBox::new(0.125, 0.125, 0.25, 0.25))),
        Region::new("p", Shape::Point(Point::new(0.875, 0.125))),
        Region::new("g", Shape::Polygon(polygon)),
        Region::new(
            "k",
            Shape::Keypoints(Keypoints {
                keypoints_definition_id: "pose".to_string(),
                points: landmarks,
            }),
        ),
    ]
}

/// Every gesture start over [`fixture_regions`].
fn fixture_gesture_starts() -> Vec<Action> {
    let box_region = fixture_regions().remove(0);
    vec![
        Action::BeginBoxTransform {
            region: box_region.clone(),
            directions: [1, 1],
        },
        Action::BeginBoxTransform {
            region: box_region.clone(),
            directions: [-1, 0],
        },
        Action::BeginBoxTransform {
            region: box_region,
            directions: [0, 0],
        },
        Action::BeginMovePoint {
            region_id: "p".to_string(),
        },
        Action::BeginMoveRegion {
            region_id: "g".to_string(),
        },
        Action::BeginMovePolygonPoint {
            region_id: "g".to_string(),
            point_index: 1,
        },
        Action::BeginMoveKeypoint {
            region_id: "k".to_string(),
            keypoint_id: "head".to_string(),
        },
        Action::ResizeKeypoints {
            region_id: "k".to_string(),
        },
    ]
}
