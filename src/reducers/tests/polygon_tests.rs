//! Polygon drawing and editing.

use super::*;
use crate::model::{Point, Polygon, Tool};
use crate::state::Mode;

fn polygon_session() -> SessionState {
    let mut session = session_with(Vec::new());
    session.state.selected_tool = Tool::CreatePolygon;
    session
}

fn click(x: f32, y: f32) -> [Action; 2] {
    [Action::MouseDown { x, y }, mouse_up(x, y)]
}

fn polygon(session: &SessionState, id: &str) -> Polygon {
    match shape(session, id) {
        Some(Shape::Polygon(polygon)) => polygon,
        other => panic!("expected polygon {id}, got {other:?}"),
    }
}

#[test]
fn test_close_with_two_points_is_rejected() {
    let actions: Vec<Action> = [click(0.25, 0.25), click(0.75, 0.25)]
        .into_iter()
        .flatten()
        .collect();
    let session = run(polygon_session(), &actions);
    assert!(matches!(session.state.mode, Mode::DrawingPolygon { .. }));

    let session = run(
        session,
        &[Action::ClosePolygon {
            region_id: "region-1".to_string(),
        }],
    );
    assert!(matches!(session.state.mode, Mode::DrawingPolygon { .. }));
    let drawn = polygon(&session, "region-1");
    assert!(drawn.open);
    assert_eq!(drawn.points.len(), 2);
}

#[test]
fn test_close_with_three_points() {
    let actions: Vec<Action> = [click(0.25, 0.25), click(0.75, 0.25), click(0.5, 0.75)]
        .into_iter()
        .flatten()
        .chain([Action::ClosePolygon {
            region_id: "region-1".to_string(),
        }])
        .collect();
    let session = run(polygon_session(), &actions);

    assert!(session.state.mode.is_idle());
    assert!(!polygon(&session, "region-1").open);
}

#[test]
fn test_insert_point_mid_ring() {
    let actions: Vec<Action> = [click(0.25, 0.25), click(0.75, 0.25)]
        .into_iter()
        .flatten()
        .chain([Action::AddPolygonPoint {
            region_id: "region-1".to_string(),
            point: Point::new(0.5, 0.125),
            point_index: 1,
        }])
        .collect();
    let session = run(polygon_session(), &actions);

    assert!(matches!(session.state.mode, Mode::DrawingPolygon { .. }));
    assert_eq!(
        polygon(&session, "region-1").points,
        vec![
            Point::new(0.25, 0.25),
            Point::new(0.5, 0.125),
            Point::new(0.75, 0.25)
        ]
    );
}

#[test]
fn test_insert_point_index_is_clamped() {
    let session = run(
        session_with(fixture_regions()),
        &[Action::AddPolygonPoint {
            region_id: "g".to_string(),
            point: Point::new(0.5, 0.625),
            point_index: 99,
        }],
    );
    let edited = polygon(&session, "g");
    assert_eq!(edited.points.len(), 4);
    assert_eq!(edited.points.last(), Some(&Point::new(0.5, 0.625)));
}

#[test]
fn test_cancel_discards_unfinished_polygon() {
    let actions: Vec<Action> = [click(0.25, 0.25), click(0.75, 0.25)]
        .into_iter()
        .flatten()
        .chain([Action::Cancel])
        .collect();
    let session = run(polygon_session(), &actions);

    assert!(session.state.mode.is_idle());
    assert!(session.state.images[0].regions.is_empty());
}

#[test]
fn test_move_vertex_touches_only_that_vertex() {
    let session = run(
        session_with(fixture_regions()),
        &[
            Action::BeginMovePolygonPoint {
                region_id: "g".to_string(),
                point_index: 2,
            },
            mouse_move(0.625, 0.875),
            mouse_up(0.625, 0.875),
        ],
    );
    assert!(session.state.mode.is_idle());
    assert_eq!(
        polygon(&session, "g").points,
        vec![
            Point::new(0.5, 0.5),
            Point::new(0.75, 0.5),
            Point::new(0.625, 0.875)
        ]
    );
}

#[test]
fn test_cancel_vertex_move_restores_polygon() {
    let initial = session_with(fixture_regions());
    let session = run(
        initial.clone(),
        &[
            Action::BeginMovePolygonPoint {
                region_id: "g".to_string(),
                point_index: 0,
            },
            mouse_move(0.0, 0.0),
            Action::Cancel,
        ],
    );
    assert_eq!(shape(&session, "g"), shape(&initial, "g"));
}
