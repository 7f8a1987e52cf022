//! Drag geometry depends only on the gesture start and the latest pointer
//! position, so dropping intermediate moves never changes the outcome.

use proptest::prelude::*;

use super::*;
use crate::model::Tool;

/// A state with a gesture in progress, by index into the fixture gestures
/// plus the drawing tools.
fn started(gesture: usize) -> EditorState {
    let starts = fixture_gesture_starts();
    let session = session_with(fixture_regions());
    match starts.get(gesture) {
        Some(start) => run_state(session.state, std::slice::from_ref(start)),
        None => {
            let tools = [Tool::CreateBox, Tool::CreateLine, Tool::CreateExpandingLine];
            let mut state = session.state;
            state.selected_tool = tools[(gesture - starts.len()) % tools.len()];
            run_state(state, &[Action::MouseDown { x: 0.5, y: 0.5 }])
        }
    }
}

fn coord() -> impl Strategy<Value = f32> {
    (0u32..=1000).prop_map(|n| n as f32 / 1000.0)
}

proptest! {
    #[test]
    fn final_move_alone_gives_same_geometry(
        gesture in 0usize..11,
        path in prop::collection::vec((coord(), coord()), 0..12),
        last in (coord(), coord()),
    ) {
        let start = started(gesture);
        prop_assert!(!start.mode.is_idle());

        let full: Vec<Action> = path
            .iter()
            .chain(std::iter::once(&last))
            .map(|&(x, y)| mouse_move(x, y))
            .collect();
        let replayed = run_state(start.clone(), &full);
        let coalesced = run_state(start, &[mouse_move(last.0, last.1)]);

        prop_assert_eq!(replayed, coalesced);
    }

    #[test]
    fn boxes_never_have_negative_size(
        directions in (-1i8..=1, -1i8..=1),
        path in prop::collection::vec((coord(), coord()), 1..8),
    ) {
        let region = fixture_regions().remove(0);
        let start = run_state(
            session_with(fixture_regions()).state,
            &[Action::BeginBoxTransform {
                region,
                directions: [directions.0, directions.1],
            }],
        );
        let moves: Vec<Action> = path.iter().map(|&(x, y)| mouse_move(x, y)).collect();
        let state = run_state(start, &moves);

        match state.images[0].regions.get("b").map(|r| r.shape.clone()) {
            Some(Shape::Box(bbox)) => {
                prop_assert!(bbox.w >= 0.0);
                prop_assert!(bbox.h >= 0.0);
            }
            other => prop_assert!(false, "expected a box, got {:?}", other),
        }
    }
}
