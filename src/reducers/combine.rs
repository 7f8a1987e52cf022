//! Composition of reducers into one `(state, action) -> state` function.

use crate::action::Action;
use crate::state::EditorState;

/// A pure state transition over [`EditorState`].
pub trait Reducer {
    fn reduce(&self, state: EditorState, action: &Action) -> EditorState;
}

impl<F> Reducer for F
where
    F: Fn(EditorState, &Action) -> EditorState,
{
    fn reduce(&self, state: EditorState, action: &Action) -> EditorState {
        self(state, action)
    }
}

/// Runs `first`, then feeds its result to `second`.
#[derive(Debug, Clone, Copy)]
pub struct Combined<A, B> {
    first: A,
    second: B,
}

impl<A: Reducer, B: Reducer> Reducer for Combined<A, B> {
    fn reduce(&self, state: EditorState, action: &Action) -> EditorState {
        let state = self.first.reduce(state, action);
        self.second.reduce(state, action)
    }
}

/// Combine two reducers; the order is significant and fixed.
pub fn combine_reducers<A: Reducer, B: Reducer>(first: A, second: B) -> Combined<A, B> {
    Combined { first, second }
}

/// Signature of the editor's reducer functions.
pub type ReduceFn = fn(EditorState, &Action) -> EditorState;

/// The editor pipeline type.
pub type EditorReducer = Combined<ReduceFn, ReduceFn>;

/// The editor pipeline: general reducer first, then the interaction state machine.
///
/// The state machine running last means it sees tool and image changes made in
/// the same pass, and can drop a gesture whose region is no longer active.
pub fn editor_reducer() -> EditorReducer {
    combine_reducers(
        super::general::reduce as ReduceFn,
        super::interaction::reduce as ReduceFn,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark_settings(mut state: EditorState, _: &Action) -> EditorState {
        state.settings_open = !state.settings_open;
        state
    }

    fn mark_fullscreen_if_settings(mut state: EditorState, _: &Action) -> EditorState {
        state.full_screen = state.settings_open;
        state
    }

    #[test]
    fn test_combined_runs_in_order() {
        let reducer = combine_reducers(mark_settings, mark_fullscreen_if_settings);
        let state = reducer.reduce(EditorState::default(), &Action::Cancel);
        assert!(state.settings_open);
        assert!(state.full_screen);

        let reversed = combine_reducers(mark_fullscreen_if_settings, mark_settings);
        let state = reversed.reduce(EditorState::default(), &Action::Cancel);
        assert!(state.settings_open);
        assert!(!state.full_screen);
    }

    #[test]
    fn test_editor_reducer_passes_unrelated_actions_through() {
        let state = EditorState::default();
        let next = editor_reducer().reduce(state.clone(), &Action::DeleteSelectedRegion);
        assert_eq!(next, state);
    }
}
