//! Reducers: pure `(state, action) -> state` transitions.
//!
//! The editor pipeline is [`general`] followed by [`interaction`], composed by
//! [`combine`] and wrapped with undo history by [`history`].

pub mod combine;
pub mod general;
pub mod history;
pub mod interaction;

#[cfg(test)]
mod tests;

pub use combine::{
    Combined, EditorReducer, ReduceFn, Reducer, combine_reducers, editor_reducer,
};
pub use history::{History, HistoryEntry, HistoryHandler, SessionState};
