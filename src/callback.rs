//! Host callback wrapper.
//!
//! Terminal callbacks are optional: a host registers only the ones it cares
//! about. `HostCallback` wraps `Option<Box<dyn FnMut(EditorState)>>` so the
//! session can call them without matching on the option everywhere.

use std::fmt;

use crate::state::EditorState;

/// An optional host handler that receives a copy of the editor state.
pub struct HostCallback {
    f: Option<Box<dyn FnMut(EditorState)>>,
}

impl HostCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(EditorState) + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty callback (no handler).
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the handler with `state`, if one is registered.
    ///
    /// Returns whether a handler ran.
    pub fn call(&mut self, state: EditorState) -> bool {
        match self.f.as_mut() {
            Some(f) => {
                f(state);
                true
            }
            None => false,
        }
    }

    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }
}

impl Default for HostCallback {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for HostCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostCallback")
            .field("set", &self.is_some())
            .finish()
    }
}

/// The terminal callbacks of a session.
#[derive(Debug, Default)]
pub struct HostCallbacks {
    /// Exit, Done, Save and Complete
    pub on_exit: HostCallback,
    pub on_next_image: HostCallback,
    pub on_prev_image: HostCallback,
}
