//! The host-facing editing session.
//!
//! [`Annotator`] owns the editor state and its history, runs every action
//! through the history-wrapped pipeline, and routes terminal header buttons
//! to the host instead.

use crate::action::{Action, HeaderButton};
use crate::callback::{HostCallback, HostCallbacks};
use crate::config::SessionConfig;
use crate::constants::MISSING_IMAGES_PLACEHOLDER;
use crate::error::ConfigError;
use crate::reducers::{EditorReducer, History, HistoryHandler, SessionState, editor_reducer};
use crate::state::EditorState;

/// One annotation session.
#[derive(Debug)]
pub struct Annotator {
    session: SessionState,
    handler: HistoryHandler<EditorReducer>,
    callbacks: HostCallbacks,
    images_missing: bool,
    debug: bool,
}

impl Annotator {
    /// Start a session from `config` as given.
    pub fn new(config: &SessionConfig) -> Self {
        log::info!(
            "🖼️ Annotator started with {} images",
            config.images.as_ref().map_or(0, Vec::len)
        );
        Self {
            session: SessionState::new(
                EditorState::from_config(config),
                History::with_config(config.history),
            ),
            handler: HistoryHandler::new(editor_reducer()),
            callbacks: HostCallbacks::default(),
            images_missing: config.images.is_none(),
            debug: config.debug,
        }
    }

    /// Start a session after checking `config`.
    pub fn try_new(config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn with_callbacks(mut self, callbacks: HostCallbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn on_exit<F>(mut self, f: F) -> Self
    where
        F: FnMut(EditorState) + 'static,
    {
        self.callbacks.on_exit = HostCallback::new(f);
        self
    }

    pub fn on_next_image<F>(mut self, f: F) -> Self
    where
        F: FnMut(EditorState) + 'static,
    {
        self.callbacks.on_next_image = HostCallback::new(f);
        self
    }

    pub fn on_prev_image<F>(mut self, f: F) -> Self
    where
        F: FnMut(EditorState) + 'static,
    {
        self.callbacks.on_prev_image = HostCallback::new(f);
        self
    }

    /// Text to show instead of the editor when the host passed no images.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.images_missing.then_some(MISSING_IMAGES_PLACEHOLDER)
    }

    pub fn state(&self) -> &EditorState {
        &self.session.state
    }

    pub fn history(&self) -> &History {
        &self.session.history
    }

    /// Consume the session, returning its final state.
    pub fn into_state(self) -> EditorState {
        self.session.state
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: &Action) {
        if self.debug {
            log::info!("🎬 {} {:?}", action.name(), action);
        }

        if let Action::HeaderButtonClicked { button_name } = action {
            if let Some(button) = HeaderButton::parse(button_name) {
                if self.route_to_host(button) {
                    return;
                }
            }
        }

        let session = std::mem::take(&mut self.session);
        self.session = self.handler.reduce(session, action);

        if self.debug {
            log::info!("🎬 mode now {}", self.session.state.mode.name());
        }
    }

    /// Hand a terminal button to the host. Returns false if the action should
    /// go through the pipeline instead.
    fn route_to_host(&mut self, button: HeaderButton) -> bool {
        let callback = match button {
            b if b.is_exit() => {
                log::debug!("🚪 {:?}: handing state to the host", button);
                let state = self.session.state.clone();
                self.callbacks.on_exit.call(state);
                return true;
            }
            HeaderButton::Next => &mut self.callbacks.on_next_image,
            HeaderButton::Prev => &mut self.callbacks.on_prev_image,
            _ => return false,
        };
        if !callback.is_some() {
            return false;
        }
        log::debug!("➡️ {:?}: handing state to the host", button);
        callback.call(self.session.state.clone())
    }
}
