//! Undo history for editing sessions.
//!
//! The history wrapper snapshots the state before each recorded action and
//! keeps a bounded log of those snapshots. Restoring an entry brings its
//! snapshot back and drops that entry and everything after it; there is no
//! redo.

use std::sync::Arc;

use web_time::SystemTime;

use super::combine::Reducer;
use crate::action::Action;
use crate::config::HistoryConfig;
use crate::state::EditorState;

// ============================================================================
// History Log
// ============================================================================

/// A named snapshot of the state as it was before an action.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    /// When the snapshot was taken
    pub time: SystemTime,
    /// The state before the action. Shares unchanged images with later states.
    pub state: Arc<EditorState>,
    /// Type label of the action that followed the snapshot
    pub name: String,
}

impl HistoryEntry {
    pub fn new(name: impl Into<String>, state: EditorState) -> Self {
        Self {
            time: SystemTime::now(),
            state: Arc::new(state),
            name: name.into(),
        }
    }
}

/// Bounded log of history entries, newest last.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    config: HistoryConfig,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Append an entry, dropping the oldest ones beyond the configured limit.
    pub fn push(&mut self, entry: HistoryEntry) {
        log::debug!("📝 History: pushed '{}'", entry.name);
        self.entries.push(entry);

        // Limit history size
        let excess = self.entries.len().saturating_sub(self.config.max_entries);
        if excess > 0 {
            self.entries.drain(..excess);
        }
    }

    /// Take the snapshot at `index` (the newest when `None`) and truncate the
    /// log to the entries before it. Returns `None`, leaving the log
    /// untouched, if there is no such entry.
    pub fn restore(&mut self, index: Option<usize>) -> Option<Arc<EditorState>> {
        let index = match index {
            Some(index) if index < self.entries.len() => index,
            Some(_) => return None,
            None => self.entries.len().checked_sub(1)?,
        };
        let entry = self.entries.drain(index..).next()?;
        log::debug!("⏪ History: restored '{}' (entry {})", entry.name, index);
        Some(entry.state)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// The newest entry.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
        log::debug!("🗑️ History cleared");
    }
}

// ============================================================================
// History Wrapper
// ============================================================================

/// Live editor state plus its undo history.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub state: EditorState,
    pub history: History,
}

impl SessionState {
    pub fn new(state: EditorState, history: History) -> Self {
        Self { state, history }
    }
}

/// Wraps a reducer with undo history.
///
/// `RESTORE_HISTORY` is handled here and never reaches the wrapped reducer.
/// Any other action is passed on, and the pre-action state is logged when
/// the action changed something. Pointer moves are only logged when
/// [`HistoryConfig::record_pointer_moves`] is set.
#[derive(Debug, Clone)]
pub struct HistoryHandler<R> {
    inner: R,
}

impl<R: Reducer> HistoryHandler<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn reduce(&self, session: SessionState, action: &Action) -> SessionState {
        let SessionState { state, mut history } = session;

        if let Action::RestoreHistory { index } = action {
            return match history.restore(*index) {
                Some(snapshot) => SessionState {
                    state: Arc::unwrap_or_clone(snapshot),
                    history,
                },
                None => {
                    log::debug!("Nothing to restore at {:?}", index);
                    SessionState { state, history }
                }
            };
        }

        let before = state.clone();
        let state = self.inner.reduce(state, action);

        let recordable = history.config.record_pointer_moves || !action.is_pointer_move();
        if recordable && edited(&before, &state) {
            history.push(HistoryEntry::new(action.name(), before));
        }
        SessionState { state, history }
    }
}

/// Check if `after` differs from `before` in anything worth an undo step.
///
/// The pointer press position alone does not count. Images and options
/// still shared with `before` are skipped without comparing contents.
fn edited(before: &EditorState, after: &EditorState) -> bool {
    let EditorState {
        images,
        selected_image,
        selected_tool,
        selected_cls,
        mode,
        allowed_area,
        mouse_down_at: _,
        show_tags,
        show_mask,
        settings_open,
        full_screen,
        options,
        next_region_seq,
    } = before;

    let images_changed = images.len() != after.images.len()
        || images
            .iter()
            .zip(&after.images)
            .any(|(old, new)| !Arc::ptr_eq(old, new) && old != new);
    let options_changed = !Arc::ptr_eq(options, &after.options) && *options != after.options;

    images_changed
        || options_changed
        || *selected_image != after.selected_image
        || *selected_tool != after.selected_tool
        || *selected_cls != after.selected_cls
        || *mode != after.mode
        || *allowed_area != after.allowed_area
        || *show_tags != after.show_tags
        || *show_mask != after.show_mask
        || *settings_open != after.settings_open
        || *full_screen != after.full_screen
        || *next_region_seq != after.next_region_seq
}
