//! Region annotator core
//!
//! The state machine behind an image annotation editor: users draw and edit
//! points, boxes, polygons, lines, expanding lines and keypoint skeletons
//! over a sequence of images. Every change is requested through an
//! [`Action`] and applied by pure reducers; an [`Annotator`] session keeps
//! the live state plus a bounded undo history and hands terminal events to
//! the host.

pub mod action;
pub mod callback;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod reducers;
pub mod session;
pub mod state;

pub use action::{Action, HeaderButton};
pub use callback::{HostCallback, HostCallbacks};
pub use config::{LogLevel, SessionConfig};
pub use error::ConfigError;
pub use model::{Image, Region, Shape};
pub use reducers::{History, HistoryHandler, Reducer, SessionState, editor_reducer};
pub use session::Annotator;
pub use state::{EditorState, Mode, active_image};
