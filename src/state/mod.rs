//! Session state: editor state, gestures, and active-image resolution.

mod active_image;
mod editor;
mod mode;

pub use active_image::{ActiveImage, active_image, active_image_mut};
pub use editor::{EditorOptions, EditorState};
pub use mode::Mode;
