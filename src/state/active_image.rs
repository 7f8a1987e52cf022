//! Resolves which image is currently being edited.

use std::sync::Arc;

use super::editor::EditorState;
use crate::model::Image;

/// The image targeted by editing operations.
///
/// Both fields are `None` when no image is selected or the selection points
/// past the end of the image list.
#[derive(Debug, Clone, Copy)]
pub struct ActiveImage<'a> {
    pub index: Option<usize>,
    pub image: Option<&'a Arc<Image>>,
}

/// Resolve the active image of `state`. Never fails; an invalid selection is
/// reported as no active image.
pub fn active_image(state: &EditorState) -> ActiveImage<'_> {
    match state
        .selected_image
        .and_then(|index| state.images.get(index).map(|image| (index, image)))
    {
        Some((index, image)) => ActiveImage {
            index: Some(index),
            image: Some(image),
        },
        None => ActiveImage {
            index: None,
            image: None,
        },
    }
}

/// Mutable access to the active image, copying it first if a snapshot shares it.
pub fn active_image_mut(state: &mut EditorState) -> Option<&mut Image> {
    let index = active_image(state).index?;
    state.images.get_mut(index).map(Arc::make_mut)
}
