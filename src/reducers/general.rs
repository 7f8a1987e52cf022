//! General reducer: tool and class selection, image navigation and labels,
//! header chrome toggles.
//!
//! Never touches the gesture mode or region geometry of the active image.

use std::sync::Arc;

use crate::action::{Action, HeaderButton};
use crate::config::ClsEntry;
use crate::model::{BoundingBox, PixelSize, Tool};
use crate::state::{EditorState, active_image, active_image_mut};

/// Apply a non-geometry action. Actions this reducer does not handle pass
/// through unchanged.
pub fn reduce(state: EditorState, action: &Action) -> EditorState {
    match action {
        Action::SelectTool { tool } => select_tool(state, *tool),
        Action::SelectClassification { cls } => {
            let mut state = state;
            state.selected_cls = Some(cls.clone());
            state
        }
        Action::OnClsAdded { cls } => add_cls(state, cls),
        Action::SelectImage { image_index } => select_image(state, *image_index),
        Action::ImageLoaded {
            natural_width,
            natural_height,
        } => {
            let mut state = state;
            let size = PixelSize {
                w: *natural_width,
                h: *natural_height,
            };
            if active_image(&state).image.and_then(|img| img.pixel_size) != Some(size) {
                if let Some(image) = active_image_mut(&mut state) {
                    image.pixel_size = Some(size);
                }
            }
            state
        }
        Action::ChangeImage { delta } => {
            let mut state = state;
            if let Some(image) = active_image_mut(&mut state) {
                if let Some(cls) = &delta.cls {
                    image.cls = Some(cls.clone());
                }
                if let Some(tags) = &delta.tags {
                    image.tags = tags.clone();
                }
            }
            state
        }
        Action::HeaderButtonClicked { button_name } => match HeaderButton::parse(button_name) {
            Some(button) => header_button(state, button),
            None => {
                log::debug!("Ignoring unknown header button '{}'", button_name);
                state
            }
        },
        _ => state,
    }
}

fn select_tool(mut state: EditorState, tool: Tool) -> EditorState {
    match tool {
        Tool::ShowTags => {
            state.show_tags = !state.show_tags;
            return state;
        }
        Tool::ShowMask => {
            state.show_mask = !state.show_mask;
            return state;
        }
        _ => {}
    }

    if !state.options.enabled_tools.contains(&tool) {
        log::debug!("Tool '{}' is not enabled, ignoring", tool.name());
        return state;
    }

    if tool == Tool::ModifyAllowedArea && state.allowed_area.is_none() {
        state.allowed_area = Some(BoundingBox::full_frame());
    }

    log::debug!("🔧 Tool: {}", tool.name());
    state.selected_tool = tool;
    state
}

fn add_cls(mut state: EditorState, cls: &str) -> EditorState {
    if state
        .options
        .region_cls_list
        .iter()
        .any(|entry| entry.id() == cls)
    {
        return state;
    }
    Arc::make_mut(&mut state.options)
        .region_cls_list
        .push(ClsEntry::Name(cls.to_string()));
    log::debug!("🏷️ Added class '{}'", cls);
    state
}

fn select_image(mut state: EditorState, index: usize) -> EditorState {
    if index >= state.images.len() {
        log::warn!(
            "Image index {} out of range ({} images)",
            index,
            state.images.len()
        );
        return state;
    }
    state.selected_image = Some(index);
    state
}

fn header_button(mut state: EditorState, button: HeaderButton) -> EditorState {
    match button {
        HeaderButton::Next => step_image(state, 1),
        HeaderButton::Prev => step_image(state, -1),
        HeaderButton::Clone => clone_to_next(state),
        HeaderButton::Settings => {
            state.settings_open = !state.settings_open;
            state
        }
        HeaderButton::Fullscreen => {
            state.full_screen = true;
            state
        }
        HeaderButton::Window => {
            state.full_screen = false;
            state
        }
        // Terminal buttons are routed to the host before reaching the pipeline.
        HeaderButton::Exit | HeaderButton::Done | HeaderButton::Save | HeaderButton::Complete => {
            state
        }
    }
}

fn step_image(state: EditorState, delta: isize) -> EditorState {
    let Some(current) = active_image(&state).index else {
        return state;
    };
    match current.checked_add_signed(delta) {
        Some(next) if next < state.images.len() => select_image(state, next),
        _ => state,
    }
}

/// Copy the active image's regions onto the next image and move to it.
fn clone_to_next(mut state: EditorState) -> EditorState {
    let active = active_image(&state);
    let (Some(current), Some(image)) = (active.index, active.image) else {
        return state;
    };
    let next = current + 1;
    if next >= state.images.len() {
        return state;
    }

    let regions = image.regions.clone();
    Arc::make_mut(&mut state.images[next]).regions = regions;
    log::debug!("📋 Cloned regions of image {} onto image {}", current, next);
    select_image(state, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::model::{Image, ImageDelta, Point, Region, Shape};

    fn state_with_images(n: usize) -> EditorState {
        let images = (0..n)
            .map(|i| Image::new(format!("{i}.png"), format!("img{i}")))
            .collect();
        EditorState::from_config(&SessionConfig::with_images(images))
    }

    fn header(name: &str) -> Action {
        Action::HeaderButtonClicked {
            button_name: name.to_string(),
        }
    }

    #[test]
    fn test_select_tool() {
        let state = state_with_images(1);
        let state = reduce(
            state,
            &Action::SelectTool {
                tool: Tool::CreatePolygon,
            },
        );
        assert_eq!(state.selected_tool, Tool::CreatePolygon);
    }

    #[test]
    fn test_disabled_tool_is_ignored() {
        let state = state_with_images(1);
        let state = reduce(
            state,
            &Action::SelectTool {
                tool: Tool::CreateKeypoints,
            },
        );
        assert_eq!(state.selected_tool, Tool::CreateBox);
    }

    #[test]
    fn test_toggle_tools_flip_flags() {
        let state = state_with_images(1);
        let state = reduce(state, &Action::SelectTool { tool: Tool::ShowMask });
        assert!(!state.show_mask);
        assert_eq!(state.selected_tool, Tool::CreateBox);
        let state = reduce(state, &Action::SelectTool { tool: Tool::ShowTags });
        assert!(!state.show_tags);
    }

    #[test]
    fn test_modify_allowed_area_initializes_full_frame() {
        let mut state = state_with_images(1);
        Arc::make_mut(&mut state.options)
            .enabled_tools
            .push(Tool::ModifyAllowedArea);
        let state = reduce(
            state,
            &Action::SelectTool {
                tool: Tool::ModifyAllowedArea,
            },
        );
        assert_eq!(state.allowed_area, Some(BoundingBox::full_frame()));
    }

    #[test]
    fn test_cls_added_once() {
        let state = state_with_images(1);
        let add = Action::OnClsAdded {
            cls: "cat".to_string(),
        };
        let state = reduce(state, &add);
        let state = reduce(state, &add);
        assert_eq!(state.options.region_cls_list.len(), 1);
    }

    #[test]
    fn test_select_classification() {
        let state = reduce(
            state_with_images(1),
            &Action::SelectClassification {
                cls: "dog".to_string(),
            },
        );
        assert_eq!(state.selected_cls.as_deref(), Some("dog"));
    }

    #[test]
    fn test_next_prev_stay_in_bounds() {
        let state = state_with_images(2);
        let state = reduce(state, &header("Prev"));
        assert_eq!(state.selected_image, Some(0));
        let state = reduce(state, &header("Next"));
        assert_eq!(state.selected_image, Some(1));
        let state = reduce(state, &header("Next"));
        assert_eq!(state.selected_image, Some(1));
    }

    #[test]
    fn test_select_image_out_of_range_ignored() {
        let state = reduce(state_with_images(2), &Action::SelectImage { image_index: 5 });
        assert_eq!(state.selected_image, Some(0));
    }

    #[test]
    fn test_clone_copies_regions_to_next_image() {
        let mut state = state_with_images(2);
        if let Some(image) = active_image_mut(&mut state) {
            image
                .regions
                .upsert(Region::new("p", Shape::Point(Point::new(0.5, 0.5))));
        }
        let state = reduce(state, &header("Clone"));
        assert_eq!(state.selected_image, Some(1));
        assert!(state.images[1].regions.contains("p"));
    }

    #[test]
    fn test_chrome_toggles() {
        let state = reduce(state_with_images(1), &header("Settings"));
        assert!(state.settings_open);
        let state = reduce(state, &header("Fullscreen"));
        assert!(state.full_screen);
        let state = reduce(state, &header("Window"));
        assert!(!state.full_screen);
    }

    #[test]
    fn test_image_labels_and_size() {
        let state = reduce(
            state_with_images(1),
            &Action::ChangeImage {
                delta: ImageDelta {
                    cls: Some("indoor".to_string()),
                    tags: Some(vec!["dark".to_string()]),
                },
            },
        );
        let state = reduce(
            state,
            &Action::ImageLoaded {
                natural_width: 640,
                natural_height: 480,
            },
        );
        let image = &state.images[0];
        assert_eq!(image.cls.as_deref(), Some("indoor"));
        assert_eq!(image.tags, vec!["dark".to_string()]);
        assert_eq!(image.pixel_size, Some(PixelSize { w: 640, h: 480 }));
    }

    #[test]
    fn test_unhandled_actions_pass_through() {
        let state = state_with_images(1);
        let next = reduce(state.clone(), &Action::MouseMove { x: 0.5, y: 0.5 });
        assert_eq!(next, state);
        let next = reduce(state.clone(), &header("Hotkeys"));
        assert_eq!(next, state);
    }
}
