//! The interaction state machine.
//!
//! Interprets pointer and region actions against the current [`Mode`] and
//! applies the resulting region mutations to the active image. Drag geometry
//! is always recomputed from the data captured when the gesture started plus
//! the latest pointer position, so dropped or coalesced moves cannot skew it.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::action::Action;
use crate::constants::{
    EXPANDING_LINE_FINISH_THRESHOLD, KEYPOINTS_REFERENCE_RADIUS, MIN_BOX_SIZE,
    POINT_LINE_FINISH_THRESHOLD, POLYGON_CLOSE_THRESHOLD,
};
use crate::model::{
    BoundingBox, ExpandingLine, ExpandingLinePoint, Image, Keypoints, Line, Point, Polygon,
    Region, RegionId, Shape, Tool, scale_landmarks,
};
use crate::state::{EditorState, Mode, active_image, active_image_mut};

const UNBOUNDED: (f32, f32) = (f32::NEG_INFINITY, f32::INFINITY);

/// Apply a pointer, gesture or region action. Other actions pass through.
///
/// After every pass a mode whose region is gone from the active image is
/// reset to [`Mode::Idle`].
pub fn reduce(state: EditorState, action: &Action) -> EditorState {
    let state = match action {
        Action::MouseDown { x, y } => mouse_down(state, Point::new(*x, *y)),
        Action::MouseMove { x, y } => mouse_move(state, Point::new(*x, *y)),
        Action::MouseUp { .. } => mouse_up(state),
        Action::Cancel => cancel(state),

        Action::BeginBoxTransform { region, directions } => {
            begin_box_transform(state, region, *directions)
        }
        Action::BeginMovePoint { region_id } => begin_move_point(state, region_id),
        Action::BeginMoveRegion { region_id } => begin_move_region(state, region_id),
        Action::BeginMovePolygonPoint {
            region_id,
            point_index,
        } => begin_move_polygon_point(state, region_id, *point_index),
        Action::BeginMoveKeypoint {
            region_id,
            keypoint_id,
        } => begin_move_keypoint(state, region_id, keypoint_id),
        Action::ResizeKeypoints { region_id } => begin_resize_keypoints(state, region_id),

        Action::AddPolygonPoint {
            region_id,
            point,
            point_index,
        } => add_polygon_point(state, region_id, *point, *point_index),
        Action::ClosePolygon { region_id } => close_polygon(state, region_id),

        Action::SelectRegion { region_id } => select_region(state, region_id),
        Action::ChangeRegion { region } => change_region(state, region),
        Action::DeleteRegion { region_id } => delete_region(state, region_id),
        Action::DeleteSelectedRegion => delete_selected_regions(state),
        Action::OpenRegionEditor { region_id } => set_editing_labels(state, region_id, true),
        Action::CloseRegionEditor { region_id } => set_editing_labels(state, region_id, false),

        _ => state,
    };
    reconcile_mode(state)
}

// ============================================================================
// Region access
// ============================================================================

fn region_of<'a>(state: &'a EditorState, id: &str) -> Option<&'a Arc<Region>> {
    active_image(state)
        .image
        .and_then(|image| image.regions.get(id))
}

fn shape_of(state: &EditorState, id: &str) -> Option<Shape> {
    region_of(state, id).map(|region| region.shape.clone())
}

/// Replace the shape of region `id`, leaving shared snapshots alone when the
/// shape is unchanged.
fn set_shape(state: &mut EditorState, id: &str, shape: Shape) {
    if region_of(state, id).is_none_or(|region| region.shape == shape) {
        return;
    }
    if let Some(slot) = active_image_mut(state).and_then(|image| image.regions.get_mut(id)) {
        Arc::make_mut(slot).shape = shape;
    }
}

/// Put the geometry of a captured region back. Label edits made since are kept.
fn restore_shape(state: &mut EditorState, before: &Region) {
    set_shape(state, &before.id, before.shape.clone());
}

fn remove_region(state: &mut EditorState, id: &str) -> bool {
    if region_of(state, id).is_none() {
        return false;
    }
    active_image_mut(state).is_some_and(|image| image.regions.remove(id).is_some())
}

/// Drop highlight and label editing from every region of `image`.
fn clear_selection(image: &mut Image) {
    image.regions.update_each(|region| {
        (region.highlighted || region.editing_labels).then(|| Region {
            highlighted: false,
            editing_labels: false,
            ..region.clone()
        })
    });
}

/// Add an editor-created region on top of the active image and select it.
fn insert_new_region(state: &mut EditorState, shape: Shape) -> Option<RegionId> {
    active_image(state).image?;
    let id = state.allocate_region_id();
    let region = Region::new(id.clone(), shape)
        .with_cls(state.selected_cls.clone())
        .with_color(Some(state.color_for_cls(state.selected_cls.as_deref())))
        .highlighted();

    let image = active_image_mut(state)?;
    clear_selection(image);
    image.regions.upsert(region);
    log::debug!("➕ Created {}", id);
    Some(id)
}

// ============================================================================
// Pointer
// ============================================================================

fn mouse_down(mut state: EditorState, at: Point) -> EditorState {
    state.mouse_down_at = Some(at);
    if active_image(&state).image.is_none() {
        return state;
    }

    match state.mode.clone() {
        Mode::Idle => start_region(state, at),
        Mode::DrawingPolygon { region_id } => polygon_click(state, &region_id, at),
        Mode::DrawingLine { region_id } => {
            if let Some(Shape::Line(line)) = shape_of(&state, &region_id) {
                let finished = Line {
                    x2: at.x,
                    y2: at.y,
                    ..line
                };
                set_shape(&mut state, &region_id, Shape::Line(finished));
            }
            log::debug!("📏 Line {} finished", region_id);
            state.mode = Mode::Idle;
            state
        }
        Mode::DrawingExpandingLine { region_id } => expanding_line_click(state, region_id, at),
        Mode::SettingExpandingLineWidth { region_id } => {
            log::debug!("📏 Expanding line {} finished", region_id);
            state.mode = Mode::Idle;
            state
        }
        Mode::CreatingPointLine { region_ids } => point_line_click(state, region_ids, at),
        Mode::MovingPolygonPoint { .. }
        | Mode::ResizingBox { .. }
        | Mode::MovingRegion { .. }
        | Mode::MovingKeypoint { .. }
        | Mode::ResizingKeypoints { .. } => state,
    }
}

/// Create a region with the selected tool at `at`.
fn start_region(mut state: EditorState, at: Point) -> EditorState {
    let tool = state.selected_tool;
    if !tool.is_drawing_tool() {
        return state;
    }
    if !state.in_allowed_area(&at) {
        log::debug!("Ignoring {} outside the allowed area", tool.name());
        return state;
    }

    // Keypoint landmarks start collapsed on the cursor and spread out as it moves.
    let mut landmarks = BTreeMap::new();
    let shape = match tool {
        Tool::CreatePoint | Tool::CreatePointLine => Shape::Point(at),
        Tool::CreateBox => Shape::Box(BoundingBox::new(at.x, at.y, 0.0, 0.0)),
        Tool::CreatePolygon => Shape::Polygon(Polygon::start(at)),
        Tool::CreateLine => Shape::Line(Line::at(at)),
        Tool::CreateExpandingLine => Shape::ExpandingLine(ExpandingLine::start(at)),
        Tool::CreateKeypoints => {
            let Some((definition_id, definition)) =
                state.options.keypoint_definitions.iter().next()
            else {
                log::warn!("⚠️ No keypoint definitions configured");
                return state;
            };
            landmarks = definition
                .landmarks
                .iter()
                .map(|(id, landmark)| (id.clone(), landmark.default_position))
                .collect();
            Shape::Keypoints(Keypoints {
                keypoints_definition_id: definition_id.clone(),
                points: scale_landmarks(at, &landmarks, 0.0),
            })
        }
        _ => return state,
    };

    let Some(region_id) = insert_new_region(&mut state, shape) else {
        return state;
    };

    state.mode = match tool {
        Tool::CreateBox => Mode::ResizingBox {
            region_id,
            freedom: [1, 1],
            original: BoundingBox::new(at.x, at.y, 0.0, 0.0),
            before: None,
        },
        Tool::CreatePolygon => Mode::DrawingPolygon { region_id },
        Tool::CreateLine => Mode::DrawingLine { region_id },
        Tool::CreateExpandingLine => Mode::DrawingExpandingLine { region_id },
        Tool::CreateKeypoints => Mode::ResizingKeypoints {
            region_id,
            center: at,
            landmarks,
            reference: KEYPOINTS_REFERENCE_RADIUS,
            grab: None,
            before: None,
        },
        Tool::CreatePointLine => Mode::CreatingPointLine {
            region_ids: vec![region_id],
        },
        _ => Mode::Idle,
    };
    state
}

/// A click while drawing a polygon: close near the first vertex, else add one.
fn polygon_click(mut state: EditorState, region_id: &str, at: Point) -> EditorState {
    let Some(Shape::Polygon(mut polygon)) = shape_of(&state, region_id) else {
        return state;
    };
    let near_first = polygon
        .points
        .first()
        .is_some_and(|first| first.distance_to(&at) <= POLYGON_CLOSE_THRESHOLD);
    if near_first && polygon.can_close() {
        return close_polygon(state, region_id);
    }

    polygon.points.push(at);
    set_shape(&mut state, region_id, Shape::Polygon(polygon));
    state
}

fn expanding_line_click(mut state: EditorState, region_id: RegionId, at: Point) -> EditorState {
    let Some(Shape::ExpandingLine(mut line)) = shape_of(&state, &region_id) else {
        return state;
    };

    // The last point trails the cursor; the ones before it are committed.
    let committed = line.points.len().saturating_sub(1);
    let finishes = committed >= 2
        && line.points.get(committed - 1).is_some_and(|last| {
            last.position().distance_to(&at) <= EXPANDING_LINE_FINISH_THRESHOLD
        });

    if finishes {
        line.points.pop();
        line.unfinished = false;
        set_shape(&mut state, &region_id, Shape::ExpandingLine(line));
        log::debug!("📏 Expanding line {} placed, choosing width", region_id);
        state.mode = Mode::SettingExpandingLineWidth { region_id };
    } else {
        if let Some(trailing) = line.points.last_mut() {
            trailing.x = at.x;
            trailing.y = at.y;
        }
        line.points.push(ExpandingLinePoint::at(at));
        set_shape(&mut state, &region_id, Shape::ExpandingLine(line));
    }
    state
}

fn point_line_click(mut state: EditorState, mut region_ids: Vec<RegionId>, at: Point) -> EditorState {
    let last = region_ids.last().and_then(|id| shape_of(&state, id));
    if let Some(Shape::Point(last)) = last {
        if last.distance_to(&at) <= POINT_LINE_FINISH_THRESHOLD {
            log::debug!("📍 Point line finished with {} points", region_ids.len());
            state.mode = Mode::Idle;
            return state;
        }
    }
    if !state.in_allowed_area(&at) {
        return state;
    }

    if let Some(id) = insert_new_region(&mut state, Shape::Point(at)) {
        region_ids.push(id);
        state.mode = Mode::CreatingPointLine { region_ids };
    }
    state
}

fn mouse_move(mut state: EditorState, at: Point) -> EditorState {
    if let Some((region_id, shape)) = dragged_shape(&state, at) {
        set_shape(&mut state, &region_id, shape);
    }
    state
}

/// Geometry of the gesture's region with the pointer at `at`.
fn dragged_shape(state: &EditorState, at: Point) -> Option<(RegionId, Shape)> {
    let (region_id, shape) = match &state.mode {
        Mode::Idle | Mode::DrawingPolygon { .. } | Mode::CreatingPointLine { .. } => return None,
        Mode::ResizingBox {
            region_id,
            freedom,
            original,
            ..
        } => {
            let (x_bounds, y_bounds) = match state.allowed_area {
                Some(area) => (area.x_range(), area.y_range()),
                None => (UNBOUNDED, UNBOUNDED),
            };
            let (x, w) = resize_axis(original.x, original.w, freedom[0], at.x, x_bounds);
            let (y, h) = resize_axis(original.y, original.h, freedom[1], at.y, y_bounds);
            (region_id, Shape::Box(BoundingBox::new(x, y, w, h)))
        }
        Mode::MovingRegion {
            region_id,
            grab,
            original,
            ..
        } => {
            if at == *grab {
                (region_id, original.clone())
            } else {
                (region_id, original.translated(at.x - grab.x, at.y - grab.y))
            }
        }
        Mode::MovingPolygonPoint {
            region_id,
            point_index,
            ..
        } => {
            let Shape::Polygon(mut polygon) = region_of(state, region_id)?.shape.clone() else {
                return None;
            };
            *polygon.points.get_mut(*point_index)? = at;
            (region_id, Shape::Polygon(polygon))
        }
        Mode::MovingKeypoint {
            region_id,
            keypoint_id,
            ..
        } => {
            let Shape::Keypoints(mut keypoints) = region_of(state, region_id)?.shape.clone() else {
                return None;
            };
            *keypoints.points.get_mut(keypoint_id)? = at;
            (region_id, Shape::Keypoints(keypoints))
        }
        Mode::ResizingKeypoints {
            region_id,
            center,
            landmarks,
            reference,
            grab,
            before,
        } => {
            if let Some(before) = before.as_ref().filter(|_| *grab == Some(at)) {
                return Some((region_id.clone(), before.shape.clone()));
            }
            let Shape::Keypoints(mut keypoints) = region_of(state, region_id)?.shape.clone() else {
                return None;
            };
            let scale = at.distance_to(center) / reference;
            keypoints.points = scale_landmarks(*center, landmarks, scale);
            (region_id, Shape::Keypoints(keypoints))
        }
        Mode::DrawingLine { region_id } => {
            let Shape::Line(line) = region_of(state, region_id)?.shape else {
                return None;
            };
            let line = Line {
                x2: at.x,
                y2: at.y,
                ..line
            };
            (region_id, Shape::Line(line))
        }
        Mode::DrawingExpandingLine { region_id } => {
            let Shape::ExpandingLine(mut line) = region_of(state, region_id)?.shape.clone() else {
                return None;
            };
            let trailing = line.points.last_mut()?;
            trailing.x = at.x;
            trailing.y = at.y;
            (region_id, Shape::ExpandingLine(line))
        }
        Mode::SettingExpandingLineWidth { region_id } => {
            let Shape::ExpandingLine(mut line) = region_of(state, region_id)?.shape.clone() else {
                return None;
            };
            let width = line.points.last()?.position().distance_to(&at);
            line.expanding_width = Some(width);
            (region_id, Shape::ExpandingLine(line))
        }
    };
    Some((region_id.clone(), shape))
}

/// Resize one box axis spanning `start..start + len`.
///
/// `freedom` selects the dragged edge: 1 the far edge, -1 the near edge, 0
/// none. The opposite edge stays put as the anchor; dragging past it flips
/// which side of the anchor the box lies on. The cursor is clamped to
/// `bounds` and the result is never thinner than [`MIN_BOX_SIZE`]. Returns
/// the new `(start, len)`.
fn resize_axis(start: f32, len: f32, freedom: i8, cursor: f32, bounds: (f32, f32)) -> (f32, f32) {
    let anchor = match freedom {
        1 if cursor == start + len => return (start, len),
        1 => start,
        -1 if cursor == start => return (start, len),
        -1 => start + len,
        _ => return (start, len),
    };

    let (lo, hi) = bounds;
    let cursor = cursor.max(lo).min(hi);
    let (mut min, mut max) = (anchor.min(cursor), anchor.max(cursor));

    if max - min < MIN_BOX_SIZE {
        if cursor >= anchor {
            max = min + MIN_BOX_SIZE;
            if max > hi {
                max = hi;
                min = hi - MIN_BOX_SIZE;
            }
        } else {
            min = max - MIN_BOX_SIZE;
            if min < lo {
                min = lo;
                max = lo + MIN_BOX_SIZE;
            }
        }
    }
    (min, max - min)
}

/// Check if the mode is a drag that ends when the button is released.
fn ends_on_release(mode: &Mode) -> bool {
    matches!(
        mode,
        Mode::ResizingBox { .. }
            | Mode::MovingPolygonPoint { .. }
            | Mode::MovingRegion { .. }
            | Mode::MovingKeypoint { .. }
            | Mode::ResizingKeypoints { .. }
    )
}

fn mouse_up(mut state: EditorState) -> EditorState {
    state.mouse_down_at = None;
    if !ends_on_release(&state.mode) {
        return state;
    }

    // A region created by this drag that never grew is dropped again.
    let discard = match &state.mode {
        Mode::ResizingBox {
            region_id,
            before: None,
            ..
        } => match region_of(&state, region_id).map(|region| &region.shape) {
            Some(Shape::Box(bbox)) if bbox.w <= 0.0 || bbox.h <= 0.0 => Some(region_id.clone()),
            _ => None,
        },
        Mode::ResizingKeypoints {
            region_id,
            center,
            before: None,
            ..
        } => match region_of(&state, region_id).map(|region| &region.shape) {
            Some(Shape::Keypoints(keypoints))
                if keypoints.points.values().all(|p| p == center) =>
            {
                Some(region_id.clone())
            }
            _ => None,
        },
        _ => None,
    };
    if let Some(region_id) = discard {
        remove_region(&mut state, &region_id);
        log::debug!("🗑️ Discarded degenerate region {}", region_id);
    }

    log::debug!("✅ {} finished", state.mode.name());
    state.mode = Mode::Idle;
    state
}

/// Abort the current gesture, or clear the selection when idle.
fn cancel(mut state: EditorState) -> EditorState {
    let mode = std::mem::take(&mut state.mode);
    if !mode.is_idle() {
        log::debug!("↩️ Cancelled {}", mode.name());
    }

    match mode {
        Mode::Idle => {
            let selected = active_image(&state).image.is_some_and(|image| {
                image
                    .regions
                    .iter()
                    .any(|region| region.highlighted || region.editing_labels)
            });
            if selected {
                if let Some(image) = active_image_mut(&mut state) {
                    clear_selection(image);
                }
            }
        }
        Mode::DrawingPolygon { region_id }
        | Mode::DrawingLine { region_id }
        | Mode::DrawingExpandingLine { region_id }
        | Mode::SettingExpandingLineWidth { region_id } => {
            remove_region(&mut state, &region_id);
        }
        Mode::MovingPolygonPoint { before, .. } | Mode::MovingKeypoint { before, .. } => {
            restore_shape(&mut state, &before);
        }
        Mode::ResizingBox {
            region_id, before, ..
        }
        | Mode::MovingRegion {
            region_id, before, ..
        }
        | Mode::ResizingKeypoints {
            region_id, before, ..
        } => match before {
            Some(before) => restore_shape(&mut state, &before),
            None => {
                remove_region(&mut state, &region_id);
            }
        },
        Mode::CreatingPointLine { region_ids } => {
            for region_id in &region_ids {
                remove_region(&mut state, region_id);
            }
        }
    }
    state
}

// ============================================================================
// Gesture starts
// ============================================================================

/// Resolve the region a new gesture applies to. Gestures only start from
/// idle, and never on missing or locked regions.
fn gesture_target(state: &EditorState, region_id: &str, action: &str) -> Option<Arc<Region>> {
    if !state.mode.is_idle() {
        log::debug!("Ignoring {} during {}", action, state.mode.name());
        return None;
    }
    let Some(region) = region_of(state, region_id) else {
        log::warn!("⚠️ {}: no region {} in the active image", action, region_id);
        return None;
    };
    if region.locked {
        log::debug!("{}: region {} is locked", action, region_id);
        return None;
    }
    Some(Arc::clone(region))
}

fn begin_box_transform(mut state: EditorState, payload: &Region, directions: [i8; 2]) -> EditorState {
    let Shape::Box(original) = &payload.shape else {
        log::debug!("BEGIN_BOX_TRANSFORM on a {} region", payload.shape.kind());
        return state;
    };
    let original = *original;
    if !state.mode.is_idle() || payload.locked || active_image(&state).image.is_none() {
        return state;
    }

    let before = region_of(&state, &payload.id).cloned();
    if before
        .as_ref()
        .is_some_and(|existing| existing.locked || !matches!(existing.shape, Shape::Box(_)))
    {
        return state;
    }
    if before.is_none() {
        if let Some(image) = active_image_mut(&mut state) {
            image.regions.upsert(payload.clone());
        }
        log::debug!("📦 Adopted box {} into the active image", payload.id);
    }

    let region_id = payload.id.clone();
    state.mode = if directions == [0, 0] {
        Mode::MovingRegion {
            region_id,
            grab: state.mouse_down_at.unwrap_or_else(|| original.center()),
            original: Shape::Box(original),
            before,
        }
    } else {
        Mode::ResizingBox {
            region_id,
            freedom: [directions[0].signum(), directions[1].signum()],
            original,
            before,
        }
    };
    state
}

fn begin_move_point(mut state: EditorState, region_id: &str) -> EditorState {
    let Some(region) = gesture_target(&state, region_id, "BEGIN_MOVE_POINT") else {
        return state;
    };
    let Shape::Point(point) = region.shape else {
        return state;
    };
    state.mode = Mode::MovingRegion {
        region_id: region.id.clone(),
        grab: point,
        original: region.shape.clone(),
        before: Some(region),
    };
    state
}

fn begin_move_region(mut state: EditorState, region_id: &str) -> EditorState {
    let Some(region) = gesture_target(&state, region_id, "BEGIN_MOVE_REGION") else {
        return state;
    };
    let Some(grab) = state.mouse_down_at.or_else(|| region.shape.anchor()) else {
        return state;
    };
    state.mode = Mode::MovingRegion {
        region_id: region.id.clone(),
        grab,
        original: region.shape.clone(),
        before: Some(region),
    };
    state
}

fn begin_move_polygon_point(mut state: EditorState, region_id: &str, point_index: usize) -> EditorState {
    let Some(region) = gesture_target(&state, region_id, "BEGIN_MOVE_POLYGON_POINT") else {
        return state;
    };
    if !matches!(&region.shape, Shape::Polygon(polygon) if point_index < polygon.points.len()) {
        return state;
    }
    state.mode = Mode::MovingPolygonPoint {
        region_id: region.id.clone(),
        point_index,
        before: region,
    };
    state
}

fn begin_move_keypoint(mut state: EditorState, region_id: &str, keypoint_id: &str) -> EditorState {
    let Some(region) = gesture_target(&state, region_id, "BEGIN_MOVE_KEYPOINT") else {
        return state;
    };
    if !matches!(&region.shape, Shape::Keypoints(kp) if kp.points.contains_key(keypoint_id)) {
        return state;
    }
    state.mode = Mode::MovingKeypoint {
        region_id: region.id.clone(),
        keypoint_id: keypoint_id.to_string(),
        before: region,
    };
    state
}

/// Start scaling an existing skeleton about its centroid.
fn begin_resize_keypoints(mut state: EditorState, region_id: &str) -> EditorState {
    let Some(region) = gesture_target(&state, region_id, "RESIZE_KEYPOINTS") else {
        return state;
    };
    let Shape::Keypoints(keypoints) = &region.shape else {
        return state;
    };
    let Some(center) = keypoints.centroid() else {
        return state;
    };

    let landmarks: BTreeMap<String, Point> = keypoints
        .points
        .iter()
        .map(|(id, p)| (id.clone(), Point::new(p.x - center.x, p.y - center.y)))
        .collect();
    let farthest = keypoints
        .points
        .values()
        .copied()
        .max_by(|a, b| a.distance_to(&center).total_cmp(&b.distance_to(&center)));
    let Some(grab) = state.mouse_down_at.or(farthest) else {
        return state;
    };
    let reference = grab.distance_to(&center);
    if reference <= 0.0 {
        log::debug!("RESIZE_KEYPOINTS: grab is on the center of {}", region_id);
        return state;
    }

    state.mode = Mode::ResizingKeypoints {
        region_id: region.id.clone(),
        center,
        landmarks,
        reference,
        grab: Some(grab),
        before: Some(region),
    };
    state
}

// ============================================================================
// Polygon edits
// ============================================================================

fn add_polygon_point(mut state: EditorState, region_id: &str, point: Point, index: usize) -> EditorState {
    let Some(region) = region_of(&state, region_id) else {
        log::warn!("⚠️ ADD_POLYGON_POINT: no region {}", region_id);
        return state;
    };
    if region.locked {
        return state;
    }
    let Shape::Polygon(mut polygon) = region.shape.clone() else {
        return state;
    };
    polygon.insert(index, point);
    set_shape(&mut state, region_id, Shape::Polygon(polygon));
    state
}

/// Close a polygon with enough vertices; too few leaves everything as is.
fn close_polygon(mut state: EditorState, region_id: &str) -> EditorState {
    let Some(Shape::Polygon(mut polygon)) = shape_of(&state, region_id) else {
        log::warn!("⚠️ CLOSE_POLYGON: no polygon {}", region_id);
        return state;
    };
    if !polygon.can_close() {
        log::debug!(
            "Polygon {} has {} points, not closing",
            region_id,
            polygon.points.len()
        );
        return state;
    }

    polygon.open = false;
    set_shape(&mut state, region_id, Shape::Polygon(polygon));
    if matches!(&state.mode, Mode::DrawingPolygon { region_id: drawing } if drawing.as_str() == region_id)
    {
        state.mode = Mode::Idle;
    }
    log::debug!("🔷 Polygon {} closed", region_id);
    state
}

// ============================================================================
// Mode-independent region edits
// ============================================================================

fn select_region(mut state: EditorState, region_id: &str) -> EditorState {
    let Some(image) = active_image(&state).image else {
        return state;
    };
    if !image.regions.contains(region_id) {
        log::warn!("⚠️ SELECT_REGION: no region {}", region_id);
        return state;
    }
    let stale = image.regions.iter().any(|region| {
        let selected = region.id == region_id;
        region.highlighted != selected || region.editing_labels != selected
    });
    if !stale {
        return state;
    }

    if let Some(image) = active_image_mut(&mut state) {
        image.regions.update_each(|region| {
            let selected = region.id == region_id;
            (region.highlighted != selected || region.editing_labels != selected).then(|| Region {
                highlighted: selected,
                editing_labels: selected,
                ..region.clone()
            })
        });
    }
    state
}

fn change_region(mut state: EditorState, region: &Region) -> EditorState {
    if let Err(message) = region.shape.validate() {
        log::warn!("⚠️ CHANGE_REGION {} rejected: {}", region.id, message);
        return state;
    }
    let Some(current) = region_of(&state, &region.id) else {
        log::warn!("⚠️ CHANGE_REGION: no region {}", region.id);
        return state;
    };
    if **current == *region {
        return state;
    }
    if let Some(image) = active_image_mut(&mut state) {
        image.regions.replace(region.clone());
    }
    state
}

fn delete_region(mut state: EditorState, region_id: &str) -> EditorState {
    if !state.options.region_allowed_actions.remove {
        log::debug!("Region removal is disabled");
        return state;
    }
    if !remove_region(&mut state, region_id) {
        log::warn!("⚠️ DELETE_REGION: no region {}", region_id);
        return state;
    }
    if state.mode.references(region_id) {
        log::debug!("{} dropped with region {}", state.mode.name(), region_id);
        state.mode = Mode::Idle;
    }
    log::debug!("🗑️ Deleted {}", region_id);
    state
}

fn delete_selected_regions(mut state: EditorState) -> EditorState {
    let selected: Vec<RegionId> = active_image(&state)
        .image
        .map(|image| {
            image
                .regions
                .iter()
                .filter(|region| region.highlighted)
                .map(|region| region.id.clone())
                .collect()
        })
        .unwrap_or_default();
    for region_id in &selected {
        state = delete_region(state, region_id);
    }
    state
}

fn set_editing_labels(mut state: EditorState, region_id: &str, editing: bool) -> EditorState {
    if !region_of(&state, region_id).is_some_and(|region| region.editing_labels != editing) {
        return state;
    }
    if let Some(slot) = active_image_mut(&mut state).and_then(|image| image.regions.get_mut(region_id)) {
        Arc::make_mut(slot).editing_labels = editing;
    }
    state
}

/// Reset a mode whose regions are no longer all in the active image.
fn reconcile_mode(mut state: EditorState) -> EditorState {
    if state.mode.is_idle() {
        return state;
    }
    let missing = {
        let image = active_image(&state).image;
        state
            .mode
            .region_ids()
            .into_iter()
            .find(|id| !image.is_some_and(|image| image.regions.contains(id)))
            .map(str::to_string)
    };
    if let Some(region_id) = missing {
        log::warn!(
            "⚠️ {} lost region {}, back to idle",
            state.mode.name(),
            region_id
        );
        state.mode = Mode::Idle;
    }
    state
}
