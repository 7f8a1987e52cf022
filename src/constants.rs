//! Global constants for the annotation core.
//!
//! All distances are in image-normalized coordinates (0..1 on both axes).

/// Minimum width/height a box may be resized to.
pub const MIN_BOX_SIZE: f32 = 0.001;

/// Minimum number of vertices required to close a polygon.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Distance to the first vertex under which a click closes the polygon being drawn.
pub const POLYGON_CLOSE_THRESHOLD: f32 = 0.012;

/// Distance to the last committed point under which a click finishes an expanding line.
pub const EXPANDING_LINE_FINISH_THRESHOLD: f32 = 0.012;

/// Distance to the last placed point under which a click finishes a point line.
pub const POINT_LINE_FINISH_THRESHOLD: f32 = 0.012;

/// Cursor distance from the center that maps to unit scale for a freshly placed skeleton.
pub const KEYPOINTS_REFERENCE_RADIUS: f32 = 0.15;

/// Default number of history entries kept before the oldest is dropped.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Region id prefix for regions created by the editor.
pub const REGION_ID_PREFIX: &str = "region";

/// Text shown by the presentation layer when the host supplied no images.
pub const MISSING_IMAGES_PLACEHOLDER: &str = "Missing required \"images\"";
