//! Geometry primitives for region shapes.
//!
//! All coordinates are image-normalized: `(0, 0)` is the top-left corner of the
//! image and `(1, 1)` the bottom-right one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Core Geometry Types
// ============================================================================

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Offset this point by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An axis-aligned box, also used for the allowed edit area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width of the box
    pub w: f32,
    /// Height of the box
    pub h: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The whole image.
    pub fn full_frame() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Create a box from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        let x = p1.x.min(p2.x);
        let y = p1.y.min(p2.y);
        Self {
            x,
            y,
            w: (p1.x - p2.x).abs(),
            h: (p1.y - p2.y).abs(),
        }
    }

    /// Get the center point of the box.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Check if a point is inside the box (edges included).
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }

    /// Horizontal extent as `(min, max)`.
    pub fn x_range(&self) -> (f32, f32) {
        (self.x, self.x + self.w)
    }

    /// Vertical extent as `(min, max)`.
    pub fn y_range(&self) -> (f32, f32) {
        (self.y, self.y + self.h)
    }
}

/// A polygon defined by a sequence of vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// The vertices of the polygon in ring order.
    pub points: Vec<Point>,
    /// Whether the polygon is still being drawn.
    #[serde(default)]
    pub open: bool,
}

impl Polygon {
    /// Start an open polygon at `first`.
    pub fn start(first: Point) -> Self {
        Self {
            points: vec![first],
            open: true,
        }
    }

    /// Insert a vertex at `index`, clamped to the ring length.
    pub fn insert(&mut self, index: usize, point: Point) {
        let index = index.min(self.points.len());
        self.points.insert(index, point);
    }

    /// Check if the polygon has enough vertices to be closed.
    pub fn can_close(&self) -> bool {
        self.points.len() >= crate::constants::MIN_POLYGON_VERTICES
    }

    /// Centroid of the vertices, if any.
    pub fn centroid(&self) -> Option<Point> {
        centroid(self.points.iter())
    }
}

/// A straight segment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Line {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Line {
    /// A zero-length line at `point`.
    pub fn at(point: Point) -> Self {
        Self {
            x1: point.x,
            y1: point.y,
            x2: point.x,
            y2: point.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }
}

/// One vertex of an expanding line.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpandingLinePoint {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f32>,
}

impl ExpandingLinePoint {
    pub fn at(point: Point) -> Self {
        Self {
            x: point.x,
            y: point.y,
            width: None,
            angle: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A polyline whose stroke width is set after the vertices are placed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandingLine {
    pub points: Vec<ExpandingLinePoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expanding_width: Option<f32>,
    /// Still collecting vertices.
    #[serde(default)]
    pub unfinished: bool,
}

impl ExpandingLine {
    /// Start a line with one committed point and a trailing cursor point.
    pub fn start(point: Point) -> Self {
        Self {
            points: vec![ExpandingLinePoint::at(point), ExpandingLinePoint::at(point)],
            expanding_width: None,
            unfinished: true,
        }
    }
}

/// A keypoint skeleton: named landmarks of one definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keypoints {
    pub keypoints_definition_id: String,
    pub points: BTreeMap<String, Point>,
}

impl Keypoints {
    /// Centroid of all landmarks, if any.
    pub fn centroid(&self) -> Option<Point> {
        centroid(self.points.values())
    }
}

/// Definition of one landmark in a skeleton.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarkDefinition {
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Offset from the skeleton center at unit scale.
    pub default_position: Point,
}

/// A named skeleton layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeypointsDefinition {
    pub landmarks: BTreeMap<String, LandmarkDefinition>,
    #[serde(default)]
    pub connections: Vec<(String, String)>,
}

/// Place every landmark at `center + offset * scale`.
pub fn scale_landmarks(
    center: Point,
    offsets: &BTreeMap<String, Point>,
    scale: f32,
) -> BTreeMap<String, Point> {
    offsets
        .iter()
        .map(|(id, offset)| {
            (
                id.clone(),
                Point::new(center.x + offset.x * scale, center.y + offset.y * scale),
            )
        })
        .collect()
}

fn centroid<'a>(points: impl Iterator<Item = &'a Point>) -> Option<Point> {
    let (mut sx, mut sy, mut n) = (0.0f32, 0.0f32, 0usize);
    for p in points {
        sx += p.x;
        sy += p.y;
        n += 1;
    }
    (n > 0).then(|| Point::new(sx / n as f32, sy / n as f32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(0.3, 0.4);
        assert!((p1.distance_to(&p2) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bounding_box_from_corners() {
        let bbox = BoundingBox::from_corners(Point::new(0.1, 0.2), Point::new(0.5, 0.8));
        let reversed = BoundingBox::from_corners(Point::new(0.5, 0.8), Point::new(0.1, 0.2));
        assert_eq!(bbox, reversed);
        assert_eq!(bbox.x, 0.1);
        assert_eq!(bbox.y, 0.2);
    }

    #[test]
    fn test_bounding_box_contains() {
        let bbox = BoundingBox::new(0.1, 0.1, 0.5, 0.5);
        assert!(bbox.contains(&Point::new(0.3, 0.3)));
        assert!(bbox.contains(&Point::new(0.1, 0.1)));
        assert!(!bbox.contains(&Point::new(0.05, 0.3)));
    }

    #[test]
    fn test_polygon_insert_clamps_index() {
        let mut poly = Polygon::start(Point::new(0.0, 0.0));
        poly.insert(10, Point::new(1.0, 0.0));
        poly.insert(1, Point::new(0.5, 0.5));
        assert_eq!(
            poly.points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(0.5, 0.5),
                Point::new(1.0, 0.0)
            ]
        );
        assert!(poly.can_close());
    }

    #[test]
    fn test_scale_landmarks() {
        let mut offsets = BTreeMap::new();
        offsets.insert("head".to_string(), Point::new(0.0, -0.125));
        offsets.insert("tail".to_string(), Point::new(0.25, 0.0));
        let placed = scale_landmarks(Point::new(0.5, 0.5), &offsets, 2.0);
        assert_eq!(placed["head"], Point::new(0.5, 0.25));
        assert_eq!(placed["tail"], Point::new(1.0, 0.5));
    }

    #[test]
    fn test_expanding_line_start_has_trailing_point() {
        let line = ExpandingLine::start(Point::new(0.2, 0.2));
        assert_eq!(line.points.len(), 2);
        assert!(line.unfinished);
    }
}
