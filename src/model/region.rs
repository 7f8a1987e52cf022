//! Regions: geometric annotations anchored to an image.
//!
//! Regions of one image live in a [`RegionStore`], an arena keyed by region id
//! with a separate z-order list. Each region sits behind an `Arc`, so cloning a
//! store shares every region and replacing one region only touches one entry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::geometry::{BoundingBox, ExpandingLine, Keypoints, Line, Point, Polygon};
use crate::error::ConfigError;

/// Unique identifier for a region within one image.
pub type RegionId = String;

// ============================================================================
// Shape
// ============================================================================

/// The geometry of a region, tagged by its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Shape {
    Point(Point),
    Box(BoundingBox),
    Polygon(Polygon),
    Line(Line),
    ExpandingLine(ExpandingLine),
    Keypoints(Keypoints),
}

impl Shape {
    /// Type tag as it appears in serialized regions.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::Box(_) => "box",
            Shape::Polygon(_) => "polygon",
            Shape::Line(_) => "line",
            Shape::ExpandingLine(_) => "expanding-line",
            Shape::Keypoints(_) => "keypoints",
        }
    }

    /// The point a drag of the whole region is anchored to when no grab
    /// position is known.
    pub fn anchor(&self) -> Option<Point> {
        match self {
            Shape::Point(p) => Some(*p),
            Shape::Box(b) => Some(b.center()),
            Shape::Polygon(poly) => poly.centroid(),
            Shape::Line(line) => Some(Point::new(
                (line.x1 + line.x2) / 2.0,
                (line.y1 + line.y2) / 2.0,
            )),
            Shape::ExpandingLine(line) => line.points.first().map(|p| p.position()),
            Shape::Keypoints(kp) => kp.centroid(),
        }
    }

    /// Return this shape moved by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Shape {
        match self {
            Shape::Point(p) => Shape::Point(p.translated(dx, dy)),
            Shape::Box(b) => Shape::Box(BoundingBox::new(b.x + dx, b.y + dy, b.w, b.h)),
            Shape::Polygon(poly) => Shape::Polygon(Polygon {
                points: poly.points.iter().map(|p| p.translated(dx, dy)).collect(),
                open: poly.open,
            }),
            Shape::Line(line) => Shape::Line(Line {
                x1: line.x1 + dx,
                y1: line.y1 + dy,
                x2: line.x2 + dx,
                y2: line.y2 + dy,
            }),
            Shape::ExpandingLine(line) => {
                let mut moved = line.clone();
                for p in &mut moved.points {
                    p.x += dx;
                    p.y += dy;
                }
                Shape::ExpandingLine(moved)
            }
            Shape::Keypoints(kp) => Shape::Keypoints(Keypoints {
                keypoints_definition_id: kp.keypoints_definition_id.clone(),
                points: kp
                    .points
                    .iter()
                    .map(|(id, p)| (id.clone(), p.translated(dx, dy)))
                    .collect(),
            }),
        }
    }

    /// Validate the per-type geometry invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Shape::Box(b) if b.w < 0.0 || b.h < 0.0 => {
                Err(format!("box has negative size {}x{}", b.w, b.h))
            }
            Shape::Polygon(poly) if !poly.open && !poly.can_close() => Err(format!(
                "closed polygon has {} points, needs at least {}",
                poly.points.len(),
                crate::constants::MIN_POLYGON_VERTICES
            )),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// Region
// ============================================================================

fn default_visible() -> bool {
    true
}

/// A single annotation on an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique identifier within the image.
    pub id: RegionId,
    /// The shape of the region.
    #[serde(flatten)]
    pub shape: Shape,
    /// Classification label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cls: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Display color, `#rrggbb`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub highlighted: bool,
    /// The label editor is open for this region.
    #[serde(default)]
    pub editing_labels: bool,
}

impl Region {
    /// Create a visible, unlocked region.
    pub fn new(id: impl Into<RegionId>, shape: Shape) -> Self {
        Self {
            id: id.into(),
            shape,
            cls: None,
            tags: Vec::new(),
            color: None,
            comment: None,
            locked: false,
            visible: true,
            highlighted: false,
            editing_labels: false,
        }
    }

    pub fn with_cls(mut self, cls: Option<String>) -> Self {
        self.cls = cls;
        self
    }

    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    pub fn highlighted(mut self) -> Self {
        self.highlighted = true;
        self
    }
}

// ============================================================================
// Region Store
// ============================================================================

/// Storage for the regions of a single image.
///
/// Serializes as an ordered list of regions; the list order is the z-order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Region>", into = "Vec<Region>")]
pub struct RegionStore {
    /// All regions, keyed by their id.
    regions: HashMap<RegionId, Arc<Region>>,
    /// Region ids in insertion (z) order.
    order: Vec<RegionId>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a region by id.
    pub fn get(&self, id: &str) -> Option<&Arc<Region>> {
        self.regions.get(id)
    }

    /// Get a mutable handle to a region by id.
    ///
    /// Use `Arc::make_mut` on the handle so shared snapshots stay untouched.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Arc<Region>> {
        self.regions.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    /// Insert a region on top, or replace it in place if its id already exists.
    pub fn upsert(&mut self, region: impl Into<Arc<Region>>) {
        let region = region.into();
        if !self.regions.contains_key(&region.id) {
            self.order.push(region.id.clone());
        }
        self.regions.insert(region.id.clone(), region);
    }

    /// Replace an existing region. Returns false if the id is unknown.
    pub fn replace(&mut self, region: impl Into<Arc<Region>>) -> bool {
        let region = region.into();
        match self.regions.get_mut(&region.id) {
            Some(slot) => {
                *slot = region;
                true
            }
            None => false,
        }
    }

    /// Remove a region by id.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Region>> {
        let removed = self.regions.remove(id);
        if removed.is_some() {
            self.order.retain(|r| r != id);
        }
        removed
    }

    /// Iterate over regions in z-order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Region>> {
        self.order.iter().filter_map(|id| self.regions.get(id))
    }

    /// Region ids in z-order.
    pub fn ids(&self) -> &[RegionId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Apply `f` to every region, cloning only the regions it reports as changed.
    pub fn update_each(&mut self, mut f: impl FnMut(&Region) -> Option<Region>) -> bool {
        let mut changed = false;
        for slot in self.regions.values_mut() {
            if let Some(updated) = f(slot) {
                *slot = Arc::new(updated);
                changed = true;
            }
        }
        changed
    }
}

impl TryFrom<Vec<Region>> for RegionStore {
    type Error = ConfigError;

    fn try_from(regions: Vec<Region>) -> Result<Self, Self::Error> {
        let mut store = RegionStore::new();
        for region in regions {
            if store.contains(&region.id) {
                return Err(ConfigError::duplicate_region(region.id));
            }
            store.upsert(region);
        }
        Ok(store)
    }
}

impl From<RegionStore> for Vec<Region> {
    fn from(store: RegionStore) -> Self {
        store
            .order
            .iter()
            .filter_map(|id| store.regions.get(id))
            .map(|r| Region::clone(r))
            .collect()
    }
}

// ============================================================================
// Colors
// ============================================================================

/// Default region color for the n-th class, spread around the hue circle.
pub fn default_color(index: usize) -> String {
    // Golden angle for good distribution
    let hue = (index as f32 * 137.5) % 360.0;
    let (r, g, b) = hsv_to_rgb(hue, 0.7, 0.9);
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8
    )
}

/// Convert HSV to RGB (h in degrees, s and v in 0-1).
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_region(id: &str, x: f32, y: f32) -> Region {
        Region::new(id, Shape::Point(Point::new(x, y)))
    }

    #[test]
    fn test_region_store_keeps_z_order() {
        let mut store = RegionStore::new();
        store.upsert(point_region("a", 0.1, 0.1));
        store.upsert(point_region("b", 0.2, 0.2));
        store.upsert(point_region("c", 0.3, 0.3));
        store.upsert(point_region("a", 0.5, 0.5));

        assert_eq!(store.ids(), ["a", "b", "c"]);
        assert_eq!(
            store.get("a").map(|r| r.shape.clone()),
            Some(Shape::Point(Point::new(0.5, 0.5)))
        );

        store.remove("b");
        assert_eq!(store.ids(), ["a", "c"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_cloned_store_shares_regions() {
        let mut store = RegionStore::new();
        store.upsert(point_region("a", 0.1, 0.1));
        let snapshot = store.clone();

        if let Some(slot) = store.get_mut("a") {
            Arc::make_mut(slot).locked = true;
        }

        assert!(store.get("a").is_some_and(|r| r.locked));
        assert!(snapshot.get("a").is_some_and(|r| !r.locked));
    }

    #[test]
    fn test_region_json_shape() {
        let region = Region::new("r1", Shape::Box(BoundingBox::new(0.1, 0.2, 0.3, 0.4)))
            .with_cls(Some("car".to_string()));
        let json = serde_json::to_value(&region).expect("serialize region");
        assert_eq!(json["type"], "box");
        assert_eq!(json["cls"], "car");
        assert_eq!(json["editingLabels"], false);

        let parsed: Region = serde_json::from_value(json).expect("parse region");
        assert_eq!(parsed, region);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id": "a", "type": "point", "x": 0.1, "y": 0.1},
            {"id": "a", "type": "point", "x": 0.2, "y": 0.2}
        ]"#;
        let result: Result<RegionStore, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_translate_polygon() {
        let shape = Shape::Polygon(Polygon {
            points: vec![Point::new(0.0, 0.0), Point::new(0.5, 0.0)],
            open: false,
        });
        let moved = shape.translated(0.25, 0.5);
        assert_eq!(
            moved,
            Shape::Polygon(Polygon {
                points: vec![Point::new(0.25, 0.5), Point::new(0.75, 0.5)],
                open: false,
            })
        );
    }

    #[test]
    fn test_default_colors_differ() {
        assert_ne!(default_color(1), default_color(2));
        assert!(default_color(0).starts_with('#'));
        assert_eq!(default_color(3).len(), 7);
    }
}
