//! Data models for the annotation core.

mod geometry;
mod image;
mod region;
mod tool;

pub use geometry::{
    BoundingBox, ExpandingLine, ExpandingLinePoint, Keypoints, KeypointsDefinition,
    LandmarkDefinition, Line, Point, Polygon, scale_landmarks,
};
pub use image::{Image, ImageDelta, PixelSize, RealSize};
pub use region::{Region, RegionId, RegionStore, Shape, default_color};
pub use tool::Tool;
