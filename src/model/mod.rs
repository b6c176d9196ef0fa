//! Data models for the region annotation engine.

mod point;
mod point_set;
mod region;

pub use point::{BoundingBox, Point};
pub use point_set::{HandleId, PointSet};
pub use region::Region;
