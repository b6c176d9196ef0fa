//! Region type: one labeled polygon on one image.

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::constants::MIN_OUTLINE_POINTS;
use crate::model::point::{BoundingBox, Point};

/// An ordered sequence of image-space points.
///
/// Edge `i` connects vertex `i` to vertex `i + 1`; the region is drawn as a
/// closed polygon once it has three or more points. Regions with zero or one
/// point are valid and represent unfinished annotations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Region {
    points: Vec<Point>,
}

impl Region {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region from points in edge order.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// The vertices in insertion order.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether enough points exist to draw an outline.
    pub fn has_outline(&self) -> bool {
        self.points.len() >= MIN_OUTLINE_POINTS
    }

    /// Get the bounding box of the region.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.points)
    }
}

impl From<Vec<Point>> for Region {
    fn from(points: Vec<Point>) -> Self {
        Self::from_points(points)
    }
}

impl FromIterator<Point> for Region {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter.into_iter().collect())
    }
}

/// A region is written as a plain array of `[x, y]` arrays.
impl Serialize for Region {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.points.len()))?;
        for point in &self.points {
            seq.serialize_element(point)?;
        }
        seq.end()
    }
}
