//! Vertices of the polygon currently being drawn or edited.
//!
//! Points live in a small arena; callers hold [`HandleId`]s that index into
//! it. Clearing the set bumps a generation counter so handles issued before
//! the clear no longer resolve.

use std::fmt;

use crate::error::EditorError;
use crate::model::point::Point;
use crate::model::region::Region;

/// Opaque identifier for one vertex of the in-progress polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId {
    generation: u32,
    index: usize,
}

impl HandleId {
    /// Position of the vertex within the polygon.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.generation, self.index)
    }
}

/// Ordered collection of image-space points with stable handles.
#[derive(Debug, Clone, Default)]
pub struct PointSet {
    points: Vec<Point>,
    generation: u32,
}

impl PointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point and return its handle. Coincident points are allowed.
    pub fn add_point(&mut self, point: Point) -> HandleId {
        let handle = HandleId {
            generation: self.generation,
            index: self.points.len(),
        };
        self.points.push(point);
        handle
    }

    /// Replace the coordinate behind `handle`.
    ///
    /// Returns [`EditorError::UnknownHandle`] for handles from a previous
    /// generation or past the end; callers treat that as a no-op.
    pub fn move_point(&mut self, handle: HandleId, point: Point) -> Result<(), EditorError> {
        let slot = self
            .slot(handle)
            .ok_or(EditorError::UnknownHandle(handle))?;
        self.points[slot] = point;
        Ok(())
    }

    /// Current coordinate behind `handle`, if it is still valid.
    pub fn get(&self, handle: HandleId) -> Option<Point> {
        self.slot(handle).map(|slot| self.points[slot])
    }

    /// All live handles with their points, in insertion order.
    pub fn handles(&self) -> impl Iterator<Item = (HandleId, Point)> + '_ {
        let generation = self.generation;
        self.points.iter().enumerate().map(move |(index, point)| {
            (
                HandleId { generation, index },
                *point,
            )
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Snapshot the points as a region, in insertion order.
    pub fn to_region(&self) -> Region {
        Region::from_points(self.points.clone())
    }

    /// Remove all points and invalidate every handle issued so far.
    pub fn clear(&mut self) {
        self.points.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    fn slot(&self, handle: HandleId) -> Option<usize> {
        let index = handle.index();
        (handle.generation == self.generation && index < self.points.len()).then_some(index)
    }
}
