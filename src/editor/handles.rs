//! View layer for the in-progress polygon.
//!
//! [`HandleLayer`] holds the on-screen (view-space) position of every vertex
//! handle. It is rebuilt from the point set whenever the view changes and is
//! what pointer hit tests run against. During a drag only this layer moves;
//! the point set is updated on release.

use crate::constants::{HANDLE_HALF_WIDTH, MIN_OUTLINE_POINTS};
use crate::model::{BoundingBox, HandleId, Point, PointSet};
use crate::view_transform::ViewTransform;

/// A handle as currently drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedHandle {
    pub id: HandleId,
    /// View-space centre
    pub center: Point,
}

impl RenderedHandle {
    /// On-screen bounds of the handle.
    pub fn bounds(&self, half_width: f64) -> BoundingBox {
        BoundingBox::around(self.center, half_width)
    }
}

/// Rendered vertex handles, in creation order.
#[derive(Debug, Clone)]
pub struct HandleLayer {
    handles: Vec<RenderedHandle>,
    half_width: f64,
}

impl HandleLayer {
    pub fn new(half_width: f64) -> Self {
        Self {
            handles: Vec::new(),
            half_width,
        }
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn handles(&self) -> &[RenderedHandle] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Rebuild every handle from `points` under `view`.
    pub fn sync(&mut self, points: &PointSet, view: &ViewTransform) {
        self.handles.clear();
        self.handles.extend(points.handles().map(|(id, point)| RenderedHandle {
            id,
            center: view.to_view(point),
        }));
    }

    /// Draw a new handle.
    pub fn push(&mut self, id: HandleId, center: Point) {
        self.handles.push(RenderedHandle { id, center });
    }

    /// Move a drawn handle. Returns false if it is not drawn.
    pub fn move_handle(&mut self, id: HandleId, center: Point) -> bool {
        match self.handles.iter_mut().find(|h| h.id == id) {
            Some(handle) => {
                handle.center = center;
                true
            }
            None => false,
        }
    }

    pub fn center_of(&self, id: HandleId) -> Option<Point> {
        self.handles.iter().find(|h| h.id == id).map(|h| h.center)
    }

    /// First handle (in creation order) whose bounds overlap the query box
    /// of the same half-width around `cursor`.
    pub fn hit_test(&self, cursor: Point) -> Option<HandleId> {
        let query = BoundingBox::around(cursor, self.half_width);
        self.handles
            .iter()
            .find(|h| h.bounds(self.half_width).intersects(&query))
            .map(|h| h.id)
    }

    /// View-space outline vertices, or `None` below two handles.
    pub fn outline(&self) -> Option<Vec<Point>> {
        (self.handles.len() >= MIN_OUTLINE_POINTS)
            .then(|| self.handles.iter().map(|h| h.center).collect())
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

impl Default for HandleLayer {
    fn default() -> Self {
        Self::new(HANDLE_HALF_WIDTH)
    }
}
