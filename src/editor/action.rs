//! Input actions for the polygon editor.
//!
//! Each action corresponds to one discrete user input. How it was triggered
//! (mouse, keyboard, touch) is up to the view layer.

use crate::image_provider::ImageDimensions;
use crate::model::Point;

/// Actions that can be applied to a [`PolygonEditor`](super::PolygonEditor).
///
/// Pointer positions are in view space.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    /// Primary pointer pressed; grabs a handle if one is under the pointer
    PointerDown(Point),
    /// Pointer moved while pressed
    PointerMove(Point),
    /// Primary pointer released; commits a drag
    PointerUp(Point),
    /// Place a vertex at the pointer
    PlacePoint(Point),
    /// Start a new empty region under the current label
    NewRegion,
    /// Delete the current region
    DeleteRegion,
    /// Create a label in the global label set
    NewLabel(String),
    /// Register an image identifier
    AddImage(String),
    /// Make an image current
    SelectImage {
        /// Image identifier
        id: String,
        /// Pixel dimensions, if the image was decoded
        dimensions: Option<ImageDimensions>,
    },
    /// Make a label current
    SelectLabel(String),
    /// Make a region of the current image and label current (0-based)
    SelectRegion(usize),
    /// Pan the view by a view-space delta
    Pan {
        dx: f64,
        dy: f64,
    },
    /// Zoom around a view-space cursor position
    ZoomAt {
        zoom: f64,
        cursor: Point,
    },
    /// The view layer's viewport changed size
    Resize {
        width: f64,
        height: f64,
    },
}
