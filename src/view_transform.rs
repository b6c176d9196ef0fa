//! View ↔ image coordinate mapping.
//!
//! View space is what the pointer reports; image space is what regions are
//! stored in. A point maps to view space as `image * zoom + pan`. Changing
//! the pan or zoom only affects future conversions, never stored data.

use crate::constants::zoom;
use crate::image_provider::ImageDimensions;
use crate::model::Point;

/// Represents pan/zoom transform state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f64,
    /// View-space position of the image origin (X)
    pub pan_x: f64,
    /// View-space position of the image origin (Y)
    pub pan_y: f64,
}

impl ViewTransform {
    /// Create a new transform with the given zoom and pan.
    pub fn new(zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self { zoom, pan_x, pan_y }
    }

    /// Create an identity transform (zoom=1, no pan).
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Map an image-space point to view space.
    pub fn to_view(&self, image_point: Point) -> Point {
        Point::new(
            image_point.x * self.zoom + self.pan_x,
            image_point.y * self.zoom + self.pan_y,
        )
    }

    /// Map a view-space point to image space.
    pub fn to_image(&self, view_point: Point) -> Point {
        Point::new(
            (view_point.x - self.pan_x) / self.zoom,
            (view_point.y - self.pan_y) / self.zoom,
        )
    }

    /// Apply a pan delta (in view units) to the transform.
    ///
    /// A non-finite delta leaves the transform unchanged.
    pub fn pan_by(&self, dx: f64, dy: f64) -> ViewTransform {
        if !(dx.is_finite() && dy.is_finite()) {
            return *self;
        }
        ViewTransform {
            zoom: self.zoom,
            pan_x: self.pan_x + dx,
            pan_y: self.pan_y + dy,
        }
    }

    /// Change the zoom while keeping the image point under `cursor` fixed.
    ///
    /// `new_zoom` is clamped to the allowed zoom range. A NaN zoom or a
    /// non-finite cursor leaves the transform unchanged.
    pub fn zoom_at(&self, new_zoom: f64, cursor: Point) -> ViewTransform {
        if new_zoom.is_nan() || !cursor.is_finite() {
            return *self;
        }
        let new_zoom = new_zoom.clamp(zoom::MIN, zoom::MAX);
        let anchor = self.to_image(cursor);

        ViewTransform {
            zoom: new_zoom,
            pan_x: cursor.x - anchor.x * new_zoom,
            pan_y: cursor.y - anchor.y * new_zoom,
        }
    }

    /// Zoom in by one step around `cursor`.
    pub fn zoom_in(&self, cursor: Point) -> ViewTransform {
        self.zoom_at(self.zoom * zoom::FACTOR, cursor)
    }

    /// Zoom out by one step around `cursor`.
    pub fn zoom_out(&self, cursor: Point) -> ViewTransform {
        self.zoom_at(self.zoom / zoom::FACTOR, cursor)
    }

    /// Pan so that `image_point` sits at the centre of a `viewport`.
    ///
    /// With known image dimensions the pan is clamped to the image extent,
    /// the way a scroll region stops at its edges; an image smaller than the
    /// viewport stays anchored at the origin on that axis.
    pub fn centered_on(
        &self,
        image_point: Point,
        viewport: (f64, f64),
        image_size: Option<ImageDimensions>,
    ) -> ViewTransform {
        let (view_w, view_h) = viewport;
        let mut pan_x = view_w / 2.0 - image_point.x * self.zoom;
        let mut pan_y = view_h / 2.0 - image_point.y * self.zoom;

        if let Some(size) = image_size {
            pan_x = clamp_pan(pan_x, view_w, f64::from(size.width) * self.zoom);
            pan_y = clamp_pan(pan_y, view_h, f64::from(size.height) * self.zoom);
        }

        ViewTransform {
            zoom: self.zoom,
            pan_x,
            pan_y,
        }
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

fn clamp_pan(pan: f64, viewport: f64, content: f64) -> f64 {
    let lower = (viewport - content).min(0.0);
    pan.clamp(lower, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() <= EPSILON && (a.y - b.y).abs() <= EPSILON
    }

    #[test]
    fn test_identity_transform() {
        let t = ViewTransform::identity();
        let p = Point::new(12.5, -3.0);
        assert_eq!(t.to_view(p), p);
        assert_eq!(t.to_image(p), p);
    }

    #[test]
    fn test_round_trip_for_many_transforms() {
        let transforms = [
            ViewTransform::identity(),
            ViewTransform::new(1.0, -350.0, 125.0),
            ViewTransform::new(2.5, 17.25, -999.5),
            ViewTransform::new(0.3, 1e5, -1e5),
            ViewTransform::new(7.0, 0.1, 0.2),
        ];
        let points = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 20.0),
            Point::new(-4.75, 1234.125),
            Point::new(4096.0, 3072.0),
        ];

        for t in transforms {
            for p in points {
                assert!(approx_eq(t.to_image(t.to_view(p)), p), "{t:?} {p:?}");
            }
        }
    }

    #[test]
    fn test_pan_shifts_view_not_image() {
        let t = ViewTransform::identity().pan_by(-100.0, -50.0);
        assert_eq!(t.to_view(Point::new(150.0, 80.0)), Point::new(50.0, 30.0));
        assert_eq!(t.to_image(Point::new(50.0, 30.0)), Point::new(150.0, 80.0));
    }

    #[test]
    fn test_pan_preserves_zoom() {
        let t = ViewTransform::new(2.5, 0.0, 0.0);
        let panned = t.pan_by(100.0, 200.0);

        assert_eq!(panned.zoom, 2.5);
        assert_eq!(panned.pan_x, 100.0);
        assert_eq!(panned.pan_y, 200.0);
    }

    #[test]
    fn test_zoom_at_keeps_cursor_point() {
        let t = ViewTransform::new(1.0, 50.0, 30.0);
        let cursor = Point::new(150.0, 120.0);
        let before = t.to_image(cursor);

        let zoomed = t.zoom_at(2.0, cursor);
        assert_eq!(zoomed.zoom, 2.0);
        assert!(approx_eq(zoomed.to_image(cursor), before));
    }

    #[test]
    fn test_zoom_is_clamped() {
        let t = ViewTransform::identity();
        assert_eq!(t.zoom_at(1000.0, Point::default()).zoom, zoom::MAX);
        assert_eq!(t.zoom_at(0.0, Point::default()).zoom, zoom::MIN);
    }

    #[test]
    fn test_non_finite_input_is_ignored() {
        let t = ViewTransform::new(2.0, 10.0, -5.0);
        assert_eq!(t.zoom_at(f64::NAN, Point::new(1.0, 1.0)), t);
        assert_eq!(t.zoom_at(3.0, Point::new(f64::INFINITY, 1.0)), t);
        assert_eq!(t.pan_by(f64::NAN, 1.0), t);
        assert_eq!(t.pan_by(1.0, f64::NEG_INFINITY), t);

        // Infinite zoom is still clamped like any other out-of-range value
        assert_eq!(t.zoom_at(f64::INFINITY, Point::default()).zoom, zoom::MAX);
    }

    #[test]
    fn test_zoom_in_then_out() {
        let cursor = Point::new(40.0, 60.0);
        let t = ViewTransform::new(1.0, 5.0, 5.0);
        let back = t.zoom_in(cursor).zoom_out(cursor);
        assert!((back.zoom - 1.0).abs() < EPSILON);
        assert!((back.pan_x - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_centered_on_without_dimensions() {
        let t = ViewTransform::identity().centered_on(Point::new(500.0, 400.0), (200.0, 100.0), None);
        assert!(approx_eq(t.to_view(Point::new(500.0, 400.0)), Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_centered_on_clamps_to_image() {
        let size = Some(ImageDimensions::new(1000, 800));

        // Interior point is centred exactly
        let t = ViewTransform::identity().centered_on(Point::new(500.0, 400.0), (200.0, 100.0), size);
        assert!(approx_eq(t.to_view(Point::new(500.0, 400.0)), Point::new(100.0, 50.0)));

        // Near the top-left corner the view stops at the image origin
        let t = ViewTransform::identity().centered_on(Point::new(10.0, 10.0), (200.0, 100.0), size);
        assert_eq!((t.pan_x, t.pan_y), (0.0, 0.0));

        // Near the bottom-right corner the view stops at the far edge
        let t = ViewTransform::identity().centered_on(Point::new(995.0, 790.0), (200.0, 100.0), size);
        assert_eq!((t.pan_x, t.pan_y), (-800.0, -700.0));

        // An image smaller than the viewport does not scroll
        let small = Some(ImageDimensions::new(50, 50));
        let t = ViewTransform::identity().centered_on(Point::new(25.0, 25.0), (200.0, 100.0), small);
        assert_eq!((t.pan_x, t.pan_y), (0.0, 0.0));
    }
}
