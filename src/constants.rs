//! Global constants for the segmentation editor

/// Half the side length of a rendered vertex handle, in view-space units.
/// The pointer hit-test box uses the same half-width.
pub const HANDLE_HALF_WIDTH: f64 = 4.0;

/// Minimum number of points before a polygon outline is drawn and committed
/// on point placement.
pub const MIN_OUTLINE_POINTS: usize = 2;

/// Default viewport size (width, height) until the view layer reports one.
pub const DEFAULT_VIEWPORT: (f64, f64) = (890.0, 720.0);

/// Zoom limits and step
pub mod zoom {
    /// Smallest zoom factor.
    pub const MIN: f64 = 0.1;
    /// Largest zoom factor.
    pub const MAX: f64 = 32.0;
    /// Multiplicative step for zoom in/out.
    pub const FACTOR: f64 = 1.2;
}
