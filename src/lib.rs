//! segedit - Polygon Region Annotation Engine
//!
//! Binds raster images to labeled polygon regions, edits them interactively
//! through a pannable, zoomable view, and reads and writes them as a JSON
//! document keyed by image and label.
//!
//! The editor is headless: a view layer feeds it pointer and button input
//! as [`EditorAction`]s and draws whatever [`PolygonEditor::handles`]
//! reports.

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod format;
pub mod image_provider;
pub mod model;
pub mod region_store;
pub mod view_transform;

pub use config::{ConfigError, EditorConfig, LogLevel, Preferences};
pub use editor::{EditState, EditorAction, HandleLayer, PolygonEditor, RenderedHandle, Selection};
pub use error::{EditorError, SelectionKind};
pub use format::formats::RegionsJsonFormat;
pub use format::{AnnotationFormat, ExportOptions, ExportResult, FormatError};
pub use image_provider::{FsImageProvider, ImageDimensions, ImageProvider};
pub use model::{BoundingBox, HandleId, Point, PointSet, Region};
pub use region_store::{LabelSet, RegionStore};
pub use view_transform::ViewTransform;
