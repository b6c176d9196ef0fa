//! Region document import/export.
//!
//! The only supported document is the regions JSON format: an object keyed
//! by image identifier, whose values are objects keyed by label, whose values
//! are arrays of regions, each region an array of `[x, y]` pairs.
//!
//! ```json
//! {
//!   "img1.png": {
//!     "cat": [[[10, 10], [20, 10], [20, 20]]]
//!   }
//! }
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use segedit::format::{AnnotationFormat, ExportOptions};
//! use segedit::format::formats::RegionsJsonFormat;
//!
//! let store = RegionsJsonFormat.import(Path::new("regions.json"))?;
//! RegionsJsonFormat.export(&store, Path::new("out.json"), &ExportOptions::default())?;
//! ```

mod error;
pub mod formats;
mod traits;

pub use error::FormatError;
pub use traits::{AnnotationFormat, ExportOptions, ExportResult};
