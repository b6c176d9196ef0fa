//! Image provider boundary.
//!
//! Decoding and displaying bitmaps happens outside the editor. The editor
//! only needs an image's pixel dimensions, which it uses to keep recentred
//! views inside the image.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageError;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Something that can report the dimensions of an image by identifier.
pub trait ImageProvider {
    /// Dimensions of the image named `image_id`.
    fn dimensions(&self, image_id: &str) -> Result<ImageDimensions, ImageError>;
}

/// Reads image headers from files under a base directory.
///
/// Image identifiers are file names relative to the directory the regions
/// document was loaded from.
#[derive(Debug, Clone)]
pub struct FsImageProvider {
    base_dir: PathBuf,
}

impl FsImageProvider {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Full path for an image identifier.
    pub fn resolve(&self, image_id: &str) -> PathBuf {
        self.base_dir.join(image_id)
    }
}

impl ImageProvider for FsImageProvider {
    fn dimensions(&self, image_id: &str) -> Result<ImageDimensions, ImageError> {
        let path = self.resolve(image_id);
        let (width, height) = image::image_dimensions(&path)?;
        log::debug!("Image {:?}: {}x{}", path, width, height);
        Ok(ImageDimensions::new(width, height))
    }
}

/// In-memory provider, for callers that already decoded their images.
impl ImageProvider for HashMap<String, ImageDimensions> {
    fn dimensions(&self, image_id: &str) -> Result<ImageDimensions, ImageError> {
        self.get(image_id).copied().ok_or_else(|| {
            ImageError::IoError(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no dimensions known for image '{image_id}'"),
            ))
        })
    }
}
