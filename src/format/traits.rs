//! Trait definitions for region document formats.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::region_store::RegionStore;

/// Trait for region document import/export implementations.
///
/// Implementations convert between a [`RegionStore`] and a file format.
/// Import is all-or-nothing: either a complete store is returned or an
/// error, never a partially populated store.
pub trait AnnotationFormat: Send + Sync {
    /// Unique identifier for this format (e.g., "regions-json").
    fn id(&self) -> &'static str;

    /// Human-readable name for UI display.
    fn display_name(&self) -> &'static str;

    /// File extensions this format uses.
    fn extensions(&self) -> &[&'static str];

    /// Export the store to `path`, replacing any existing file.
    fn export(
        &self,
        store: &RegionStore,
        path: &Path,
        options: &ExportOptions,
    ) -> Result<ExportResult, FormatError>;

    /// Export the store to an in-memory document.
    fn export_to_bytes(
        &self,
        store: &RegionStore,
        options: &ExportOptions,
    ) -> Result<(Vec<u8>, ExportResult), FormatError>;

    /// Import a store from `path`.
    fn import(&self, path: &Path) -> Result<RegionStore, FormatError>;

    /// Import a store from an in-memory document.
    fn import_from_bytes(&self, bytes: &[u8]) -> Result<RegionStore, FormatError>;
}

/// Options for export operations.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Pretty-print the document for human readability.
    pub pretty: bool,
}

impl ExportOptions {
    /// Create new export options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pretty printing.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}

/// Result of an export operation.
#[derive(Debug, Default)]
pub struct ExportResult {
    /// Number of images exported.
    pub images_exported: usize,

    /// Number of regions exported.
    pub regions_exported: usize,

    /// Files created during export.
    pub files_created: Vec<PathBuf>,
}

impl ExportResult {
    /// Create an export result describing `store`.
    pub fn for_store(store: &RegionStore) -> Self {
        Self {
            images_exported: store.image_count(),
            regions_exported: store.region_count(),
            files_created: Vec::new(),
        }
    }
}
