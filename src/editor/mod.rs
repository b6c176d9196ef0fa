//! Interactive polygon editor.
//!
//! [`PolygonEditor`] owns the session: the region store, the active
//! selection, the in-progress [`PointSet`], its rendered handles and the
//! view transform. Every input is one method call (or one
//! [`EditorAction`] passed to [`PolygonEditor::apply`]), runs to completion
//! and either succeeds or leaves the store untouched.
//!
//! Points are always converted to image space before they reach the point
//! set or the store; panning and zooming only move the rendered handles.
//!
//! The point set is written into the store at the selected region index on
//! every mutation (second and later point placements, drag releases), so
//! switching image or label mid-edit never loses drawn points.

mod action;
mod handles;
mod state;


use std::path::{Path, PathBuf};

pub use action::EditorAction;
pub use handles::{HandleLayer, RenderedHandle};
pub use state::{EditState, Selection};

use crate::config::EditorConfig;
use crate::constants::{DEFAULT_VIEWPORT, MIN_OUTLINE_POINTS};
use crate::error::EditorError;
use crate::format::formats::RegionsJsonFormat;
use crate::format::{AnnotationFormat, ExportOptions, ExportResult};
use crate::image_provider::{ImageDimensions, ImageProvider};
use crate::model::{HandleId, Point, PointSet, Region};
use crate::region_store::{LabelSet, RegionStore};
use crate::view_transform::ViewTransform;

/// The region annotation engine's state machine.
#[derive(Debug, Clone)]
pub struct PolygonEditor {
    store: RegionStore,
    selection: Selection,
    points: PointSet,
    handles: HandleLayer,
    view: ViewTransform,
    edit_state: EditState,
    viewport: (f64, f64),
    image_dimensions: Option<ImageDimensions>,
    base_dir: Option<PathBuf>,
    export_options: ExportOptions,
    dirty: bool,
}

impl PolygonEditor {
    /// Create an editor with an empty store.
    pub fn new() -> Self {
        Self::with_store(RegionStore::new())
    }

    /// Create an editor over an existing store.
    pub fn with_store(store: RegionStore) -> Self {
        Self {
            store,
            selection: Selection::new(),
            points: PointSet::new(),
            handles: HandleLayer::default(),
            view: ViewTransform::identity(),
            edit_state: EditState::Idle,
            viewport: DEFAULT_VIEWPORT,
            image_dimensions: None,
            base_dir: None,
            export_options: ExportOptions::default(),
            dirty: false,
        }
    }

    /// Create an editor using preferences from `config`.
    pub fn with_config(config: &EditorConfig) -> Self {
        let mut editor = Self::new();
        editor.handles = HandleLayer::new(config.preferences.handle_half_width);
        editor.export_options = ExportOptions::new().pretty(config.preferences.pretty_print);
        editor
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The in-progress polygon.
    pub fn points(&self) -> &PointSet {
        &self.points
    }

    /// Rendered handles of the in-progress polygon.
    pub fn handles(&self) -> &HandleLayer {
        &self.handles
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    pub fn image_dimensions(&self) -> Option<ImageDimensions> {
        self.image_dimensions
    }

    /// Directory of the last loaded document; image identifiers are
    /// relative to it.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    /// The global label set, sorted.
    pub fn labels(&self) -> &LabelSet {
        self.store.labels()
    }

    /// Whether the store changed since the last load or save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Region numbers (1-based) for the current image and label, as listed
    /// to the user.
    pub fn region_list(&self) -> Vec<usize> {
        let count = match (self.selection.image(), self.selection.label()) {
            (Some(image), Some(label)) => self.store.regions_for(image, label).len(),
            _ => 0,
        };
        (1..=count).collect()
    }

    /// The region the selection points at, if any.
    pub fn current_region(&self) -> Option<&Region> {
        let image = self.selection.image()?;
        let label = self.selection.label()?;
        let index = self.selection.region()?;
        self.store.region(image, label, index).ok()
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Apply one input action.
    pub fn apply(&mut self, action: EditorAction) -> Result<(), EditorError> {
        match action {
            EditorAction::PointerDown(pos) => self.pointer_down(pos),
            EditorAction::PointerMove(pos) => self.pointer_move(pos),
            EditorAction::PointerUp(pos) => self.pointer_up(pos)?,
            EditorAction::PlacePoint(pos) => {
                self.place_point(pos)?;
            }
            EditorAction::NewRegion => {
                self.new_region()?;
            }
            EditorAction::DeleteRegion => {
                self.delete_region()?;
            }
            EditorAction::NewLabel(name) => {
                self.new_label(&name);
            }
            EditorAction::AddImage(id) => {
                self.add_image(&id);
            }
            EditorAction::SelectImage { id, dimensions } => self.select_image(&id, dimensions),
            EditorAction::SelectLabel(label) => self.select_label(&label),
            EditorAction::SelectRegion(index) => self.select_region(index)?,
            EditorAction::Pan { dx, dy } => self.pan_by(dx, dy),
            EditorAction::ZoomAt { zoom, cursor } => self.zoom_at(zoom, cursor),
            EditorAction::Resize { width, height } => self.set_viewport(width, height),
        }
        Ok(())
    }

    // ========================================================================
    // Pointer handling
    // ========================================================================

    /// Grab the handle under `pos`, if any.
    ///
    /// Missing every handle is not an error: the press may be the start of
    /// a pan gesture, which arrives on its own channel.
    pub fn pointer_down(&mut self, pos: Point) {
        self.edit_state = match self.handles.hit_test(pos) {
            Some(handle) => {
                log::debug!("Grabbed handle {} at ({:.1}, {:.1})", handle, pos.x, pos.y);
                EditState::Dragging { handle }
            }
            None => EditState::Idle,
        };
    }

    /// Move the grabbed handle on screen. The point set is left alone until
    /// release.
    pub fn pointer_move(&mut self, pos: Point) {
        if !pos.is_finite() {
            return;
        }
        if let EditState::Dragging { handle } = self.edit_state {
            log::trace!("Dragging handle {} to ({:.1}, {:.1})", handle, pos.x, pos.y);
            self.handles.move_handle(handle, pos);
        }
    }

    /// Release the grabbed handle at `pos` and commit the polygon.
    pub fn pointer_up(&mut self, pos: Point) -> Result<(), EditorError> {
        let EditState::Dragging { handle } = self.edit_state else {
            return Ok(());
        };
        self.edit_state = EditState::Idle;

        let (image, label, index) = self.commit_target()?;
        let image_pos = match self.image_point(pos) {
            Ok(image_pos) => image_pos,
            Err(e) => {
                // Put the dragged handle back where the point set has it
                self.handles.sync(&self.points, &self.view);
                return Err(e);
            }
        };

        match self.points.move_point(handle, image_pos) {
            Ok(()) => {}
            Err(e) if !e.is_user_visible() => {
                log::trace!("Ignoring release: {}", e);
                return Ok(());
            }
            Err(e) => return Err(e),
        }
        self.handles.move_handle(handle, self.view.to_view(image_pos));

        log::debug!(
            "Moved vertex {} of {}/{}[{}] to ({:.1}, {:.1})",
            handle.index(),
            image,
            label,
            index,
            image_pos.x,
            image_pos.y
        );
        self.write_region(&image, &label, index)
    }

    /// Add a vertex at the view-space position `pos`.
    ///
    /// From the second vertex on, the polygon is written into the store
    /// immediately. A position without a finite image coordinate is
    /// rejected before anything changes.
    pub fn place_point(&mut self, pos: Point) -> Result<HandleId, EditorError> {
        let (image, label, index) = self.commit_target()?;
        let image_pos = self.image_point(pos)?;

        let handle = self.points.add_point(image_pos);
        self.handles.push(handle, self.view.to_view(image_pos));
        log::debug!(
            "Placed vertex {} of {}/{}[{}] at ({:.1}, {:.1})",
            handle.index(),
            image,
            label,
            index,
            image_pos.x,
            image_pos.y
        );

        if self.points.len() >= MIN_OUTLINE_POINTS {
            self.write_region(&image, &label, index)?;
        }
        Ok(handle)
    }

    // ========================================================================
    // Region lifecycle
    // ========================================================================

    /// Append an empty region under the current label and select it.
    pub fn new_region(&mut self) -> Result<usize, EditorError> {
        let image = self.selection.require_image()?.to_string();
        let label = self.selection.require_label()?.to_string();

        let index = self.store.append_region(&image, &label);
        self.selection.select_region(index);
        self.clear_drawing();
        self.dirty = true;

        log::info!("Created region {} for {}/{}", index + 1, image, label);
        Ok(index)
    }

    /// Delete the current region.
    pub fn delete_region(&mut self) -> Result<Region, EditorError> {
        let index = self.selection.require_region()?;
        let image = self.selection.require_image()?.to_string();
        let label = self.selection.require_label()?.to_string();

        let removed = self.store.delete_region(&image, &label, index)?;
        self.selection.clear_region();
        self.clear_drawing();
        self.dirty = true;

        log::info!("Deleted region {} from {}/{}", index + 1, image, label);
        Ok(removed)
    }

    /// Select a saved region and rebuild its handles for editing.
    ///
    /// The view is recentred on the region's bounding box; stored data is
    /// not touched.
    pub fn select_region(&mut self, index: usize) -> Result<(), EditorError> {
        let image = self.selection.require_image()?;
        let label = self.selection.require_label()?;
        let region = self.store.region(image, label, index)?.clone();

        self.selection.select_region(index);
        self.clear_drawing();

        for &point in region.points() {
            let handle = self.points.add_point(point);
            self.handles.push(handle, self.view.to_view(point));
        }

        if let Some(bbox) = region.bounding_box() {
            self.view = self
                .view
                .centered_on(bbox.center(), self.viewport, self.image_dimensions);
            self.handles.sync(&self.points, &self.view);
        }

        log::debug!(
            "Selected region {} ({} points)",
            index + 1,
            region.len()
        );
        Ok(())
    }

    // ========================================================================
    // Images and labels
    // ========================================================================

    /// Register an image identifier. Returns false if it was already known.
    pub fn add_image(&mut self, image_id: &str) -> bool {
        let added = self.store.register_image(image_id);
        if added {
            self.dirty = true;
            log::info!("Added image {}", image_id);
        }
        added
    }

    /// Create a label in the global label set. Blank names are ignored;
    /// other names are stored exactly as given.
    pub fn new_label(&mut self, name: &str) -> bool {
        if name.trim().is_empty() {
            log::debug!("Ignoring blank label name");
            return false;
        }
        let added = self.store.add_label(name);
        if added {
            log::info!("Created label '{}'", name);
        }
        added
    }

    /// Make `image_id` current, registering it if it is new.
    pub fn select_image(&mut self, image_id: &str, dimensions: Option<ImageDimensions>) {
        if self.store.register_image(image_id) {
            self.dirty = true;
        }
        self.selection.set_image(image_id);
        self.image_dimensions = dimensions;
        self.clear_drawing();
        log::debug!("Selected image {} ({:?})", image_id, dimensions);
    }

    /// Make `image_id` current, asking `provider` for its dimensions.
    ///
    /// A provider failure is logged and the image is selected without
    /// dimensions.
    pub fn select_image_from(&mut self, provider: &dyn ImageProvider, image_id: &str) {
        let dimensions = provider
            .dimensions(image_id)
            .inspect_err(|e| log::warn!("No dimensions for image {}: {}", image_id, e))
            .ok();
        self.select_image(image_id, dimensions);
    }

    /// Make `label` current.
    pub fn select_label(&mut self, label: &str) {
        self.selection.set_label(label);
        self.clear_drawing();
        log::debug!("Selected label '{}'", label);
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Pan the view. Handles move on screen; stored points do not.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.view = self.view.pan_by(dx, dy);
        self.handles.sync(&self.points, &self.view);
    }

    /// Zoom around a view-space cursor position.
    pub fn zoom_at(&mut self, zoom: f64, cursor: Point) {
        self.view = self.view.zoom_at(zoom, cursor);
        self.handles.sync(&self.points, &self.view);
        log::debug!("Zoom {:.2}x", self.view.zoom);
    }

    /// Record the viewport size used for recentring.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    // ========================================================================
    // Load / save
    // ========================================================================

    /// Load a regions document, replacing the store.
    ///
    /// On failure the current store, labels and selection are kept.
    pub fn load_document(&mut self, path: &Path) -> Result<(), EditorError> {
        let store = RegionsJsonFormat.import(path)?;
        self.install_store(store);
        self.base_dir = path.parent().map(Path::to_path_buf);
        Ok(())
    }

    /// Load a regions document from JSON text, replacing the store.
    pub fn load_from_str(&mut self, json: &str) -> Result<(), EditorError> {
        let store = RegionsJsonFormat.import_from_bytes(json.as_bytes())?;
        self.install_store(store);
        Ok(())
    }

    /// Save the whole store to `path`.
    pub fn save_document(&mut self, path: &Path) -> Result<ExportResult, EditorError> {
        let result = RegionsJsonFormat.export(&self.store, path, &self.export_options)?;
        self.dirty = false;
        Ok(result)
    }

    /// Serialize the whole store to JSON text.
    pub fn save_to_string(&self) -> Result<String, EditorError> {
        let (bytes, _) = RegionsJsonFormat.export_to_bytes(&self.store, &self.export_options)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn install_store(&mut self, store: RegionStore) {
        let previous = std::mem::replace(&mut self.store, store);
        self.store.merge_labels(previous.labels());
        self.selection.clear();
        self.image_dimensions = None;
        self.clear_drawing();
        self.dirty = false;
    }

    /// The selected (image, label, region index), validated against the store.
    fn commit_target(&self) -> Result<(String, String, usize), EditorError> {
        let index = self.selection.require_region()?;
        let image = self.selection.require_image()?;
        let label = self.selection.require_label()?;
        self.store.region(image, label, index)?;
        Ok((image.to_string(), label.to_string(), index))
    }

    /// Map a view-space position to image space, rejecting NaN and infinite
    /// results so they never reach the store.
    fn image_point(&self, pos: Point) -> Result<Point, EditorError> {
        let image_pos = self.view.to_image(pos);
        if image_pos.is_finite() {
            Ok(image_pos)
        } else {
            Err(EditorError::NonFiniteCoordinate {
                x: image_pos.x,
                y: image_pos.y,
            })
        }
    }

    fn write_region(&mut self, image: &str, label: &str, index: usize) -> Result<(), EditorError> {
        self.store
            .set_region(image, label, index, self.points.to_region())?;
        self.dirty = true;
        Ok(())
    }

    fn clear_drawing(&mut self) {
        self.points.clear();
        self.handles.clear();
        self.edit_state = EditState::Idle;
    }
}

impl Default for PolygonEditor {
    fn default() -> Self {
        Self::new()
    }
}
