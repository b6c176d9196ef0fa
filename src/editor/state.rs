//! Session-scoped editor state: the active selection and the drag state.

use crate::error::{EditorError, SelectionKind};
use crate::model::HandleId;

/// Pointer interaction state of the polygon editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    /// No handle grabbed.
    #[default]
    Idle,
    /// A handle is grabbed and follows the pointer until release.
    Dragging {
        /// The grabbed handle
        handle: HandleId,
    },
}

impl EditState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, EditState::Dragging { .. })
    }

    /// The grabbed handle, if dragging.
    pub fn grabbed(&self) -> Option<HandleId> {
        match self {
            EditState::Dragging { handle } => Some(*handle),
            EditState::Idle => None,
        }
    }
}

/// The current image, label and region of the session.
///
/// The region index, when set, addresses
/// `RegionStore[image][label][index]`. Changing the image or the label
/// always clears it, so a region index can never outlive the list it
/// was taken from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    image: Option<String>,
    label: Option<String>,
    region: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn region(&self) -> Option<usize> {
        self.region
    }

    pub fn require_image(&self) -> Result<&str, EditorError> {
        self.image()
            .ok_or(EditorError::NoSelection(SelectionKind::Image))
    }

    pub fn require_label(&self) -> Result<&str, EditorError> {
        self.label()
            .ok_or(EditorError::NoSelection(SelectionKind::Label))
    }

    pub fn require_region(&self) -> Result<usize, EditorError> {
        self.region
            .ok_or(EditorError::NoSelection(SelectionKind::Region))
    }

    /// Switch image. Clears the region index.
    pub fn set_image(&mut self, image_id: &str) {
        self.image = Some(image_id.to_string());
        self.region = None;
    }

    /// Switch label. Clears the region index.
    pub fn set_label(&mut self, label: &str) {
        self.label = Some(label.to_string());
        self.region = None;
    }

    /// Point at a region of the current image and label.
    pub fn select_region(&mut self, index: usize) {
        self.region = Some(index);
    }

    pub fn clear_region(&mut self) {
        self.region = None;
    }

    /// Forget image, label and region.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switching_clears_region() {
        let mut selection = Selection::new();
        selection.set_image("a.png");
        selection.set_label("cat");
        selection.select_region(2);
        assert_eq!(selection.require_region().unwrap(), 2);

        selection.set_label("dog");
        assert!(matches!(
            selection.require_region(),
            Err(EditorError::NoSelection(SelectionKind::Region))
        ));

        selection.select_region(0);
        selection.set_image("b.png");
        assert_eq!(selection.region(), None);
        assert_eq!(selection.label(), Some("dog"));
    }

    #[test]
    fn test_require_reports_missing_part() {
        let selection = Selection::new();
        assert!(matches!(
            selection.require_image(),
            Err(EditorError::NoSelection(SelectionKind::Image))
        ));
        assert!(matches!(
            selection.require_label(),
            Err(EditorError::NoSelection(SelectionKind::Label))
        ));
    }

    #[test]
    fn test_edit_state() {
        assert!(!EditState::default().is_dragging());
        assert_eq!(EditState::Idle.grabbed(), None);
    }
}
