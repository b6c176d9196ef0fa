//! Error types for editor operations.

use std::fmt;

use thiserror::Error;

use crate::format::FormatError;
use crate::model::HandleId;

/// Which part of the active selection an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Image,
    Label,
    Region,
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionKind::Image => "image",
            SelectionKind::Label => "label",
            SelectionKind::Region => "region",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while editing regions.
///
/// Every failure is local to the operation that raised it; the region store
/// is validated before it is mutated, so an error never leaves it half-updated.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Region index is not valid for the (image, label) pair, typically
    /// because the index was captured before a deletion shifted the list.
    #[error("Region index {index} out of range for label '{label}' on image '{image}' ({len} regions)")]
    IndexOutOfRange {
        /// Image identifier
        image: String,
        /// Label name
        label: String,
        /// The rejected index
        index: usize,
        /// Number of regions actually present
        len: usize,
    },

    /// An operation needed a current image, label or region and none was set.
    #[error("No {0} selected")]
    NoSelection(SelectionKind),

    /// A handle from a cleared point set was used. Never shown to the user.
    #[error("Unknown handle {0}")]
    UnknownHandle(HandleId),

    /// A pointer position mapped to a NaN or infinite image coordinate.
    #[error("Pointer position ({x}, {y}) has no finite image coordinate")]
    NonFiniteCoordinate {
        /// Image-space X
        x: f64,
        /// Image-space Y
        y: f64,
    },

    /// Load/save failure
    #[error(transparent)]
    Format(#[from] FormatError),
}

impl EditorError {
    /// Whether this error should be reported to the user.
    ///
    /// Stale handles only arise from event ordering in the input layer and
    /// are dropped silently.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, EditorError::UnknownHandle(_))
    }
}
