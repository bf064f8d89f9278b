//! Errors raised while applying editor events.

use crate::model::draft::InvalidDraftIndex;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Slot index outside the three draft slots.
    InvalidDraftIndex(u8),
    /// No paragraph with this id in the addressed store.
    ParagraphNotFound(String),
    /// Position outside the final manuscript.
    IndexOutOfRange { index: usize, len: usize },
    /// Draft paragraph was dismissed by the user and cannot be inserted.
    ParagraphDismissed(String),
    /// File is not a supported image type.
    UnsupportedImage(String),
    /// Another AI call of this kind has not completed yet.
    AiCallInFlight(&'static str),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDraftIndex(value) => write!(f, "invalid draft index: {value}"),
            Self::ParagraphNotFound(id) => write!(f, "paragraph not found: {id}"),
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for manuscript of length {len}")
            }
            Self::ParagraphDismissed(id) => write!(f, "paragraph is dismissed: {id}"),
            Self::UnsupportedImage(name) => write!(f, "unsupported image file: {name}"),
            Self::AiCallInFlight(kind) => write!(f, "{kind} request already in flight"),
        }
    }
}

impl Error for EditorError {}

impl From<InvalidDraftIndex> for EditorError {
    fn from(value: InvalidDraftIndex) -> Self {
        Self::InvalidDraftIndex(value.0)
    }
}
