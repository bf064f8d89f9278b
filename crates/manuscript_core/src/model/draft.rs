//! Draft slot model.
//!
//! # Responsibility
//! - Define the three fixed draft slots and their display labels.
//! - Validate slot indexes at the boundary.
//!
//! # Invariants
//! - Exactly three slots exist; `Draft::id` is 1..=3 and never changes.
//! - Paragraphs are replaced wholesale, never updated in place.

use crate::model::paragraph::{Paragraph, ParagraphId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of draft slots.
pub const DRAFT_SLOT_COUNT: usize = 3;

/// Error returned when a slot index is outside `0..DRAFT_SLOT_COUNT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDraftIndex(pub u8);

impl Display for InvalidDraftIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "draft index {} is out of range; expected 0..{}",
            self.0, DRAFT_SLOT_COUNT
        )
    }
}

impl Error for InvalidDraftIndex {}

/// Zero-based draft slot index, guaranteed to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DraftIndex(u8);

impl DraftIndex {
    pub const FIRST: Self = Self(0);
    pub const SECOND: Self = Self(1);
    pub const THIRD: Self = Self(2);

    /// Validates a zero-based slot index.
    pub fn new(value: u8) -> Result<Self, InvalidDraftIndex> {
        if usize::from(value) < DRAFT_SLOT_COUNT {
            Ok(Self(value))
        } else {
            Err(InvalidDraftIndex(value))
        }
    }

    /// Validates a one-based slot number as shown to users.
    pub fn from_slot_number(number: u8) -> Result<Self, InvalidDraftIndex> {
        match number.checked_sub(1) {
            Some(value) => Self::new(value).map_err(|_| InvalidDraftIndex(number)),
            None => Err(InvalidDraftIndex(number)),
        }
    }

    /// All slots in display order.
    pub fn all() -> [Self; DRAFT_SLOT_COUNT] {
        [Self::FIRST, Self::SECOND, Self::THIRD]
    }

    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    /// One-based slot number (`Draft::id`).
    pub fn slot_number(self) -> u8 {
        self.0 + 1
    }
}

impl TryFrom<u8> for DraftIndex {
    type Error = InvalidDraftIndex;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DraftIndex> for u8 {
    fn from(value: DraftIndex) -> Self {
        value.0
    }
}

impl Display for DraftIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slot_number())
    }
}

/// One draft slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Stable slot number, 1..=3.
    pub id: u8,
    /// Fixed label, e.g. `Draft 1`.
    pub title: String,
    /// User-editable alias shown next to the label.
    #[serde(default)]
    pub custom_title: String,
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl Draft {
    /// Creates an empty slot with its fixed label.
    pub fn empty(index: DraftIndex) -> Self {
        Self {
            id: index.slot_number(),
            title: format!("Draft {}", index.slot_number()),
            custom_title: String::new(),
            paragraphs: Vec::new(),
        }
    }

    /// Alias when set, fixed label otherwise.
    pub fn display_title(&self) -> &str {
        let alias = self.custom_title.trim();
        if alias.is_empty() {
            self.title.as_str()
        } else {
            alias
        }
    }

    pub fn paragraph(&self, id: &str) -> Option<&Paragraph> {
        self.paragraphs.iter().find(|paragraph| paragraph.id == id)
    }

    pub fn paragraph_ids(&self) -> impl Iterator<Item = &ParagraphId> {
        self.paragraphs.iter().map(|paragraph| &paragraph.id)
    }

    /// Full draft text with paragraphs separated by a blank line.
    pub fn full_text(&self) -> String {
        crate::text::export::join_paragraphs(&self.paragraphs)
    }
}

/// The three empty slots used as the default state.
pub fn default_drafts() -> [Draft; DRAFT_SLOT_COUNT] {
    DraftIndex::all().map(Draft::empty)
}

#[cfg(test)]
mod tests {
    use super::{Draft, DraftIndex};

    #[test]
    fn draft_index_rejects_out_of_range_values() {
        assert!(DraftIndex::new(2).is_ok());
        assert_eq!(DraftIndex::new(3).unwrap_err().0, 3);
        assert_eq!(DraftIndex::from_slot_number(1).unwrap(), DraftIndex::FIRST);
        assert!(DraftIndex::from_slot_number(0).is_err());
        assert!(DraftIndex::from_slot_number(4).is_err());
    }

    #[test]
    fn draft_index_deserialization_is_validated() {
        assert_eq!(serde_json::from_str::<DraftIndex>("1").unwrap(), DraftIndex::SECOND);
        assert!(serde_json::from_str::<DraftIndex>("7").is_err());
    }

    #[test]
    fn display_title_prefers_non_blank_alias() {
        let mut draft = Draft::empty(DraftIndex::THIRD);
        assert_eq!(draft.display_title(), "Draft 3");
        draft.custom_title = "  ".to_string();
        assert_eq!(draft.display_title(), "Draft 3");
        draft.custom_title = "Editor cut".to_string();
        assert_eq!(draft.display_title(), "Editor cut");
    }
}
