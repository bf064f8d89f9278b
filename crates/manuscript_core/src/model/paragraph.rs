//! Paragraph record model.
//!
//! # Responsibility
//! - Define the canonical paragraph shape used by both stores.
//! - Provide copy helpers that keep provenance fields consistent.
//!
//! # Invariants
//! - `original_id` on a draft paragraph equals its own `id`.
//! - `original_id` on a final paragraph points at the draft paragraph it was
//!   copied from, or is `None` when the paragraph was created in place.
//! - Provenance fields are copied at insertion time and never re-derived.

use crate::model::draft::DraftIndex;
use serde::{Deserialize, Serialize};

/// Paragraph identifier, unique within its owning store.
pub type ParagraphId = String;

/// One paragraph in a draft slot or in the final manuscript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub id: ParagraphId,
    pub text: String,
    /// Draft slot this paragraph came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_draft_index: Option<DraftIndex>,
    /// Zero-based position inside the source draft at split time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_para_index: Option<usize>,
    /// Link back to the draft paragraph a final copy was made from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_id: Option<ParagraphId>,
}

impl Paragraph {
    /// Creates a paragraph produced by splitting a draft.
    ///
    /// The chunk is its own original, so `original_id` mirrors `id`.
    pub fn from_draft(
        id: ParagraphId,
        text: impl Into<String>,
        draft: DraftIndex,
        position: usize,
    ) -> Self {
        Self {
            original_id: Some(id.clone()),
            id,
            text: text.into(),
            source_draft_index: Some(draft),
            source_para_index: Some(position),
        }
    }

    /// Creates a paragraph directly in the final store (image, AI output).
    pub fn detached(id: ParagraphId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            source_draft_index: None,
            source_para_index: None,
            original_id: None,
        }
    }

    /// Builds a final-store copy of `self` under a freshly minted id.
    ///
    /// `is_final_copy` tells whether `self` already lives in the final
    /// store; in that case its `original_id` is preserved instead of being
    /// pointed at the copy itself.
    pub fn copy_for_final(&self, new_id: ParagraphId, is_final_copy: bool) -> Self {
        let original_id = if is_final_copy {
            self.original_id.clone()
        } else {
            Some(self.id.clone())
        };
        Self {
            id: new_id,
            text: self.text.clone(),
            source_draft_index: self.source_draft_index,
            source_para_index: self.source_para_index,
            original_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Paragraph;
    use crate::model::draft::DraftIndex;

    #[test]
    fn draft_copy_links_back_to_source_id() {
        let source = Paragraph::from_draft("para-1".to_string(), "a", DraftIndex::FIRST, 0);
        let copy = source.copy_for_final("final-1".to_string(), false);
        assert_eq!(copy.original_id.as_deref(), Some("para-1"));
        assert_eq!(copy.source_draft_index, Some(DraftIndex::FIRST));
        assert_eq!(copy.source_para_index, Some(0));
    }

    #[test]
    fn copy_of_final_copy_keeps_original_link() {
        let source = Paragraph::from_draft("para-1".to_string(), "a", DraftIndex::FIRST, 0);
        let first = source.copy_for_final("final-1".to_string(), false);
        let second = first.copy_for_final("final-2".to_string(), true);
        assert_eq!(second.original_id.as_deref(), Some("para-1"));

        let image = Paragraph::detached("final-3".to_string(), "![x](y)");
        assert_eq!(image.copy_for_final("final-4".to_string(), true).original_id, None);
    }

    #[test]
    fn absent_optional_fields_are_omitted_from_json() {
        let image = Paragraph::detached("final-1".to_string(), "img");
        let json = serde_json::to_string(&image).unwrap();
        assert_eq!(json, r#"{"id":"final-1","text":"img"}"#);
    }
}
