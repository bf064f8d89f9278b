//! Editor events consumed by the reducer.

use crate::model::draft::DraftIndex;
use crate::model::paragraph::{Paragraph, ParagraphId};

/// One user-level state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// Re-split a draft slot from raw text, replacing all its paragraphs.
    ReplaceDraft { draft: DraftIndex, raw_text: String },
    /// Set the user alias of a draft slot.
    SetDraftAlias { draft: DraftIndex, alias: String },
    /// Drop one paragraph from a draft. Final copies are kept.
    RemoveDraftParagraph {
        draft: DraftIndex,
        paragraph_id: ParagraphId,
    },
    /// Hide a draft paragraph from drag/insert interaction.
    Dismiss { paragraph_id: ParagraphId },
    /// Undo a dismissal.
    Restore { paragraph_id: ParagraphId },
    /// Copy a paragraph into the final manuscript under a fresh id.
    AppendFinal {
        paragraph: Paragraph,
        at_index: Option<usize>,
    },
    /// Create a paragraph directly in the final manuscript (images).
    InsertDetached {
        text: String,
        at_index: Option<usize>,
    },
    /// Append every not-yet-reflected paragraph of a draft.
    AddAllFromDraft { draft: DraftIndex },
    /// Remove final entries whose carried source slot equals `draft`.
    RemoveAllFromDraft { draft: DraftIndex },
    /// Remove one final entry by id.
    RemoveFinal { id: ParagraphId },
    /// Replace the text of one final entry in place.
    UpdateFinalText { id: ParagraphId, text: String },
    /// Splice-out-then-splice-in reorder of the final manuscript.
    MoveFinal { from: usize, to: usize },
    /// Empty the final manuscript.
    ClearFinal,
    /// Replace the final manuscript with text split into fresh paragraphs.
    ReplaceFinalWithText { text: String },
}
