//! Editor state container and its reducer.
//!
//! # Responsibility
//! - Hold the three draft slots, the final manuscript and the dismissed set.
//! - Express every mutation as an `EditorEvent` applied by `reduce`.
//! - Derive the reflected set from the final manuscript on demand.
//!
//! # Invariants
//! - The reflected set is never stored; it is recomputed from the final
//!   manuscript on every read.
//! - Order inside each sequence is the only sequencing signal.
//! - `final_revision` increases on every final-manuscript change.

pub mod error;
pub mod event;
pub mod reducer;
pub mod reflection;

use crate::model::draft::{default_drafts, Draft, DraftIndex, DRAFT_SLOT_COUNT};
use crate::model::paragraph::Paragraph;
use std::collections::BTreeSet;

pub use error::EditorError;
pub use event::EditorEvent;
pub use reducer::{reduce, StateChange};
pub use reflection::reflected_ids;

/// Whole editor state. Mutated only through [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorState {
    pub(crate) drafts: [Draft; DRAFT_SLOT_COUNT],
    pub(crate) final_paragraphs: Vec<Paragraph>,
    pub(crate) dismissed: BTreeSet<String>,
    pub(crate) final_revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            drafts: default_drafts(),
            final_paragraphs: Vec::new(),
            dismissed: BTreeSet::new(),
            final_revision: 0,
        }
    }
}

impl EditorState {
    /// Rebuilds a state from persisted parts. Revision starts at zero.
    pub fn from_parts(
        drafts: [Draft; DRAFT_SLOT_COUNT],
        final_paragraphs: Vec<Paragraph>,
        dismissed: BTreeSet<String>,
    ) -> Self {
        Self {
            drafts,
            final_paragraphs,
            dismissed,
            final_revision: 0,
        }
    }

    pub fn drafts(&self) -> &[Draft; DRAFT_SLOT_COUNT] {
        &self.drafts
    }

    pub fn draft(&self, index: DraftIndex) -> &Draft {
        &self.drafts[index.as_usize()]
    }

    pub fn final_paragraphs(&self) -> &[Paragraph] {
        &self.final_paragraphs
    }

    pub fn dismissed(&self) -> &BTreeSet<String> {
        &self.dismissed
    }

    pub fn is_dismissed(&self, paragraph_id: &str) -> bool {
        self.dismissed.contains(paragraph_id)
    }

    /// Draft paragraph ids currently copied into the final manuscript.
    pub fn reflected(&self) -> BTreeSet<String> {
        reflected_ids(&self.final_paragraphs)
    }

    pub fn is_reflected(&self, paragraph_id: &str) -> bool {
        self.final_paragraphs
            .iter()
            .any(|paragraph| paragraph.original_id.as_deref() == Some(paragraph_id))
    }

    /// Counter bumped on every final-manuscript change.
    pub fn final_revision(&self) -> u64 {
        self.final_revision
    }
}
