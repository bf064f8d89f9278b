//! Persistence adapter for editor state.
//!
//! # Responsibility
//! - Map `EditorState` to the persisted JSON layout and back.
//! - Load best-effort: malformed or missing blobs yield the default state.
//! - Coalesce writes through a single-slot debounced writer.
//!
//! # Invariants
//! - The dismissed set is stored as an ordered list and rebuilt as a set.
//! - Loading never fails; only saving reports errors.

pub mod debounce;

use crate::model::draft::{Draft, DraftIndex, DRAFT_SLOT_COUNT};
use crate::model::paragraph::Paragraph;
use crate::repo::kv_repo::{KvStore, RepoError};
use crate::state::EditorState;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use debounce::{Clock, DebouncedWriter, SystemClock};

/// Store key holding the whole editor state.
pub const STATE_KEY: &str = "manuscript_state";

/// Persisted layout: `{drafts, finalParagraphs, dismissedParagraphIds}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    pub drafts: Vec<Draft>,
    #[serde(default)]
    pub final_paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub dismissed_paragraph_ids: Vec<String>,
}

impl From<&EditorState> for PersistedState {
    fn from(state: &EditorState) -> Self {
        Self {
            drafts: state.drafts().to_vec(),
            final_paragraphs: state.final_paragraphs().to_vec(),
            dismissed_paragraph_ids: state.dismissed().iter().cloned().collect(),
        }
    }
}

#[derive(Debug)]
pub enum PersistError {
    Encode(serde_json::Error),
    Store(RepoError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode editor state: {err}"),
            Self::Store(err) => write!(f, "failed to write editor state: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Serializes the state into its persisted JSON blob.
pub fn encode_state(state: &EditorState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(&PersistedState::from(state))?)
}

/// Decodes a persisted blob. `None` when the blob is malformed.
pub fn decode_state(blob: &str) -> Option<EditorState> {
    let persisted = match serde_json::from_str::<PersistedState>(blob) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=state_decode module=persistence status=error error_code=invalid_json line={} column={}",
                err.line(),
                err.column()
            );
            return None;
        }
    };

    let drafts = match validate_drafts(persisted.drafts) {
        Some(drafts) => drafts,
        None => {
            warn!(
                "event=state_decode module=persistence status=error error_code=invalid_draft_slots"
            );
            return None;
        }
    };

    Some(EditorState::from_parts(
        drafts,
        persisted.final_paragraphs,
        persisted.dismissed_paragraph_ids.into_iter().collect(),
    ))
}

/// Writes the state under [`STATE_KEY`] immediately.
pub fn save_state(store: &impl KvStore, state: &EditorState) -> Result<(), PersistError> {
    let blob = encode_state(state)?;
    store.set(STATE_KEY, &blob)?;
    Ok(())
}

/// Loads the state, falling back to defaults on any failure.
pub fn load_state(store: &impl KvStore) -> EditorState {
    let blob = match store.get(STATE_KEY) {
        Ok(Some(blob)) => blob,
        Ok(None) => {
            info!("event=state_load module=persistence status=ok source=default reason=missing");
            return EditorState::default();
        }
        Err(err) => {
            warn!(
                "event=state_load module=persistence status=error source=default error={}",
                err
            );
            return EditorState::default();
        }
    };

    match decode_state(&blob) {
        Some(state) => {
            info!(
                "event=state_load module=persistence status=ok source=store final_paragraphs={}",
                state.final_paragraphs().len()
            );
            state
        }
        None => EditorState::default(),
    }
}

fn validate_drafts(drafts: Vec<Draft>) -> Option<[Draft; DRAFT_SLOT_COUNT]> {
    let all_slots_match = drafts.len() == DRAFT_SLOT_COUNT
        && drafts
            .iter()
            .zip(DraftIndex::all())
            .all(|(draft, index)| draft.id == index.slot_number());
    if !all_slots_match {
        return None;
    }
    drafts.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::{decode_state, encode_state};
    use crate::model::draft::DraftIndex;
    use crate::model::ids::SequentialIdGenerator;
    use crate::state::{reduce, EditorEvent, EditorState};

    #[test]
    fn layout_uses_camel_case_keys() {
        let mut state = EditorState::default();
        let mut ids = SequentialIdGenerator::new();
        reduce(
            &mut state,
            EditorEvent::Dismiss {
                paragraph_id: "para-7".to_string(),
            },
            &mut ids,
        )
        .unwrap();

        let blob = encode_state(&state).unwrap();
        let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
        assert_eq!(value["drafts"].as_array().unwrap().len(), 3);
        assert_eq!(value["drafts"][0]["customTitle"], "");
        assert!(value["finalParagraphs"].as_array().unwrap().is_empty());
        assert_eq!(value["dismissedParagraphIds"][0], "para-7");
    }

    #[test]
    fn rejects_wrong_slot_layout() {
        assert!(decode_state(r#"{"drafts":[]}"#).is_none());
        assert!(decode_state(
            r#"{"drafts":[{"id":2,"title":"Draft 2"},{"id":1,"title":"Draft 1"},{"id":3,"title":"Draft 3"}]}"#
        )
        .is_none());
        assert!(decode_state("not json").is_none());
    }

    #[test]
    fn accepts_minimal_blob_with_optional_sections_missing() {
        let state = decode_state(
            r#"{"drafts":[{"id":1,"title":"Draft 1"},{"id":2,"title":"Draft 2"},{"id":3,"title":"Draft 3","customTitle":"Third"}]}"#,
        )
        .unwrap();
        assert_eq!(state.draft(DraftIndex::THIRD).display_title(), "Third");
        assert!(state.final_paragraphs().is_empty());
        assert!(state.dismissed().is_empty());
    }
}
