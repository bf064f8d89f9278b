//! Pure reducer over `EditorState`.
//!
//! # Responsibility
//! - Apply one `EditorEvent` to the state in place.
//! - Report which part of the state changed so callers can persist.
//!
//! # Invariants
//! - Draft replacement swaps the whole paragraph sequence at once.
//! - Final inserts mint fresh ids and never touch existing entries' ids.
//! - Removing draft paragraphs never cascades into the final manuscript.
//! - Events that fail leave the state untouched.

use crate::model::draft::DraftIndex;
use crate::model::ids::{IdGenerator, IdNamespace};
use crate::model::paragraph::Paragraph;
use crate::state::error::EditorError;
use crate::state::event::EditorEvent;
use crate::state::reflection::reflected_ids;
use crate::state::EditorState;
use crate::text::splitter::{split_detached, split_into_draft};
use log::debug;

/// Part of the state touched by one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Unchanged,
    Drafts,
    Final,
    Dismissed,
}

impl StateChange {
    pub fn is_changed(self) -> bool {
        self != Self::Unchanged
    }
}

/// Applies `event` to `state`, minting ids from `ids`.
pub fn reduce(
    state: &mut EditorState,
    event: EditorEvent,
    ids: &mut dyn IdGenerator,
) -> Result<StateChange, EditorError> {
    let change = match event {
        EditorEvent::ReplaceDraft { draft, raw_text } => {
            let paragraphs = split_into_draft(&raw_text, draft, ids);
            debug!(
                "event=draft_replace module=state status=ok draft={} paragraphs={}",
                draft,
                paragraphs.len()
            );
            state.drafts[draft.as_usize()].paragraphs = paragraphs;
            StateChange::Drafts
        }
        EditorEvent::SetDraftAlias { draft, alias } => {
            state.drafts[draft.as_usize()].custom_title = alias;
            StateChange::Drafts
        }
        EditorEvent::RemoveDraftParagraph {
            draft,
            paragraph_id,
        } => {
            let paragraphs = &mut state.drafts[draft.as_usize()].paragraphs;
            let before = paragraphs.len();
            paragraphs.retain(|paragraph| paragraph.id != paragraph_id);
            if paragraphs.len() == before {
                StateChange::Unchanged
            } else {
                StateChange::Drafts
            }
        }
        EditorEvent::Dismiss { paragraph_id } => {
            if state.dismissed.insert(paragraph_id) {
                StateChange::Dismissed
            } else {
                StateChange::Unchanged
            }
        }
        EditorEvent::Restore { paragraph_id } => {
            if state.dismissed.remove(&paragraph_id) {
                StateChange::Dismissed
            } else {
                StateChange::Unchanged
            }
        }
        EditorEvent::AppendFinal {
            paragraph,
            at_index,
        } => {
            let is_final_copy = state
                .final_paragraphs
                .iter()
                .any(|existing| existing.id == paragraph.id);
            let copy = paragraph.copy_for_final(ids.next_id(IdNamespace::Final), is_final_copy);
            insert_at(&mut state.final_paragraphs, copy, at_index);
            StateChange::Final
        }
        EditorEvent::InsertDetached { text, at_index } => {
            let paragraph = Paragraph::detached(ids.next_id(IdNamespace::Final), text);
            insert_at(&mut state.final_paragraphs, paragraph, at_index);
            StateChange::Final
        }
        EditorEvent::AddAllFromDraft { draft } => add_all_from_draft(state, draft, ids),
        EditorEvent::RemoveAllFromDraft { draft } => {
            let before = state.final_paragraphs.len();
            state
                .final_paragraphs
                .retain(|paragraph| paragraph.source_draft_index != Some(draft));
            let removed = before - state.final_paragraphs.len();
            debug!(
                "event=final_remove_draft module=state status=ok draft={} removed={}",
                draft, removed
            );
            if removed == 0 {
                StateChange::Unchanged
            } else {
                StateChange::Final
            }
        }
        EditorEvent::RemoveFinal { id } => {
            let before = state.final_paragraphs.len();
            state.final_paragraphs.retain(|paragraph| paragraph.id != id);
            if state.final_paragraphs.len() == before {
                StateChange::Unchanged
            } else {
                StateChange::Final
            }
        }
        EditorEvent::UpdateFinalText { id, text } => {
            let paragraph = state
                .final_paragraphs
                .iter_mut()
                .find(|paragraph| paragraph.id == id)
                .ok_or(EditorError::ParagraphNotFound(id))?;
            if paragraph.text == text {
                StateChange::Unchanged
            } else {
                paragraph.text = text;
                StateChange::Final
            }
        }
        EditorEvent::MoveFinal { from, to } => move_final(&mut state.final_paragraphs, from, to)?,
        EditorEvent::ClearFinal => {
            if state.final_paragraphs.is_empty() {
                StateChange::Unchanged
            } else {
                state.final_paragraphs.clear();
                StateChange::Final
            }
        }
        EditorEvent::ReplaceFinalWithText { text } => {
            state.final_paragraphs = split_detached(&text, ids);
            debug!(
                "event=final_replace module=state status=ok paragraphs={}",
                state.final_paragraphs.len()
            );
            StateChange::Final
        }
    };

    if change == StateChange::Final {
        state.final_revision += 1;
    }
    Ok(change)
}

fn insert_at(paragraphs: &mut Vec<Paragraph>, paragraph: Paragraph, at_index: Option<usize>) {
    match at_index {
        Some(index) => {
            let index = index.min(paragraphs.len());
            paragraphs.insert(index, paragraph);
        }
        None => paragraphs.push(paragraph),
    }
}

fn add_all_from_draft(
    state: &mut EditorState,
    draft: DraftIndex,
    ids: &mut dyn IdGenerator,
) -> StateChange {
    let reflected = reflected_ids(&state.final_paragraphs);
    let additions = state.drafts[draft.as_usize()]
        .paragraphs
        .iter()
        .filter(|paragraph| !reflected.contains(&paragraph.id))
        .map(|paragraph| paragraph.copy_for_final(ids.next_id(IdNamespace::Final), false))
        .collect::<Vec<_>>();

    debug!(
        "event=final_add_all module=state status=ok draft={} added={}",
        draft,
        additions.len()
    );
    if additions.is_empty() {
        return StateChange::Unchanged;
    }
    state.final_paragraphs.extend(additions);
    StateChange::Final
}

fn move_final(
    paragraphs: &mut Vec<Paragraph>,
    from: usize,
    to: usize,
) -> Result<StateChange, EditorError> {
    let len = paragraphs.len();
    if from >= len {
        return Err(EditorError::IndexOutOfRange { index: from, len });
    }
    let paragraph = paragraphs.remove(from);
    // Target is relative to the list with the dragged item removed.
    let to = to.min(paragraphs.len());
    paragraphs.insert(to, paragraph);
    if from == to {
        Ok(StateChange::Unchanged)
    } else {
        Ok(StateChange::Final)
    }
}
