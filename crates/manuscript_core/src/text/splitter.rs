//! Paragraph splitter.
//!
//! # Responsibility
//! - Turn raw text into ordered paragraph chunks at blank-line boundaries.
//! - Tag draft chunks with slot, position and a fresh id.
//!
//! # Invariants
//! - A boundary is any run of two or more newlines, whitespace between them
//!   included; longer runs collapse into one boundary.
//! - Chunks are trimmed and empty chunks are dropped.
//! - Output order equals input order. Only ids differ between runs.

use crate::model::draft::DraftIndex;
use crate::model::ids::{IdGenerator, IdNamespace};
use crate::model::paragraph::Paragraph;
use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph break regex"));

/// Splits raw text into trimmed, non-empty paragraph chunks.
pub fn split_chunks(raw_text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK_RE
        .split(raw_text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Splits raw text into paragraphs belonging to one draft slot.
pub fn split_into_draft(
    raw_text: &str,
    draft: DraftIndex,
    ids: &mut dyn IdGenerator,
) -> Vec<Paragraph> {
    split_chunks(raw_text)
        .into_iter()
        .enumerate()
        .map(|(position, chunk)| {
            Paragraph::from_draft(ids.next_id(IdNamespace::Draft), chunk, draft, position)
        })
        .collect()
}

/// Splits text created directly in the final store (AI output).
///
/// Resulting paragraphs carry no provenance fields.
pub fn split_detached(raw_text: &str, ids: &mut dyn IdGenerator) -> Vec<Paragraph> {
    split_chunks(raw_text)
        .into_iter()
        .map(|chunk| Paragraph::detached(ids.next_id(IdNamespace::Final), chunk))
        .collect()
}
