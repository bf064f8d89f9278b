//! Draft file import planning.
//!
//! # Invariants
//! - Only `.txt`, `.md` and `.markdown` files are accepted.
//! - Accepted files are ordered by file name; at most three are used.

use crate::model::draft::DRAFT_SLOT_COUNT;
use std::path::{Path, PathBuf};

const TEXT_EXTENSIONS: &[&str] = &["txt", "md", "markdown"];

/// Returns whether `path` looks like a plain-text or markdown file.
pub(crate) fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_ascii_lowercase())
        .is_some_and(|extension| TEXT_EXTENSIONS.contains(&extension.as_str()))
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Splits candidates into the files to load (slot order) and the rest.
pub(crate) fn plan_import(paths: &[PathBuf]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let (mut accepted, mut ignored): (Vec<PathBuf>, Vec<PathBuf>) =
        paths.iter().cloned().partition(|path| is_text_file(path));
    accepted.sort_by_key(|path| file_name_of(path));
    if accepted.len() > DRAFT_SLOT_COUNT {
        ignored.extend(accepted.split_off(DRAFT_SLOT_COUNT));
    }
    (accepted, ignored)
}
