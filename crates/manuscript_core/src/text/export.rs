//! Manuscript export.

use crate::model::paragraph::Paragraph;

/// File name offered for the exported manuscript.
pub const EXPORT_FILE_NAME: &str = "final_manuscript.txt";

/// Separator placed between exported paragraphs.
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Concatenates paragraph texts with a blank line between them.
pub fn join_paragraphs(paragraphs: &[Paragraph]) -> String {
    paragraphs
        .iter()
        .map(|paragraph| paragraph.text.as_str())
        .collect::<Vec<_>>()
        .join(PARAGRAPH_SEPARATOR)
}
