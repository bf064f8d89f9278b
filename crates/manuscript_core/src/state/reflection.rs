//! Reflection tracking.
//!
//! A draft paragraph is reflected when a final-manuscript entry links back
//! to it through `original_id`.

use crate::model::paragraph::Paragraph;
use std::collections::BTreeSet;

/// Returns `{ p.original_id | p in final_paragraphs, original_id present }`.
pub fn reflected_ids(final_paragraphs: &[Paragraph]) -> BTreeSet<String> {
    final_paragraphs
        .iter()
        .filter_map(|paragraph| paragraph.original_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::reflected_ids;
    use crate::model::paragraph::Paragraph;

    #[test]
    fn collects_only_present_links() {
        let mut linked = Paragraph::detached("final-1".to_string(), "a");
        linked.original_id = Some("para-9".to_string());
        let mut duplicate = Paragraph::detached("final-2".to_string(), "a");
        duplicate.original_id = Some("para-9".to_string());
        let detached = Paragraph::detached("final-3".to_string(), "img");

        let reflected = reflected_ids(&[linked, duplicate, detached]);
        assert_eq!(reflected.len(), 1);
        assert!(reflected.contains("para-9"));
    }
}
