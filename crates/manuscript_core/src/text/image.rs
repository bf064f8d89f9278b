//! Inline image directives.
//!
//! Images are stored as a single final paragraph whose text is a markdown
//! image with the file data embedded as a base64 data URL.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;

/// Returns the image MIME type for a supported file extension.
pub fn image_mime_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Builds `![alt](data:<mime>;base64,<data>)`.
///
/// Brackets in `alt` are stripped so the directive stays well formed.
pub fn image_markdown(alt: &str, mime: &str, bytes: &[u8]) -> String {
    let alt = alt.replace(['[', ']'], "");
    format!("![{alt}](data:{mime};base64,{})", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::{image_markdown, image_mime_for_path};
    use std::path::Path;

    #[test]
    fn mime_lookup_is_case_insensitive() {
        assert_eq!(image_mime_for_path(Path::new("a/Cover.PNG")), Some("image/png"));
        assert_eq!(image_mime_for_path(Path::new("x.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(image_mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn markdown_embeds_base64_payload() {
        let markdown = image_markdown("fig [1]", "image/png", b"abc");
        assert_eq!(markdown, "![fig 1](data:image/png;base64,YWJj)");
    }
}
