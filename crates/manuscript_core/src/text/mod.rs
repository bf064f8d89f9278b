//! Plain-text transforms.
//!
//! # Responsibility
//! - Split raw draft text into paragraph records.
//! - Join final paragraphs into the exported manuscript.
//! - Build markdown image directives for inline images.

pub mod export;
pub mod image;
pub mod splitter;
