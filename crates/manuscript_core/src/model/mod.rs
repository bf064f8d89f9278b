//! Domain model for drafts and the final manuscript.
//!
//! # Responsibility
//! - Define the paragraph record shared by draft slots and the final store.
//! - Define draft slots and their fixed labels.
//! - Provide injectable identifier minting.
//!
//! # Invariants
//! - Paragraph ids are unique within their store.
//! - Final-store ids live in their own namespace and are never reused.

pub mod draft;
pub mod ids;
pub mod paragraph;
