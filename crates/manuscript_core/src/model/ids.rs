//! Paragraph identifier minting.
//!
//! # Responsibility
//! - Mint unique ids for draft and final-store paragraphs.
//! - Keep the minting strategy injectable so tests can assert exact ids.
//!
//! # Invariants
//! - Every id has the form `<namespace prefix>-<token>`.
//! - A generator never returns the same id twice.

use uuid::Uuid;

/// Identifier namespace. Draft and final ids never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdNamespace {
    Draft,
    Final,
}

impl IdNamespace {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Draft => "para",
            Self::Final => "final",
        }
    }
}

/// Source of fresh paragraph identifiers.
pub trait IdGenerator {
    fn next_id(&mut self, namespace: IdNamespace) -> String;
}

/// Random UUID v4 tokens. Default for real sessions.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self, namespace: IdNamespace) -> String {
        format!("{}-{}", namespace.prefix(), Uuid::new_v4())
    }
}

/// Monotonic counter tokens (`para-1`, `final-2`, ...).
///
/// One counter is shared by both namespaces.
#[derive(Debug, Default, Clone)]
pub struct SequentialIdGenerator {
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts counting after `last`; useful when resuming persisted state.
    pub fn starting_after(last: u64) -> Self {
        Self { next: last }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self, namespace: IdNamespace) -> String {
        self.next += 1;
        format!("{}-{}", namespace.prefix(), self.next)
    }
}
