//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate reducer, persistence, file access and AI calls into
//!   use-case level APIs for UI and CLI callers.
//! - Keep callers decoupled from storage details.

pub mod editor_service;
mod import;
