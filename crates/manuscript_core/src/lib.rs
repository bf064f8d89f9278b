//! Core domain logic for the manuscript synthesis editor.
//! This crate is the single source of truth for draft, final-manuscript and
//! reflection invariants.

pub mod ai;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod repo;
pub mod service;
pub mod settings;
pub mod state;
pub mod text;

pub use ai::{AiError, AiGateway, GeminiGenerator, TextGenerator, SYNTHESIS_FAILURE_MESSAGE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::draft::{Draft, DraftIndex, InvalidDraftIndex, DRAFT_SLOT_COUNT};
pub use model::ids::{IdGenerator, IdNamespace, SequentialIdGenerator, UuidIdGenerator};
pub use model::paragraph::{Paragraph, ParagraphId};
pub use persistence::{
    load_state, save_state, Clock, DebouncedWriter, PersistError, PersistedState, SystemClock,
    STATE_KEY,
};
pub use repo::kv_repo::{KvStore, RepoError, RepoResult, SqliteKvStore};
pub use service::editor_service::{
    AiOutcome, DraftParagraphView, EditorService, ImportReport, ImportedDraft, ServiceError,
};
pub use settings::{load_settings, AiSettings, EditorSettings, SettingsError};
pub use state::{reduce, reflected_ids, EditorError, EditorEvent, EditorState, StateChange};
pub use text::export::EXPORT_FILE_NAME;
pub use text::splitter::split_chunks;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
