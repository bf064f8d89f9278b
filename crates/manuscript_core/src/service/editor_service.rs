//! Editor use-case service.
//!
//! # Responsibility
//! - Own the editor state and apply every mutation through the reducer.
//! - Schedule a debounced write after each state change.
//! - Provide file import, image insertion, export and AI flows.
//! - Track one in-flight flag per AI operation kind; completing or
//!   cancelling a ticket clears it.
//!
//! # Invariants
//! - Failed operations leave state and pending writes untouched.
//! - An AI result is applied only when the final manuscript has not changed
//!   since the request was issued.
//! - File read failures during import are logged and skipped; the slot
//!   keeps its prior content.

use crate::ai::{AiGateway, TextGenerator, SYNTHESIS_FAILURE_MESSAGE};
use crate::model::draft::{DraftIndex, DRAFT_SLOT_COUNT};
use crate::model::ids::{IdGenerator, UuidIdGenerator};
use crate::model::paragraph::{Paragraph, ParagraphId};
use crate::persistence::{encode_state, load_state, Clock, DebouncedWriter, PersistError, SystemClock};
use crate::repo::kv_repo::KvStore;
use crate::service::import::{file_name_of, plan_import};
use crate::state::{reduce, EditorError, EditorEvent, EditorState, StateChange};
use crate::text::export::{join_paragraphs, EXPORT_FILE_NAME};
use crate::text::image::{image_markdown, image_mime_for_path};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors from service operations that touch the file system.
#[derive(Debug)]
pub enum ServiceError {
    Editor(EditorError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Editor(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "file error at `{}`: {source}", path.display()),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Editor(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<EditorError> for ServiceError {
    fn from(value: EditorError) -> Self {
        Self::Editor(value)
    }
}

/// One draft slot filled by an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedDraft {
    pub draft: DraftIndex,
    pub file_name: String,
    pub paragraphs: usize,
}

/// Outcome of a multi-file import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub loaded: Vec<ImportedDraft>,
    /// Files that were unsupported, beyond the third, or unreadable.
    pub skipped: Vec<PathBuf>,
}

/// Draft paragraph annotated with its UI flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftParagraphView<'a> {
    pub paragraph: &'a Paragraph,
    pub reflected: bool,
    pub dismissed: bool,
}

/// Pending polish request. Consumed by [`EditorService::complete_polish`]
/// or [`EditorService::cancel_polish`].
#[derive(Debug)]
pub struct PolishTicket {
    text: String,
    revision: u64,
}

impl PolishTicket {
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Pending synthesis request. Consumed by
/// [`EditorService::complete_synthesis`] or
/// [`EditorService::cancel_synthesis`].
#[derive(Debug)]
pub struct SynthesisTicket {
    drafts: [String; DRAFT_SLOT_COUNT],
    revision: u64,
}

impl SynthesisTicket {
    pub fn drafts(&self) -> &[String; DRAFT_SLOT_COUNT] {
        &self.drafts
    }
}

/// What happened to an AI result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiOutcome {
    /// Final manuscript replaced with this many paragraphs.
    Applied { paragraphs: usize },
    /// Result equal to the current text; nothing to apply.
    Unchanged,
    /// Synthesis failed; final manuscript untouched.
    Failed,
    /// Final manuscript changed while the call was in flight.
    Discarded,
}

#[derive(Debug, Default, Clone, Copy)]
struct InFlight {
    polish: bool,
    synthesis: bool,
}

/// Editor facade over a key-value store implementation.
pub struct EditorService<S: KvStore> {
    store: S,
    state: EditorState,
    ids: Box<dyn IdGenerator>,
    clock: Box<dyn Clock>,
    writer: DebouncedWriter,
    in_flight: InFlight,
}

impl<S: KvStore> EditorService<S> {
    /// Loads persisted state (or defaults) and uses real ids and time.
    pub fn open(store: S, debounce: Duration) -> Self {
        let state = load_state(&store);
        Self::with_parts(
            store,
            state,
            Box::new(UuidIdGenerator),
            Box::new(SystemClock),
            debounce,
        )
    }

    /// Builds a service from explicit parts. Used by tests.
    pub fn with_parts(
        store: S,
        state: EditorState,
        ids: Box<dyn IdGenerator>,
        clock: Box<dyn Clock>,
        debounce: Duration,
    ) -> Self {
        Self {
            store,
            state,
            ids,
            clock,
            writer: DebouncedWriter::new(debounce),
            in_flight: InFlight::default(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Applies one event and schedules persistence when state changed.
    pub fn dispatch(&mut self, event: EditorEvent) -> Result<StateChange, EditorError> {
        let change = reduce(&mut self.state, event, self.ids.as_mut())?;
        if change.is_changed() {
            self.schedule_persist();
        }
        Ok(change)
    }

    /// Re-splits one draft slot from pasted or loaded text.
    pub fn replace_draft_text(
        &mut self,
        draft: DraftIndex,
        raw_text: impl Into<String>,
    ) -> Result<usize, EditorError> {
        self.dispatch(EditorEvent::ReplaceDraft {
            draft,
            raw_text: raw_text.into(),
        })?;
        Ok(self.state.draft(draft).paragraphs.len())
    }

    pub fn set_draft_alias(
        &mut self,
        draft: DraftIndex,
        alias: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::SetDraftAlias {
            draft,
            alias: alias.into(),
        })
        .map(|_| ())
    }

    pub fn remove_draft_paragraph(
        &mut self,
        draft: DraftIndex,
        paragraph_id: &str,
    ) -> Result<bool, EditorError> {
        self.dispatch(EditorEvent::RemoveDraftParagraph {
            draft,
            paragraph_id: paragraph_id.to_string(),
        })
        .map(StateChange::is_changed)
    }

    pub fn dismiss(&mut self, paragraph_id: &str) -> Result<bool, EditorError> {
        self.dispatch(EditorEvent::Dismiss {
            paragraph_id: paragraph_id.to_string(),
        })
        .map(StateChange::is_changed)
    }

    pub fn restore(&mut self, paragraph_id: &str) -> Result<bool, EditorError> {
        self.dispatch(EditorEvent::Restore {
            paragraph_id: paragraph_id.to_string(),
        })
        .map(StateChange::is_changed)
    }

    /// Copies one draft paragraph into the final manuscript.
    ///
    /// Returns the new final-store id.
    ///
    /// # Errors
    /// - `ParagraphNotFound` when the draft has no such paragraph.
    /// - `ParagraphDismissed` when the user dismissed it.
    pub fn append_draft_paragraph(
        &mut self,
        draft: DraftIndex,
        paragraph_id: &str,
        at_index: Option<usize>,
    ) -> Result<ParagraphId, EditorError> {
        if self.state.is_dismissed(paragraph_id) {
            return Err(EditorError::ParagraphDismissed(paragraph_id.to_string()));
        }
        let paragraph = self
            .state
            .draft(draft)
            .paragraph(paragraph_id)
            .cloned()
            .ok_or_else(|| EditorError::ParagraphNotFound(paragraph_id.to_string()))?;
        self.append_paragraph(paragraph, at_index)
    }

    /// Copies any paragraph (draft or final) into the final manuscript.
    pub fn append_paragraph(
        &mut self,
        paragraph: Paragraph,
        at_index: Option<usize>,
    ) -> Result<ParagraphId, EditorError> {
        let position = at_index
            .map(|index| index.min(self.state.final_paragraphs().len()))
            .unwrap_or(self.state.final_paragraphs().len());
        self.dispatch(EditorEvent::AppendFinal {
            paragraph,
            at_index,
        })?;
        Ok(self.state.final_paragraphs()[position].id.clone())
    }

    /// Appends every not-yet-reflected paragraph of `draft`.
    ///
    /// Returns the number of appended paragraphs.
    pub fn add_all(&mut self, draft: DraftIndex) -> Result<usize, EditorError> {
        let before = self.state.final_paragraphs().len();
        self.dispatch(EditorEvent::AddAllFromDraft { draft })?;
        Ok(self.state.final_paragraphs().len() - before)
    }

    /// Removes every final entry carried over from `draft`.
    pub fn remove_all_from_draft(&mut self, draft: DraftIndex) -> Result<usize, EditorError> {
        let before = self.state.final_paragraphs().len();
        self.dispatch(EditorEvent::RemoveAllFromDraft { draft })?;
        Ok(before - self.state.final_paragraphs().len())
    }

    pub fn remove_final(&mut self, id: &str) -> Result<bool, EditorError> {
        self.dispatch(EditorEvent::RemoveFinal { id: id.to_string() })
            .map(StateChange::is_changed)
    }

    pub fn update_final_text(
        &mut self,
        id: &str,
        text: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::UpdateFinalText {
            id: id.to_string(),
            text: text.into(),
        })
        .map(|_| ())
    }

    pub fn move_final(&mut self, from: usize, to: usize) -> Result<(), EditorError> {
        self.dispatch(EditorEvent::MoveFinal { from, to }).map(|_| ())
    }

    /// Empties the final manuscript. Does nothing unless `confirmed`.
    pub fn clear_final(&mut self, confirmed: bool) -> Result<bool, EditorError> {
        if !confirmed {
            info!("event=final_clear module=service status=skipped reason=not_confirmed");
            return Ok(false);
        }
        self.dispatch(EditorEvent::ClearFinal)
            .map(StateChange::is_changed)
    }

    pub fn reflected_ids(&self) -> BTreeSet<String> {
        self.state.reflected()
    }

    pub fn is_reflected(&self, paragraph_id: &str) -> bool {
        self.state.is_reflected(paragraph_id)
    }

    /// Draft paragraphs with reflected/dismissed flags, in draft order.
    pub fn draft_view(&self, draft: DraftIndex) -> Vec<DraftParagraphView<'_>> {
        let reflected = self.state.reflected();
        self.state
            .draft(draft)
            .paragraphs
            .iter()
            .map(|paragraph| DraftParagraphView {
                paragraph,
                reflected: reflected.contains(&paragraph.id),
                dismissed: self.state.is_dismissed(&paragraph.id),
            })
            .collect()
    }

    /// Loads up to three text files into draft slots 1..3.
    ///
    /// Files are sorted by file name; unsupported files and files beyond the
    /// third are ignored. Unreadable files are skipped and their slot keeps
    /// its previous content.
    pub fn import_files(&mut self, paths: &[PathBuf]) -> ImportReport {
        let (accepted, ignored) = plan_import(paths);
        let mut report = ImportReport {
            loaded: Vec::new(),
            skipped: ignored,
        };

        for (draft, path) in DraftIndex::all().into_iter().zip(accepted) {
            let raw_text = match std::fs::read_to_string(&path) {
                Ok(raw_text) => raw_text,
                Err(err) => {
                    warn!(
                        "event=draft_import module=service status=error draft={} error_kind={:?}",
                        draft,
                        err.kind()
                    );
                    report.skipped.push(path);
                    continue;
                }
            };

            match self.replace_draft_text(draft, raw_text) {
                Ok(paragraphs) => report.loaded.push(ImportedDraft {
                    draft,
                    file_name: file_name_of(&path),
                    paragraphs,
                }),
                Err(err) => {
                    warn!(
                        "event=draft_import module=service status=error draft={} error={}",
                        draft, err
                    );
                    report.skipped.push(path);
                }
            }
        }

        info!(
            "event=draft_import module=service status=ok loaded={} skipped={}",
            report.loaded.len(),
            report.skipped.len()
        );
        report
    }

    /// Inserts an image file as one inline markdown paragraph.
    ///
    /// Returns the new final-store id.
    pub fn insert_image(
        &mut self,
        path: &Path,
        at_index: Option<usize>,
    ) -> Result<ParagraphId, ServiceError> {
        let file_name = file_name_of(path);
        let mime = image_mime_for_path(path)
            .ok_or_else(|| EditorError::UnsupportedImage(file_name.clone()))?;
        let bytes = std::fs::read(path).map_err(|source| {
            warn!(
                "event=image_insert module=service status=error mime={} error_kind={:?}",
                mime,
                source.kind()
            );
            ServiceError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let position = at_index
            .map(|index| index.min(self.state.final_paragraphs().len()))
            .unwrap_or(self.state.final_paragraphs().len());
        self.dispatch(EditorEvent::InsertDetached {
            text: image_markdown(&file_name, mime, &bytes),
            at_index,
        })?;
        info!(
            "event=image_insert module=service status=ok mime={} bytes={}",
            mime,
            bytes.len()
        );
        Ok(self.state.final_paragraphs()[position].id.clone())
    }

    /// Final manuscript text with a blank line between paragraphs.
    pub fn export_text(&self) -> String {
        join_paragraphs(self.state.final_paragraphs())
    }

    /// Writes [`EXPORT_FILE_NAME`] into `dir` and returns its path.
    pub fn export_to_dir(&self, dir: &Path) -> Result<PathBuf, ServiceError> {
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, self.export_text()).map_err(|source| ServiceError::Io {
            path: path.clone(),
            source,
        })?;
        info!(
            "event=export module=service status=ok paragraphs={}",
            self.state.final_paragraphs().len()
        );
        Ok(path)
    }

    /// Marks a polish call as in flight and captures its input.
    pub fn begin_polish(&mut self) -> Result<PolishTicket, EditorError> {
        if self.in_flight.polish {
            return Err(EditorError::AiCallInFlight("polish"));
        }
        self.in_flight.polish = true;
        Ok(PolishTicket {
            text: self.export_text(),
            revision: self.state.final_revision(),
        })
    }

    /// Clears the in-flight flag and applies the polished text.
    pub fn complete_polish(&mut self, ticket: PolishTicket, polished: String) -> AiOutcome {
        self.in_flight.polish = false;
        if self.is_stale(ticket.revision, "polish") {
            return AiOutcome::Discarded;
        }
        if polished.trim() == ticket.text.trim() {
            return AiOutcome::Unchanged;
        }
        self.replace_final_with(polished)
    }

    /// Abandons a polish request without touching the manuscript.
    pub fn cancel_polish(&mut self, ticket: PolishTicket) {
        self.in_flight.polish = false;
        info!(
            "event=ai_cancel module=service status=ok operation=polish ticket_revision={}",
            ticket.revision
        );
    }

    pub fn is_polish_in_flight(&self) -> bool {
        self.in_flight.polish
    }

    /// Marks a synthesis call as in flight and captures the draft texts.
    pub fn begin_synthesis(&mut self) -> Result<SynthesisTicket, EditorError> {
        if self.in_flight.synthesis {
            return Err(EditorError::AiCallInFlight("synthesis"));
        }
        self.in_flight.synthesis = true;
        Ok(SynthesisTicket {
            drafts: self.state.drafts().clone().map(|draft| draft.full_text()),
            revision: self.state.final_revision(),
        })
    }

    /// Clears the in-flight flag and applies the merged manuscript.
    pub fn complete_synthesis(&mut self, ticket: SynthesisTicket, merged: String) -> AiOutcome {
        self.in_flight.synthesis = false;
        if merged == SYNTHESIS_FAILURE_MESSAGE {
            return AiOutcome::Failed;
        }
        if self.is_stale(ticket.revision, "synthesis") {
            return AiOutcome::Discarded;
        }
        self.replace_final_with(merged)
    }

    /// Abandons a synthesis request without touching the manuscript.
    pub fn cancel_synthesis(&mut self, ticket: SynthesisTicket) {
        self.in_flight.synthesis = false;
        info!(
            "event=ai_cancel module=service status=ok operation=synthesis ticket_revision={}",
            ticket.revision
        );
    }

    pub fn is_synthesis_in_flight(&self) -> bool {
        self.in_flight.synthesis
    }

    /// Runs a full polish cycle against `gateway`.
    pub fn polish_with<G: TextGenerator>(
        &mut self,
        gateway: &AiGateway<G>,
    ) -> Result<AiOutcome, EditorError> {
        let ticket = self.begin_polish()?;
        let polished = gateway.polish(ticket.text());
        Ok(self.complete_polish(ticket, polished))
    }

    /// Runs a full synthesis cycle against `gateway`.
    pub fn synthesize_with<G: TextGenerator>(
        &mut self,
        gateway: &AiGateway<G>,
    ) -> Result<AiOutcome, EditorError> {
        let ticket = self.begin_synthesis()?;
        let merged = gateway.synthesize(ticket.drafts());
        Ok(self.complete_synthesis(ticket, merged))
    }

    /// Writes the pending state when its debounce window has elapsed.
    pub fn tick(&mut self) -> Result<bool, PersistError> {
        let now = self.clock.now();
        self.writer.poll(now, &self.store)
    }

    /// Writes the pending state immediately.
    pub fn flush(&mut self) -> Result<bool, PersistError> {
        self.writer.flush(&self.store)
    }

    pub fn has_pending_write(&self) -> bool {
        self.writer.is_pending()
    }

    fn is_stale(&self, revision: u64, operation: &'static str) -> bool {
        let stale = revision != self.state.final_revision();
        if stale {
            warn!(
                "event=ai_apply module=service status=discarded operation={} ticket_revision={} current_revision={}",
                operation,
                revision,
                self.state.final_revision()
            );
        }
        stale
    }

    fn replace_final_with(&mut self, text: String) -> AiOutcome {
        match self.dispatch(EditorEvent::ReplaceFinalWithText { text }) {
            Ok(_) => AiOutcome::Applied {
                paragraphs: self.state.final_paragraphs().len(),
            },
            Err(err) => {
                error!(
                    "event=ai_apply module=service status=error error={}",
                    err
                );
                AiOutcome::Unchanged
            }
        }
    }

    fn schedule_persist(&mut self) {
        match encode_state(&self.state) {
            Ok(payload) => self.writer.schedule(payload, self.clock.now()),
            Err(err) => error!(
                "event=persist_schedule module=service status=error error={}",
                err
            ),
        }
    }
}
