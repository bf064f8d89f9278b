//! AI gateway over a hosted text-generation service.
//!
//! # Responsibility
//! - Build the polish and synthesis instructions.
//! - Call an injectable `TextGenerator` once per request.
//! - Convert every failure into the documented fallback value.
//!
//! # Invariants
//! - `polish` returns its input unchanged on failure.
//! - `synthesize` returns [`SYNTHESIS_FAILURE_MESSAGE`] on failure.
//! - No call is retried and no error escapes the gateway.

pub mod gemini;

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub use gemini::GeminiGenerator;

/// Fixed text returned when draft synthesis fails.
pub const SYNTHESIS_FAILURE_MESSAGE: &str =
    "Synthesis failed. Check the network connection and AI settings, then try again.";

const POLISH_INSTRUCTION: &str = "You are a careful manuscript editor. Improve the fluency of the \
following text and make its register consistent throughout. Preserve the meaning, the facts and \
the paragraph breaks. Reply with the revised text only, without commentary.";

const SYNTHESIS_INSTRUCTION: &str = "You are a careful manuscript editor. Merge the three drafts \
below into one coherent manuscript. Keep the strongest material from each draft, remove \
repetition and keep a consistent register. Separate paragraphs with a blank line. Reply with the \
merged manuscript only, without commentary.";

#[derive(Debug)]
pub enum AiError {
    /// No API key configured.
    MissingApiKey,
    /// Transport-level failure.
    Http(reqwest::Error),
    /// Non-success HTTP status.
    Status { code: u16, body: String },
    /// Response decoded but carried no text.
    EmptyResponse,
    /// Any other generator-specific failure.
    Generator(String),
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "AI API key is not configured"),
            Self::Http(err) => write!(f, "AI request failed: {err}"),
            Self::Status { code, body } => write!(f, "AI endpoint returned {code}: {body}"),
            Self::EmptyResponse => write!(f, "AI response contained no text"),
            Self::Generator(message) => write!(f, "AI generator error: {message}"),
        }
    }
}

impl Error for AiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Opaque text-in/text-out generation service.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        (**self).generate(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        (**self).generate(prompt)
    }
}

/// Fail-soft gateway exposing the two editor operations.
pub struct AiGateway<G: TextGenerator> {
    generator: G,
}

impl<G: TextGenerator> AiGateway<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Improves fluency and register. Returns `text` unchanged on failure.
    pub fn polish(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match self.call("polish", &polish_prompt(text)) {
            Ok(polished) => polished,
            Err(_) => text.to_string(),
        }
    }

    /// Merges three draft texts. Returns [`SYNTHESIS_FAILURE_MESSAGE`] on
    /// failure.
    pub fn synthesize(&self, drafts: &[String; 3]) -> String {
        match self.call("synthesize", &synthesis_prompt(drafts)) {
            Ok(merged) => merged,
            Err(_) => SYNTHESIS_FAILURE_MESSAGE.to_string(),
        }
    }

    fn call(&self, operation: &'static str, prompt: &str) -> Result<String, AiError> {
        let started_at = Instant::now();
        let result = self
            .generator
            .generate(prompt)
            .and_then(|text| {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    Err(AiError::EmptyResponse)
                } else {
                    Ok(trimmed.to_string())
                }
            });
        match &result {
            Ok(text) => info!(
                "event=ai_call module=ai status=ok operation={} duration_ms={} output_chars={}",
                operation,
                started_at.elapsed().as_millis(),
                text.chars().count()
            ),
            Err(err) => warn!(
                "event=ai_call module=ai status=error operation={} duration_ms={} error={}",
                operation,
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

fn polish_prompt(text: &str) -> String {
    format!("{POLISH_INSTRUCTION}\n\n---\n{text}\n---")
}

fn synthesis_prompt(drafts: &[String; 3]) -> String {
    let mut prompt = String::from(SYNTHESIS_INSTRUCTION);
    for (index, draft) in drafts.iter().enumerate() {
        prompt.push_str(&format!("\n\n[Draft {}]\n{}", index + 1, draft.trim()));
    }
    prompt
}
