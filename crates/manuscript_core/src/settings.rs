//! Editor configuration.
//!
//! # Responsibility
//! - Provide defaults for storage, persistence debounce and the AI endpoint.
//! - Overlay an optional TOML file, then environment variables.
//!
//! # Invariants
//! - A missing settings file is not an error.
//! - Environment variables always win over file values.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file read when no explicit path is given.
pub const DEFAULT_SETTINGS_FILE: &str = "manuscript.toml";

const DEFAULT_DATABASE_PATH: &str = "./data/manuscript.sqlite3";
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_AI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_AI_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 120;

#[derive(Debug)]
pub enum SettingsError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read settings `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse settings `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

/// Hosted text-generation endpoint settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_AI_TIMEOUT_SECS,
        }
    }
}

impl AiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    pub database_path: PathBuf,
    pub persist_debounce_ms: u64,
    pub ai: AiSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            persist_debounce_ms: DEFAULT_DEBOUNCE_MS,
            ai: AiSettings::default(),
        }
    }
}

impl EditorSettings {
    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileSettings {
    database_path: Option<PathBuf>,
    persist_debounce_ms: Option<u64>,
    ai: FileAiSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileAiSettings {
    endpoint: Option<String>,
    model: Option<String>,
    api_key: Option<String>,
    timeout_secs: Option<u64>,
}

/// Loads settings from `path` (or [`DEFAULT_SETTINGS_FILE`]) and the
/// process environment.
pub fn load_settings(path: Option<&Path>) -> Result<EditorSettings, SettingsError> {
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    let mut settings = EditorSettings::default();

    match std::fs::read_to_string(path) {
        Ok(raw) => apply_file(&mut settings, parse_file(path, &raw)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    apply_env(&mut settings, |name| std::env::var(name).ok());
    Ok(settings)
}

fn parse_file(path: &Path, raw: &str) -> Result<FileSettings, SettingsError> {
    toml::from_str(raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_file(settings: &mut EditorSettings, file: FileSettings) {
    if let Some(value) = file.database_path {
        settings.database_path = value;
    }
    if let Some(value) = file.persist_debounce_ms {
        settings.persist_debounce_ms = value;
    }
    if let Some(value) = file.ai.endpoint {
        settings.ai.endpoint = value;
    }
    if let Some(value) = file.ai.model {
        settings.ai.model = value;
    }
    if let Some(value) = file.ai.api_key.filter(|key| !key.trim().is_empty()) {
        settings.ai.api_key = Some(value);
    }
    if let Some(value) = file.ai.timeout_secs {
        settings.ai.timeout_secs = value;
    }
}

fn apply_env(settings: &mut EditorSettings, lookup: impl Fn(&str) -> Option<String>) {
    let lookup = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = lookup("MANUSCRIPT_DB_PATH") {
        settings.database_path = PathBuf::from(value);
    }
    if let Some(value) = lookup("MANUSCRIPT_DEBOUNCE_MS") {
        if let Ok(parsed) = value.trim().parse::<u64>() {
            settings.persist_debounce_ms = parsed;
        }
    }
    if let Some(value) = lookup("MANUSCRIPT_AI_ENDPOINT") {
        settings.ai.endpoint = value;
    }
    if let Some(value) = lookup("MANUSCRIPT_AI_MODEL") {
        settings.ai.model = value;
    }
    if let Some(value) = lookup("MANUSCRIPT_AI_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
        settings.ai.api_key = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_env, apply_file, load_settings, parse_file, EditorSettings};
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn file_values_override_defaults() {
        let raw = r#"
            database_path = "/tmp/m.sqlite3"
            persist_debounce_ms = 250

            [ai]
            model = "gemini-pro"
        "#;
        let mut settings = EditorSettings::default();
        apply_file(&mut settings, parse_file(Path::new("m.toml"), raw).unwrap());

        assert_eq!(settings.database_path, Path::new("/tmp/m.sqlite3"));
        assert_eq!(settings.persist_debounce_ms, 250);
        assert_eq!(settings.ai.model, "gemini-pro");
        assert_eq!(settings.ai.api_key, None);
    }

    #[test]
    fn unknown_keys_are_parse_errors() {
        let err = parse_file(Path::new("m.toml"), "colour = 1").unwrap_err();
        assert!(err.to_string().contains("m.toml"));
    }

    #[test]
    fn env_overrides_with_api_key_fallback() {
        let env = HashMap::from([
            ("MANUSCRIPT_DEBOUNCE_MS", "not-a-number"),
            ("MANUSCRIPT_AI_API_KEY", " "),
            ("GEMINI_API_KEY", "secret"),
        ]);
        let mut settings = EditorSettings::default();
        apply_env(&mut settings, |name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.persist_debounce_ms, 500);
        assert_eq!(settings.ai.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.persist_debounce_ms, 500);
    }
}
