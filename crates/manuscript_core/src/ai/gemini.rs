//! HTTP text generator for the Gemini `generateContent` API.

use crate::ai::{AiError, TextGenerator};
use crate::settings::AiSettings;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

/// Blocking client for one configured model.
pub struct GeminiGenerator {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl GeminiGenerator {
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let client = Client::builder().timeout(settings.timeout()).build()?;
        Ok(Self {
            client,
            url: generate_url(&settings.endpoint, &settings.model),
            api_key: settings.api_key.clone(),
        })
    }
}

impl TextGenerator for GeminiGenerator {
    fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let api_key = self.api_key.as_deref().ok_or(AiError::MissingApiKey)?;
        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", api_key)
            .json(&request_body(prompt))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AiError::Status {
                code: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let decoded = response.json::<GenerateResponse>()?;
        extract_text(decoded).ok_or(AiError::EmptyResponse)
    }
}

fn generate_url(endpoint: &str, model: &str) -> String {
    format!(
        "{}/models/{}:generateContent",
        endpoint.trim_end_matches('/'),
        model.trim()
    )
}

fn request_body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![RequestPart { text: prompt }],
        }],
    }
}

fn extract_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect::<String>();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_text, generate_url, request_body, GeminiGenerator, GenerateResponse};
    use crate::ai::{AiError, TextGenerator};
    use crate::settings::AiSettings;

    #[test]
    fn url_joins_endpoint_and_model() {
        assert_eq!(
            generate_url("https://example.test/v1beta/", "gemini-x"),
            "https://example.test/v1beta/models/gemini-x:generateContent"
        );
    }

    #[test]
    fn request_body_matches_wire_shape() {
        let json = serde_json::to_value(request_body("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"contents":[{"parts":[{"text":"hi"}]}]}));
    }

    #[test]
    fn extract_text_concatenates_first_candidate_parts() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"a"},{"text":"b"}]}},{"content":{"parts":[{"text":"z"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("ab"));

        let empty: GenerateResponse = serde_json::from_str(r#"{"promptFeedback":{}}"#).unwrap();
        assert_eq!(extract_text(empty), None);
    }

    #[test]
    fn missing_api_key_fails_before_network() {
        let generator = GeminiGenerator::new(&AiSettings::default()).unwrap();
        assert!(matches!(
            generator.generate("x"),
            Err(AiError::MissingApiKey)
        ));
    }
}
