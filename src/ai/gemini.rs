//! Google Gemini generator
//!
//! Calls the `generateContent` endpoint of the Generative Language API with a
//! single user turn and returns the text of the first candidate.
//!
//! Set `GEMINI_API_KEY` to enable it. The model defaults to
//! `gemini-2.0-flash-exp` and can be changed with `FITSENSE_GEMINI_MODEL`.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{ExternalServiceError, Generator, PromptContext};
use crate::build_info::BuildInfo;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// Gemini-backed [`Generator`]
#[derive(Clone)]
pub struct GeminiGenerator {
    client: Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for GeminiGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGenerator")
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiGenerator {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = Client::builder()
            .user_agent(BuildInfo::current().user_agent())
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_url(&self) -> String {
        format!("{}/models/{}:generateContent?key={}", API_BASE_URL, self.model, self.api_key)
    }

    fn build_request(prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(prompt.to_string()) }],
            }],
            generation_config: GenerationConfig { temperature: 0.7 },
        }
    }

    /// Error message from an error body, or the raw body
    fn api_error_message(body: &str) -> String {
        serde_json::from_str::<GeminiResponse>(body)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| body.to_string(), |e| e.message)
    }

    fn extract_text(response: GeminiResponse) -> Result<String, ExternalServiceError> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ExternalServiceError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    fn name(&self) -> &'static str {
        "gemini"
    }

    #[instrument(skip(self, context), fields(model = %self.model, kind = context.kind.as_str()))]
    async fn generate(&self, context: &PromptContext) -> Result<String, ExternalServiceError> {
        debug!("Sending request to Gemini API");

        let response = self
            .client
            .post(self.build_url())
            .json(&Self::build_request(&context.prompt))
            .send()
            .await
            .map_err(|e| ExternalServiceError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ExternalServiceError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(ExternalServiceError::Status {
                status: status.as_u16(),
                message: Self::api_error_message(&body),
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| ExternalServiceError::MalformedJson(e.to_string()))?;

        if let Some(err) = parsed.error {
            return Err(ExternalServiceError::Status { status: status.as_u16(), message: err.message });
        }

        let text = Self::extract_text(parsed)?;
        debug!(chars = text.len(), "Received Gemini response");
        Ok(text)
    }
}
