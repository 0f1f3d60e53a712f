//! Generative recommendation service
//!
//! The [`Generator`] trait is the only seam between the engine and an external
//! text generator. Prompts are built in [`prompts`], responses are validated
//! into engine types in [`parse`], and [`gemini`] talks to Google's API.

pub mod gemini;
pub mod parse;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiGenerator;

/// Anything that can go wrong talking to the generator or reading its answer.
/// Always absorbed by the rule-based fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExternalServiceError {
    #[error("generative service is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("no response within {0} seconds")]
    Timeout(u64),

    #[error("service returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("service returned no text")]
    EmptyResponse,

    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error("response field '{field}' is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ExternalServiceError {
    /// Transport failures, timeouts, and server-side statuses are worth another
    /// attempt. A bad answer is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ExternalServiceError::Transport(_) | ExternalServiceError::Timeout(_) => true,
            ExternalServiceError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// What a prompt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Diet,
    Workout,
    CustomWorkout,
    CalorieBurn,
}

impl PromptKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Diet => "diet",
            PromptKind::Workout => "workout",
            PromptKind::CustomWorkout => "custom_workout",
            PromptKind::CalorieBurn => "calorie_burn",
        }
    }
}

/// A rendered prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub kind: PromptKind,
    pub prompt: String,
}

/// External text generator
#[async_trait]
pub trait Generator: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Send a prompt and return the raw text answer
    async fn generate(&self, context: &PromptContext) -> Result<String, ExternalServiceError>;
}
