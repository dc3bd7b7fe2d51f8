//! Text-generation collaborator: trait seam plus the hosted Gemini client.

pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

/// Errors surfaced by a text-generation collaborator.
///
/// Callers convert these into user-visible messages; they never crash a
/// session flow.
#[derive(thiserror::Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("The service returned an empty reply")]
    EmptyReply,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::ApiError(err.to_string())
        }
    }
}

/// Hosted text-generation collaborator.
///
/// One instruction string in, generated text out. Implementations must not
/// panic on service failure; every failure surfaces as [`LlmError`].
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, instruction: &str) -> Result<String, LlmError>;
}
