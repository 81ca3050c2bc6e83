pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiClient;

/// Shown when the model answered but gave us nothing we can display.
pub const NO_CONTENT_FALLBACK: &str = "The system is overwhelmed by sugar intake. Try again later.";

/// Shown when the request itself failed: network, HTTP status, or a body that isn't JSON.
pub const CONNECTION_FALLBACK: &str = "Error: My wooden sword broke. (API Connection Failed)";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How a single gateway call resolved. Every variant renders as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    NoContent,
    Broken,
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Answer(text) => text,
            Reply::NoContent => NO_CONTENT_FALLBACK,
            Reply::Broken => CONNECTION_FALLBACK,
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Reply::Answer(_))
    }
}

/// A remote model that turns a prompt plus system instruction into a reply.
///
/// Implementations make at most one call per invocation and never fail:
/// problems are folded into [`Reply::NoContent`] or [`Reply::Broken`].
#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn query(&self, user_prompt: &str, system_instruction: &str) -> Reply;
}
