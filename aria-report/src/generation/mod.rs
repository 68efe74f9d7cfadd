// Generation boundary - text generators behind one async capability
//
// The section writer only sees `dyn TextGenerator`; concrete clients and
// test stubs plug in behind it.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub mod openai_client;

pub use openai_client::OpenAiCompatibleClient;

/// Request sent to a generator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPrompt {
    pub system_text: String,
    pub user_text: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
}

/// Successful generator output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub provider: String,
    /// Untouched service response
    pub raw: serde_json::Value,
}

/// Generation failures
///
/// `Config` is raised while constructing a client and is fatal for a run.
/// Everything else is a per-call failure the writer recovers from.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response payload: {0}")]
    Payload(String),
}

impl From<aria_common::Error> for GenerationError {
    fn from(err: aria_common::Error) -> Self {
        GenerationError::Config(err.to_string())
    }
}

/// Text generator trait - one implementation per generation service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Client identifier (e.g., "primary", "secondary")
    fn identifier(&self) -> &str;

    /// Produce text for a prompt
    ///
    /// # Returns
    /// * `Ok(Generation)` - text plus model/provider attribution
    /// * `Err(_)` - call failed (logged and dropped by the caller)
    async fn generate(&self, prompt: &GenerationPrompt) -> Result<Generation, GenerationError>;
}
