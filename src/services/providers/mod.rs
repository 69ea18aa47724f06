/// LLM provider abstraction
///
/// The recommendation flow only needs one capability from a model vendor: send a single
/// user-role prompt and get back message content that is expected to be a JSON object.
/// Prompt construction and response parsing live in the gateway, so providers stay thin.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiProvider;

/// Parameters of one JSON-mode completion call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

/// Trait for LLM providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Fails with a configuration error when calls cannot succeed (e.g. no credential)
    ///
    /// Checked before any catalog read or network call so a misconfigured server fails fast.
    fn ensure_configured(&self) -> AppResult<()>;

    /// Sends the prompt and returns the raw message content
    async fn complete_json(&self, request: &CompletionRequest) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
