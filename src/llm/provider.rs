use async_trait::async_trait;
use thiserror::Error;

use super::types::ChatRequest;

/// Per-turn failure from the completion service.
///
/// The Display output is what the user sees: the orchestrator records it as
/// the assistant's reply instead of failing the turn.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Error: {status} - {body}")]
    Http { status: u16, body: String },
    #[error("Exception occurred: {0}")]
    Transport(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// return the provider name (e.g. "groq")
    fn name(&self) -> &str;

    /// chat completion (non-streaming)
    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError>;
}
