//! Conversation orchestrator: routes one user turn through the selected
//! pipeline variant and appends the exchange to that mode's history.

use std::sync::Arc;

use chrono::Utc;

use super::mode::ChatMode;
use super::session::SessionState;
use super::turn::ChatTurn;
use crate::core::errors::ApiError;
use crate::llm::{ChatMessage, ChatRequest, CompletionProvider};
use crate::rag::prompt;
use crate::rag::Retriever;

/// Result of one user turn.
pub struct TurnOutcome {
    /// True when the input was blank and nothing was recorded.
    pub skipped: bool,
    /// The updated history of the mode the turn ran in.
    pub turns: Vec<ChatTurn>,
    /// Documents retrieved for this turn (RAG mode only).
    pub context: Vec<String>,
}

pub struct ChatEngine {
    provider: Arc<dyn CompletionProvider>,
    retriever: Arc<Retriever>,
    top_k: usize,
}

impl ChatEngine {
    pub fn new(
        provider: Arc<dyn CompletionProvider>,
        retriever: Arc<Retriever>,
        top_k: usize,
    ) -> Self {
        Self {
            provider,
            retriever,
            top_k,
        }
    }

    /// Runs one user turn in `mode`.
    ///
    /// Blank input is ignored without recording anything. Otherwise the user
    /// turn and the assistant turn are appended as a pair sharing one
    /// capture-time timestamp; a completion failure becomes the assistant
    /// text rather than an error.
    pub async fn run_turn(
        &self,
        session: &mut SessionState,
        mode: ChatMode,
        input: &str,
    ) -> Result<TurnOutcome, ApiError> {
        if input.trim().is_empty() {
            tracing::debug!(mode = %mode, "ignoring blank input");
            return Ok(TurnOutcome {
                skipped: true,
                turns: session.history(mode).to_vec(),
                context: Vec::new(),
            });
        }

        // Retrieval runs before the user turn is recorded; a retrieval
        // failure must not leave an unpaired user turn behind.
        let context = if mode == ChatMode::Rag {
            self.retriever.retrieve(input, self.top_k).await?
        } else {
            Vec::new()
        };

        let timestamp = Utc::now().to_rfc3339();
        session.push_turn(mode, ChatTurn::user(input, &timestamp));

        let reply = match mode {
            ChatMode::Echo => input.to_string(),
            ChatMode::Stateless => self.complete(vec![ChatMessage::user(input)]).await,
            ChatMode::SystemPrompt => {
                self.complete(vec![
                    ChatMessage::system(prompt::SYSTEM_PROMPT),
                    ChatMessage::user(input),
                ])
                .await
            }
            ChatMode::HistoryAware => {
                let messages = session
                    .history(mode)
                    .iter()
                    .map(|turn| ChatMessage {
                        role: turn.role.as_str().to_string(),
                        content: turn.content.clone(),
                    })
                    .collect();
                self.complete(messages).await
            }
            ChatMode::Rag => {
                let composed = prompt::compose(input, &context);
                self.complete(vec![ChatMessage::user(composed)]).await
            }
        };

        session.push_turn(mode, ChatTurn::assistant(reply, &timestamp));
        if mode == ChatMode::Rag {
            session.set_last_context(context.clone());
        }

        tracing::info!(
            mode = %mode,
            turns = session.history(mode).len(),
            "chat turn recorded"
        );

        Ok(TurnOutcome {
            skipped: false,
            turns: session.history(mode).to_vec(),
            context,
        })
    }

    async fn complete(&self, messages: Vec<ChatMessage>) -> String {
        match self.provider.complete(ChatRequest::new(messages)).await {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("completion request failed: {}", err);
                err.to_string()
            }
        }
    }
}
