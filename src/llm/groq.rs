use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::provider::{CompletionError, CompletionProvider};
use super::types::ChatRequest;
use crate::core::config::CompletionSettings;

/// OpenAI-compatible client for the Groq chat completions endpoint.
pub struct GroqProvider {
    base_url: String,
    model: String,
    temperature: Option<f64>,
    api_key: String,
    client: Client,
}

impl GroqProvider {
    pub fn new(settings: &CompletionSettings, api_key: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, request: ChatRequest) -> Result<String, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.model,
            "messages": request.messages,
        });

        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature.or(self.temperature) {
                obj.insert("temperature".to_string(), json!(t));
            }
        }

        tracing::debug!(model = %self.model, "sending completion request");

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status().as_u16();
            let text = res.text().await.unwrap_or_default();
            return Err(CompletionError::Http { status, body: text });
        }

        let payload: Value = res
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                CompletionError::Transport("response carried no message content".to_string())
            })?;

        Ok(content.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::types::ChatMessage;

    #[tokio::test]
    #[ignore] // hits the live endpoint; needs GROQ_API_KEY
    async fn completes_a_simple_prompt() {
        let key = std::env::var("GROQ_API_KEY").unwrap();
        let provider = GroqProvider::new(&CompletionSettings::default(), &key).unwrap();

        let reply = provider
            .complete(ChatRequest::new(vec![ChatMessage::user(
                "Reply with the single word: pong",
            )]))
            .await
            .unwrap();

        assert!(!reply.is_empty());
    }

    #[tokio::test]
    #[ignore] // hits the live endpoint
    async fn bad_key_surfaces_http_status_and_body() {
        let provider = GroqProvider::new(&CompletionSettings::default(), "invalid-key").unwrap();

        let err = provider
            .complete(ChatRequest::new(vec![ChatMessage::user("hello")]))
            .await
            .unwrap_err();

        match err {
            CompletionError::Http { status, .. } => assert_eq!(status, 401),
            other => panic!("expected http error, got: {other}"),
        }
    }
}
