use std::time::Duration;

use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatRequest};
use tracing::{debug, warn};

use super::{GenerationProvider, ProviderError};
use crate::constants::ASSISTANT_SYSTEM_PROMPT;

const PROVIDER: &str = "generation";

/// Chat-completion backed generator.
///
/// The provider (Groq, OpenAI, Ollama, ...) is resolved by `genai` from the model name;
/// API keys come from the provider's usual environment variable.
pub struct GenaiGenerator {
    client: Client,
    model: String,
    system_prompt: String,
    timeout: Duration,
}

impl std::fmt::Debug for GenaiGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenaiGenerator")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GenaiGenerator {
    pub fn new(model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            system_prompt: ASSISTANT_SYSTEM_PROMPT.to_string(),
            timeout,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self, prompt: &str) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::system(self.system_prompt.as_str()),
            ChatMessage::user(prompt),
        ])
    }
}

#[async_trait]
impl GenerationProvider for GenaiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending prompt to model");

        let call = self.client.exec_chat(&self.model, self.request(prompt), None);
        let response = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(model = %self.model, error = %e, "Generation failed");
                return Err(ProviderError::Request {
                    provider: PROVIDER,
                    reason: e.to_string(),
                });
            }
            Err(_) => {
                warn!(model = %self.model, timeout = ?self.timeout, "Generation timed out");
                return Err(ProviderError::Timeout {
                    provider: PROVIDER,
                    after: self.timeout,
                });
            }
        };

        // A blank completion is passed through as an empty answer.
        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            debug!(model = %self.model, "Model returned no text");
        }

        Ok(text)
    }
}
