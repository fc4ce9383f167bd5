use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::openai_client::{extract_completion_text, ChatCompletionRequest, OpenAIClient};
use crate::error::Result;

pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// The generative second stage: prompt in, most likely completion text out.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// [`GenerationService`] backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct ChatCompletionService {
    client: OpenAIClient,
    model: String,
    max_tokens: Option<u32>,
    timeout: Option<Duration>,
    json_mode: bool,
}

impl ChatCompletionService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: OpenAIClient::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            timeout: Some(DEFAULT_TIMEOUT),
            json_mode: false,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ask the service for a bare JSON object (`response_format: json_object`).
    pub fn with_json_mode(mut self, json_mode: bool) -> Self {
        self.json_mode = json_mode;
        self
    }
}

#[async_trait]
impl GenerationService for ChatCompletionService {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let mut request = ChatCompletionRequest::new(
            self.model.clone(),
            vec![json!({
                "role": "user",
                "content": prompt
            })],
        )
        .with_max_tokens(self.max_tokens);

        if self.json_mode {
            request = request.with_response_format(json!({"type": "json_object"}));
        }

        let response = self
            .client
            .chat_completion(&request.into_value(), self.timeout)
            .await?;

        if let Some(usage) = response.get("usage") {
            debug!(
                target: "itinerary::generate",
                prompt_tokens = usage.get("prompt_tokens").and_then(|v| v.as_u64()),
                completion_tokens = usage.get("completion_tokens").and_then(|v| v.as_u64()),
                "completion received"
            );
        }

        extract_completion_text(&response)
    }
}
