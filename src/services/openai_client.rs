use std::time::Duration;

use serde_json::{json, Value};
use tracing::debug;

use crate::{
    core::stage::PipelineStage,
    error::{PipelineError, Result},
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Minimal client for an OpenAI-compatible chat completions endpoint.
///
/// Every call builds its own HTTP client, so concurrent pipeline runs never
/// share a connection.
#[derive(Clone, Debug)]
pub struct OpenAIClient {
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    /// Single request/response exchange; failures are returned, never retried.
    pub async fn chat_completion(&self, body: &Value, timeout: Option<Duration>) -> Result<Value> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            PipelineError::GenerationService(format!("Failed to build HTTP client: {err}"))
        })?;

        let request_url = build_chat_url(&self.base_url);
        debug!(target: "itinerary::generate", url = %request_url, "sending chat completion");

        let response = client
            .post(&request_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "itinerary-pipeline")
            .json(body)
            .send()
            .await
            .map_err(|err| request_error(err, timeout))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| request_error(err, timeout))?;

        let response_json: Value = match serde_json::from_str(&response_text) {
            Ok(value) => value,
            Err(_) if !status.is_success() => {
                return Err(PipelineError::GenerationService(format!(
                    "HTTP {} error: {}",
                    status, response_text
                )));
            }
            Err(err) => {
                return Err(PipelineError::GenerationService(format!(
                    "Failed to parse JSON: {err}"
                )));
            }
        };

        if !status.is_success() {
            let api_message = response_json
                .get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or(response_text);

            return Err(PipelineError::GenerationService(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| error.to_string());
            return Err(PipelineError::GenerationService(format!(
                "API error: {}",
                error_message
            )));
        }

        Ok(response_json)
    }
}

fn request_error(err: reqwest::Error, timeout: Option<Duration>) -> PipelineError {
    match timeout {
        Some(after) if err.is_timeout() => PipelineError::Timeout {
            stage: PipelineStage::Enhancing,
            after,
        },
        _ => PipelineError::GenerationService(format!("HTTP request failed: {err}")),
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

/// Pull the first choice's message text out of a chat completion body.
pub fn extract_completion_text(response: &Value) -> Result<String> {
    response
        .get("choices")
        .and_then(|choices| choices.get(0))
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(|content| content.as_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PipelineError::GenerationService(
                "completion response contained no message content".to_string(),
            )
        })
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    max_tokens: Option<u32>,
    response_format: Option<Value>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens: None,
            response_format: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_response_format(mut self, response_format: Value) -> Self {
        self.response_format = Some(response_format);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        if let Some(response_format) = self.response_format {
            body["response_format"] = response_format;
        }

        body
    }
}
