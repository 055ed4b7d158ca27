//! OpenAI-compatible chat completions provider.
//!
//! Talks to any endpoint that speaks the OpenAI Chat Completions protocol
//! (OpenAI itself, NVIDIA NIM, local gateways). Each call is a single HTTP
//! attempt; failures are returned to the caller as-is.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llms::base_llm::{BaseLLM, BaseLLMState, LLMError, LLMMessage};

/// Default OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// Chat completions client.
///
/// # Example
///
/// ```ignore
/// let provider = OpenAICompletion::new("gpt-4o", Some(key), None).connect()?;
/// let reply = provider.acall(vec![LLMMessage::user("Hi")]).await?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAICompletion {
    /// Shared base LLM state.
    #[serde(flatten)]
    pub state: BaseLLMState,
    /// Request timeout in seconds.
    pub timeout: Option<f64>,
    /// Pooled HTTP client, built once by [`OpenAICompletion::connect`].
    #[serde(skip)]
    client: Option<reqwest::Client>,
}

impl OpenAICompletion {
    /// Create a new provider. The key is sent as-is to `base_url`; no
    /// environment fallback is applied here.
    pub fn new(model: impl Into<String>, api_key: Option<String>, base_url: Option<String>) -> Self {
        let mut state = BaseLLMState::new(model);
        state.api_key = api_key;
        state.base_url = base_url;
        state.provider = "openai".to_string();

        Self {
            state,
            timeout: None,
            client: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.state.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<f64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_provider_name(mut self, provider: impl Into<String>) -> Self {
        self.state.provider = provider.into();
        self
    }

    /// Build the HTTP client that every call of this provider reuses.
    ///
    /// Fails on a negative, non-finite or overflowing timeout.
    pub fn connect(mut self) -> Result<Self, LLMError> {
        self.client = Some(build_http_client(self.timeout)?);
        Ok(self)
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.state
            .base_url
            .clone()
            .unwrap_or_else(|| OPENAI_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[LLMMessage]) -> Value {
        let mut body = serde_json::json!({
            "model": self.state.model,
            "messages": messages,
        });

        if let Some(temp) = self.state.temperature {
            body["temperature"] = serde_json::json!(temp);
        }

        body
    }

    /// Extract the assistant text from a Chat Completions response.
    pub fn parse_completions_response(&self, response: &Value) -> Result<String, LLMError> {
        let message = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .ok_or("No choices in chat completions response")?;

        let content = message
            .get("content")
            .and_then(|c| c.as_str())
            .unwrap_or("");

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "{} token usage: prompt={}, completion={}, total={}",
                self.state.provider,
                usage.get("prompt_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("completion_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
                usage.get("total_tokens").and_then(|v| v.as_i64()).unwrap_or(0),
            );
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl BaseLLM for OpenAICompletion {
    fn model(&self) -> &str {
        &self.state.model
    }

    fn temperature(&self) -> Option<f64> {
        self.state.temperature
    }

    fn provider(&self) -> &str {
        &self.state.provider
    }

    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, LLMError> {
        log::debug!(
            "OpenAICompletion.acall: provider={}, model={}, messages={}",
            self.state.provider,
            self.state.model,
            messages.len(),
        );

        let api_key = self.state.api_key.as_ref().ok_or_else(|| {
            format!(
                "API key not set for provider '{}'. Set LLM_API_KEY or the provider's key variable.",
                self.state.provider
            )
        })?;

        let body = self.build_request_body(&messages);
        let endpoint = format!("{}/chat/completions", self.api_base_url());

        let owned;
        let client = match &self.client {
            Some(client) => client,
            None => {
                owned = build_http_client(self.timeout)?;
                &owned
            }
        };

        let response = client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(format!(
                "{} API error ({}): {}",
                self.state.provider, status, response_text
            )
            .into());
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|e| {
            format!(
                "Failed to parse {} response: {} - Body: {}",
                self.state.provider,
                e,
                truncate(&response_text, 500)
            )
        })?;

        self.parse_completions_response(&response_json)
    }
}

fn build_http_client(timeout: Option<f64>) -> Result<reqwest::Client, LLMError> {
    let secs = timeout.unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("Invalid LLM timeout {}: {}", secs, e))?;
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
