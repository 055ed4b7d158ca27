//! Base LLM trait and shared provider state.
//!
//! Every chat model the crews talk to implements [`BaseLLM`]. Providers embed
//! a [`BaseLLMState`] for the fields they all share (model, temperature,
//! credentials, endpoint).

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Boxed error returned by LLM calls.
pub type LLMError = Box<dyn std::error::Error + Send + Sync>;

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role of the sender ("system", "user" or "assistant").
    pub role: String,
    /// Text content of the message.
    pub content: String,
}

impl LLMMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Generate a unique id used to correlate log lines of one LLM call.
pub fn generate_call_id() -> String {
    Uuid::new_v4().to_string()
}

/// Interface every LLM implementation follows.
///
/// Implementations should report timeouts, authentication failures and
/// malformed provider responses as errors rather than panicking.
#[async_trait]
pub trait BaseLLM: Send + Sync + fmt::Debug {
    /// Model identifier.
    fn model(&self) -> &str;

    /// Sampling temperature, if one is set.
    fn temperature(&self) -> Option<f64>;

    /// Provider name.
    fn provider(&self) -> &str {
        "openai"
    }

    /// Send the conversation and return the assistant's text reply.
    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, LLMError>;
}

/// Shared state for LLM implementations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseLLMState {
    /// The model identifier/name.
    pub model: String,
    /// Optional temperature setting for response generation.
    pub temperature: Option<f64>,
    /// Optional API key.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Optional base URL for the API.
    pub base_url: Option<String>,
    /// Provider name (e.g., "openai", "nvidia_nim").
    pub provider: String,
}

impl BaseLLMState {
    /// Create a new `BaseLLMState` with the given model name.
    ///
    /// # Panics
    ///
    /// Panics if `model` is empty.
    pub fn new(model: impl Into<String>) -> Self {
        let model = model.into();
        assert!(!model.is_empty(), "Model name is required and cannot be empty");

        Self {
            model,
            temperature: None,
            api_key: None,
            base_url: None,
            provider: "openai".to_string(),
        }
    }
}

pub fn emit_call_started_event(model: &str, messages: &[LLMMessage], call_id: &str) {
    log::debug!(
        "LLM call started: model={}, call_id={}, messages={}",
        model,
        call_id,
        messages.len()
    );
}

pub fn emit_call_completed_event(model: &str, call_id: &str, response_len: usize) {
    log::debug!(
        "LLM call completed: model={}, call_id={}, response_len={}",
        model,
        call_id,
        response_len
    );
}

pub fn emit_call_failed_event(model: &str, error: &str, call_id: &str) {
    log::warn!(
        "LLM call failed: model={}, error={}, call_id={}",
        model,
        error,
        call_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_llm_state_new() {
        let state = BaseLLMState::new("gpt-4o");
        assert_eq!(state.model, "gpt-4o");
        assert_eq!(state.provider, "openai");
        assert!(state.api_key.is_none());
    }

    #[test]
    #[should_panic(expected = "Model name is required")]
    fn test_base_llm_state_empty_model() {
        BaseLLMState::new("");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let mut state = BaseLLMState::new("gpt-4o");
        state.api_key = Some("secret".to_string());
        let json = serde_json::to_string(&state).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_generate_call_id() {
        let id1 = generate_call_id();
        let id2 = generate_call_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }
}
