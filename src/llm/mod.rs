//! Main LLM struct.
//!
//! [`LLM`] holds the model configuration chosen at startup and routes each
//! call to the matching provider client. Provider-level abstractions live in
//! [`crate::llms`].
//!
//! Credentials and endpoints are taken only from the fields set here; the
//! environment is read once by [`crate::config::Settings`].

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::llms::base_llm::{
    emit_call_completed_event, emit_call_failed_event, emit_call_started_event, generate_call_id,
    BaseLLM, LLMError, LLMMessage,
};
use crate::llms::providers::openai::OpenAICompletion;

/// Default model: Llama 3 70B served by NVIDIA NIM.
pub const DEFAULT_MODEL: &str = "nvidia_nim/meta/llama3-70b-instruct";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// NVIDIA NIM OpenAI-compatible endpoint.
pub const NVIDIA_NIM_API_BASE: &str = "https://integrate.api.nvidia.com/v1";

/// Providers reachable through the OpenAI-compatible client.
pub const SUPPORTED_PROVIDERS: &[&str] = &["openai", "nvidia_nim"];

/// Model configuration plus provider routing.
///
/// The provider client (and its HTTP connection pool) is built on the first
/// call, or eagerly by [`LLM::connect`], and reused afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LLM {
    /// Model identifier, optionally prefixed with a provider
    /// (e.g. "nvidia_nim/meta/llama3-70b-instruct", "gpt-4o").
    pub model: String,
    /// Temperature parameter for generation.
    pub temperature: Option<f64>,
    /// API key for authentication.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Base URL override for the API endpoint.
    pub base_url: Option<String>,
    /// Timeout for API calls in seconds.
    pub timeout: Option<f64>,
    /// Explicit provider override.
    pub provider: Option<String>,
    #[serde(skip)]
    client: OnceCell<OpenAICompletion>,
}

impl LLM {
    /// Create a new LLM with a model identifier.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    // --- Builder-style setters ---

    /// Set the temperature.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the timeout in seconds.
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    // --- Provider inference ---

    /// Infer the provider from the explicit override or the model name.
    pub fn infer_provider(&self) -> String {
        if let Some(ref provider) = self.provider {
            return provider.clone();
        }

        let model_lower = self.model.to_lowercase();

        if let Some((prefix, _)) = model_lower.split_once('/') {
            match prefix {
                "openai" => return "openai".to_string(),
                "nvidia_nim" | "nvidia" => return "nvidia_nim".to_string(),
                _ => {}
            }
        }

        "openai".to_string()
    }

    /// Model name as the provider's API expects it (provider prefix removed).
    pub fn provider_model_name(&self) -> &str {
        match self.model.split_once('/') {
            Some((prefix, rest))
                if matches!(
                    prefix.to_lowercase().as_str(),
                    "openai" | "nvidia_nim" | "nvidia"
                ) =>
            {
                rest
            }
            _ => &self.model,
        }
    }

    /// Base URL for the inferred provider, honouring an explicit override.
    pub fn resolved_base_url(&self) -> Option<String> {
        if self.base_url.is_some() {
            return self.base_url.clone();
        }
        match self.infer_provider().as_str() {
            "nvidia_nim" => Some(NVIDIA_NIM_API_BASE.to_string()),
            _ => None,
        }
    }

    /// Build a provider client for this configuration.
    pub fn completion(&self) -> Result<OpenAICompletion, String> {
        let provider = self.infer_provider();
        if !SUPPORTED_PROVIDERS.contains(&provider.as_str()) {
            return Err(format!(
                "Provider '{}' not yet wired. Supported: {}",
                provider,
                SUPPORTED_PROVIDERS.join(", ")
            ));
        }

        OpenAICompletion::new(
            self.provider_model_name(),
            self.api_key.clone(),
            self.resolved_base_url(),
        )
        .with_provider_name(provider)
        .with_temperature(self.temperature)
        .with_timeout(self.timeout)
        .connect()
        .map_err(|e| e.to_string())
    }

    /// The shared provider client, built on first use.
    pub fn client(&self) -> Result<&OpenAICompletion, String> {
        self.client.get_or_try_init(|| self.completion())
    }

    /// Build the provider client now so configuration errors surface at
    /// startup rather than on the first request.
    pub fn connect(self) -> Result<Self, String> {
        self.client()?;
        Ok(self)
    }
}

#[async_trait]
impl BaseLLM for LLM {
    fn model(&self) -> &str {
        &self.model
    }

    fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    fn provider(&self) -> &str {
        match self.provider.as_deref() {
            Some(provider) => provider,
            None if self.model.to_lowercase().starts_with("nvidia") => "nvidia_nim",
            None => "openai",
        }
    }

    async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, LLMError> {
        let call_id = generate_call_id();
        emit_call_started_event(&self.model, &messages, &call_id);

        let completion = self.client()?;
        match completion.acall(messages).await {
            Ok(text) => {
                emit_call_completed_event(&self.model, &call_id, text.len());
                Ok(text)
            }
            Err(e) => {
                emit_call_failed_event(&self.model, &e.to_string(), &call_id);
                Err(e)
            }
        }
    }
}
