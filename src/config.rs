//! Process settings read from the environment at startup.

use std::path::PathBuf;

use thiserror::Error;

use crate::llm::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, LLM};
use crate::utilities::file_handler::FileHandler;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_LLM_TIMEOUT_SECS: f64 = 120.0;

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("Invalid LLM configuration: {0}")]
    Llm(String),
}

/// Immutable service configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub llm_model: String,
    pub llm_temperature: f64,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_timeout_secs: f64,
    pub crews_config: Option<PathBuf>,
    pub debug_artifact_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_temperature: DEFAULT_TEMPERATURE,
            llm_api_key: None,
            llm_base_url: None,
            llm_timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            crews_config: None,
            debug_artifact_dir: None,
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`; blank values count as unset.
    ///
    /// `LLM_API_KEY` falls back to the key variable of the model's own
    /// provider only (`NVIDIA_NIM_API_KEY` or `OPENAI_API_KEY`), and
    /// `LLM_BASE_URL` to `NVIDIA_NIM_API_BASE` for NIM models.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let llm_model = get("LLM_MODEL").unwrap_or(defaults.llm_model);
        let nim = LLM::new(&llm_model).infer_provider() == "nvidia_nim";
        let provider_key = if nim { "NVIDIA_NIM_API_KEY" } else { "OPENAI_API_KEY" };

        let llm_timeout_secs: f64 = parse_or(
            "LLM_TIMEOUT_SECS",
            get("LLM_TIMEOUT_SECS"),
            defaults.llm_timeout_secs,
        )?;
        if !llm_timeout_secs.is_finite() || llm_timeout_secs <= 0.0 {
            return Err(SettingsError::InvalidValue {
                name: "LLM_TIMEOUT_SECS",
                value: llm_timeout_secs.to_string(),
            });
        }

        Ok(Self {
            port: parse_or("PORT", get("PORT"), defaults.port)?,
            llm_temperature: parse_or(
                "LLM_TEMPERATURE",
                get("LLM_TEMPERATURE"),
                defaults.llm_temperature,
            )?,
            llm_api_key: get("LLM_API_KEY").or_else(|| get(provider_key)),
            llm_base_url: get("LLM_BASE_URL")
                .or_else(|| if nim { get("NVIDIA_NIM_API_BASE") } else { None }),
            llm_model,
            llm_timeout_secs,
            crews_config: get("CREWS_CONFIG").map(PathBuf::from),
            debug_artifact_dir: get("DEBUG_ARTIFACT_DIR").map(PathBuf::from),
        })
    }

    /// The LLM configured by these settings, with its HTTP client built.
    pub fn llm(&self) -> Result<LLM, SettingsError> {
        let mut llm = LLM::new(&self.llm_model)
            .temperature(self.llm_temperature)
            .timeout(self.llm_timeout_secs);
        if let Some(key) = &self.llm_api_key {
            llm = llm.api_key(key);
        }
        if let Some(url) = &self.llm_base_url {
            llm = llm.base_url(url);
        }
        llm.connect().map_err(SettingsError::Llm)
    }

    /// Debug artifact writer, when a directory is configured.
    pub fn artifact_handler(&self) -> Option<FileHandler> {
        self.debug_artifact_dir.as_ref().map(FileHandler::new)
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, SettingsError> {
    match value {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| SettingsError::InvalidValue { name, value }),
    }
}
