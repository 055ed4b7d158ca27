//! Generation pipelines.
//!
//! A [`ContentPipeline`] runs one generation call, repairs the returned text
//! and validates it against an [`OutputSchema`]. Each endpoint owns one
//! pipeline; nothing in it is mutated after startup.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::crew::Crew;
use crate::schemas::{JsonObject, OutputSchema};
use crate::utilities::converter::repair_json_text;
use crate::utilities::errors::ValidationError;
use crate::utilities::file_handler::FileHandler;

/// Something that turns template inputs into raw model text.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(&self, inputs: &HashMap<String, String>) -> Result<String, String>;
}

#[async_trait]
impl ContentGenerator for Crew {
    async fn generate(&self, inputs: &HashMap<String, String>) -> Result<String, String> {
        Ok(self.kickoff(inputs).await?.raw)
    }
}

/// Pipeline failure classes.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The generation call failed or produced nothing.
    #[error("{0}")]
    Generation(String),
    /// The generated text could not be repaired into a valid object.
    #[error("Invalid response format: {0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Internal(String),
}

/// Generate → repair → parse → validate for one output schema.
#[derive(Clone)]
pub struct ContentPipeline {
    generator: Arc<dyn ContentGenerator>,
    schema: OutputSchema,
    artifacts: Option<FileHandler>,
}

impl ContentPipeline {
    pub fn new(generator: Arc<dyn ContentGenerator>, schema: OutputSchema) -> Self {
        Self {
            generator,
            schema,
            artifacts: None,
        }
    }

    /// Dump failing responses into `handler`'s directory.
    pub fn with_artifacts(mut self, handler: Option<FileHandler>) -> Self {
        self.artifacts = handler;
        self
    }

    /// Run a single generation attempt and validate its output.
    pub async fn run(&self, inputs: &HashMap<String, String>) -> Result<JsonObject, PipelineError> {
        let raw = self
            .generator
            .generate(inputs)
            .await
            .map_err(PipelineError::Generation)?;

        if raw.trim().is_empty() {
            return Err(PipelineError::Generation(
                "Generation returned no output".to_string(),
            ));
        }
        log::debug!("{} generation returned {} bytes", self.schema, raw.len());

        let repaired = repair_json_text(&raw);
        self.schema.parse_and_validate(&repaired).map_err(|err| {
            log::warn!("{} response rejected ({}): {}", self.schema, err.kind(), err);
            if let Some(handler) = &self.artifacts {
                handler.save_artifact(&self.schema.to_string(), &err.to_string(), &raw, &repaired);
            }
            PipelineError::Validation(err)
        })
    }
}
