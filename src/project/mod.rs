//! Declarative crew definitions.
//!
//! Agents, tasks, process and manager for each endpoint are described in
//! YAML (`config/crews.yaml`, embedded at build time) and turned into
//! [`Crew`] values bound to a shared LLM at startup.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::agent::Agent;
use crate::crew::Crew;
use crate::llms::base_llm::BaseLLM;
use crate::process::Process;
use crate::task::Task;

/// Crew definitions shipped with the binary.
pub const DEFAULT_CREWS_YAML: &str = include_str!("../../config/crews.yaml");

/// Errors raised while loading crew definitions.
#[derive(Debug, Error)]
pub enum CrewsConfigError {
    #[error("Failed to read crew config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid crew config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Invalid crew '{crew}': {reason}")]
    Crew { crew: String, reason: String },
}

/// Agent definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    #[serde(default)]
    pub verbose: bool,
}

impl AgentConfig {
    /// Instantiate the agent with the given LLM.
    pub fn build(&self, llm: Arc<dyn BaseLLM>) -> Agent {
        let mut agent = Agent::new(&self.role, &self.goal, &self.backstory).with_llm(llm);
        agent.verbose = self.verbose;
        agent
    }
}

/// One crew: its agents, tasks and process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub process: Process,
    #[serde(default)]
    pub manager: Option<AgentConfig>,
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub verbose: bool,
}

impl CrewConfig {
    /// Build a runnable crew whose agents all share `llm`.
    pub fn build(&self, llm: Arc<dyn BaseLLM>) -> Result<Crew, String> {
        let agents = self
            .agents
            .iter()
            .map(|agent| agent.build(llm.clone()))
            .collect();

        let mut crew = Crew::new(agents, self.tasks.clone()).with_process(self.process);
        crew.verbose = self.verbose;
        if let Some(name) = &self.name {
            crew = crew.with_name(name);
        }
        if let Some(manager) = &self.manager {
            crew = crew.with_manager(manager.build(llm));
        }

        crew.validate()?;
        Ok(crew)
    }
}

/// Crew definitions for every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewsConfig {
    /// Crew behind `POST /generate-product`.
    pub product: CrewConfig,
    /// Crew behind `POST /generate-blog-post`.
    pub blog: CrewConfig,
}

impl CrewsConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CrewsConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load definitions from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CrewsConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CrewsConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// The embedded default definitions.
    pub fn default_config() -> Result<Self, CrewsConfigError> {
        Self::from_yaml_str(DEFAULT_CREWS_YAML)
    }

    /// Load from `path` when given, otherwise use the embedded definitions.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, CrewsConfigError> {
        match path {
            Some(path) => {
                log::info!("Loading crew definitions from {}", path.display());
                Self::load(path)
            }
            None => Self::default_config(),
        }
    }

    /// Build the product and blog crews.
    pub fn build(&self, llm: Arc<dyn BaseLLM>) -> Result<(Crew, Crew), CrewsConfigError> {
        let product = self
            .product
            .build(llm.clone())
            .map_err(|reason| CrewsConfigError::Crew {
                crew: "product".to_string(),
                reason,
            })?;
        let blog = self.blog.build(llm).map_err(|reason| CrewsConfigError::Crew {
            crew: "blog".to_string(),
            reason,
        })?;
        Ok((product, blog))
    }
}
