//! # content-crew
//!
//! Turns a free-text prompt into a structured product listing or blog post.
//!
//! Each request runs a small LLM-backed crew (a writer agent reviewed by a
//! manager agent), then repairs the model's text into strict JSON and
//! validates it against the endpoint's schema before it is returned.
//!
//! - [`crew`], [`agent`], [`task`] - the generation crew
//! - [`llm`], [`llms`] - model configuration and provider clients
//! - [`utilities::converter`] - fence stripping and JSON repair
//! - [`schemas`] - output schemas and validation
//! - [`pipelines`] - generate → repair → validate
//! - [`server`] - axum HTTP endpoints

pub mod agent;
pub mod config;
pub mod crew;
pub mod crews;
pub mod llm;
pub mod llms;
pub mod pipelines;
pub mod process;
pub mod project;
pub mod schemas;
pub mod server;
pub mod task;
pub mod tasks;
pub mod utilities;

pub use agent::Agent;
pub use crew::Crew;
pub use crews::crew_output::CrewOutput;
pub use llm::LLM;
pub use llms::base_llm::BaseLLM;
pub use pipelines::{ContentGenerator, ContentPipeline, PipelineError};
pub use process::Process;
pub use schemas::{BlogPost, OutputSchema, ProductDescription};
pub use task::Task;
pub use tasks::task_output::TaskOutput;
pub use utilities::errors::ValidationError;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
