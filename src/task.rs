//! Main Task struct.
//!
//! A task is a templated instruction (`{placeholder}` inputs) bound to the
//! role of the agent that should carry it out.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::llms::base_llm::LLMMessage;
use crate::tasks::task_output::TaskOutput;
use crate::utilities::string_utils::interpolate_only;

/// Represents a task to be executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Optional name for the task.
    #[serde(default)]
    pub name: Option<String>,
    /// Descriptive text detailing the task's purpose and execution.
    pub description: String,
    /// Clear definition of expected task outcome.
    pub expected_output: String,
    /// Role of the agent responsible for execution.
    #[serde(default)]
    pub agent: Option<String>,
    /// Ask the agent to format its answer as markdown.
    #[serde(default)]
    pub markdown: bool,
}

impl Task {
    /// Create a new task.
    pub fn new(description: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            name: None,
            description: description.into(),
            expected_output: expected_output.into(),
            agent: None,
            markdown: false,
        }
    }

    /// Assign the task to the agent with the given role.
    pub fn with_agent(mut self, role: impl Into<String>) -> Self {
        self.agent = Some(role.into());
        self
    }

    /// Return a copy with `{key}` placeholders filled from `inputs`.
    ///
    /// Fails when the description or expected output references a key that is
    /// not present. JSON braces in the templates are left untouched.
    pub fn interpolate_inputs(&self, inputs: &HashMap<String, String>) -> Result<Self, String> {
        Ok(Self {
            description: interpolate_only(Some(&self.description), inputs)?,
            expected_output: interpolate_only(Some(&self.expected_output), inputs)?,
            ..self.clone()
        })
    }

    /// Generate the task prompt sent to the agent.
    pub fn prompt(&self) -> String {
        let mut tasks_slices = vec![self.description.clone()];

        tasks_slices.push(format!(
            "\nThis is the expected criteria for your final answer: {}\n\
             you MUST return the actual complete content as the final answer, not a summary.",
            self.expected_output
        ));

        if self.markdown {
            tasks_slices.push(
                "Your final answer MUST be formatted in Markdown syntax.".to_string(),
            );
        }

        tasks_slices.join("\n")
    }

    /// Execute the task with the given agent.
    pub async fn execute(&self, agent: &Agent, context: Option<&str>) -> Result<TaskOutput, String> {
        let start = Utc::now();
        let task_prompt = self.prompt();

        let raw = agent.execute_task(&task_prompt, context).await?;

        let mut output = TaskOutput::new(self.description.clone(), agent.role.clone(), raw);
        output.name = self.name.clone();
        output.expected_output = Some(self.expected_output.clone());
        output.messages = vec![
            LLMMessage::user(task_prompt),
            LLMMessage::assistant(output.raw.clone()),
        ];

        log::debug!(
            "Task '{}' completed by '{}' in {} ms",
            output.summary.as_deref().unwrap_or_default(),
            agent.role,
            (Utc::now() - start).num_milliseconds()
        );

        Ok(output)
    }
}
