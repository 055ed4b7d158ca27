//! Task output representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::llms::base_llm::LLMMessage;

/// The result of one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Description of the task.
    pub description: String,
    /// Name of the task.
    pub name: Option<String>,
    /// Expected output of the task.
    pub expected_output: Option<String>,
    /// Summary of the task (auto-generated from description).
    pub summary: Option<String>,
    /// Raw output of the task.
    pub raw: String,
    /// Role of the agent that executed the task.
    pub agent: String,
    /// Task prompt and the agent's answer.
    #[serde(default)]
    pub messages: Vec<LLMMessage>,
}

impl TaskOutput {
    /// Create a new TaskOutput with summary auto-generated from description.
    pub fn new(description: String, agent: String, raw: String) -> Self {
        let summary = Self::generate_summary(&description);
        Self {
            description,
            name: None,
            expected_output: None,
            summary: Some(summary),
            raw,
            agent,
            messages: Vec::new(),
        }
    }

    /// Generate a summary from the description (first 10 words + "...").
    fn generate_summary(description: &str) -> String {
        let excerpt: String = description
            .split_whitespace()
            .take(10)
            .collect::<Vec<&str>>()
            .join(" ");
        format!("{}...", excerpt)
    }
}

impl fmt::Display for TaskOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_first_ten_words() {
        let output = TaskOutput::new(
            "one two three four five six seven eight nine ten eleven".to_string(),
            "Writer".to_string(),
            "raw".to_string(),
        );
        assert_eq!(
            output.summary.as_deref(),
            Some("one two three four five six seven eight nine ten...")
        );
        assert_eq!(output.to_string(), "raw");
    }
}
