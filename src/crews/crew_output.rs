//! Crew output representation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tasks::task_output::TaskOutput;

/// The result of a crew run.
///
/// `raw` is the final task's raw text; `tasks_output` keeps every task's
/// output in execution order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Raw output of crew.
    pub raw: String,
    /// Output of each task.
    pub tasks_output: Vec<TaskOutput>,
}

impl CrewOutput {
    /// Build the crew output from the task outputs, in execution order.
    pub fn from_tasks(tasks_output: Vec<TaskOutput>) -> Self {
        let raw = tasks_output
            .last()
            .map(|output| output.raw.clone())
            .unwrap_or_default();
        Self { raw, tasks_output }
    }
}

impl fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
