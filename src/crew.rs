//! Main Crew struct.
//!
//! A crew runs its tasks in order, feeding each task the outputs of the
//! tasks before it. Under [`Process::Hierarchical`] a manager agent reviews
//! every draft before it becomes the task's output.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::agent::core::Agent;
use crate::crews::crew_output::CrewOutput;
use crate::process::Process;
use crate::task::Task;
use crate::tasks::task_output::TaskOutput;

/// Separator placed between earlier task outputs when used as context.
const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// A group of agents and the tasks they perform.
#[derive(Clone)]
pub struct Crew {
    /// Optional name for the crew.
    pub name: Option<String>,
    /// Unique identifier for the crew instance.
    pub id: Uuid,
    /// Agents part of this crew.
    pub agents: Vec<Agent>,
    /// Tasks assigned to the crew, in execution order.
    pub tasks: Vec<Task>,
    /// The process flow that the crew will follow.
    pub process: Process,
    /// Manager agent for hierarchical process.
    pub manager_agent: Option<Agent>,
    /// Log every task output at info level.
    pub verbose: bool,
}

impl Crew {
    /// Create a sequential crew.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>) -> Self {
        Self {
            name: None,
            id: Uuid::new_v4(),
            agents,
            tasks,
            process: Process::Sequential,
            manager_agent: None,
            verbose: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_process(mut self, process: Process) -> Self {
        self.process = process;
        self
    }

    pub fn with_manager(mut self, manager: Agent) -> Self {
        self.manager_agent = Some(manager);
        self
    }

    /// Look up a crew agent by role.
    pub fn get_agent(&self, role: &str) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.role == role)
    }

    /// Check that the crew can run: it has tasks, every task resolves to an
    /// agent, and a hierarchical crew has a manager.
    pub fn validate(&self) -> Result<(), String> {
        if self.tasks.is_empty() {
            return Err("Crew has no tasks".to_string());
        }
        if self.process == Process::Hierarchical && self.manager_agent.is_none() {
            return Err("Hierarchical process requires a manager agent".to_string());
        }
        for task in &self.tasks {
            self.agent_for(task)?;
        }
        Ok(())
    }

    /// Run every task with the given template inputs.
    pub async fn kickoff(&self, inputs: &HashMap<String, String>) -> Result<CrewOutput, String> {
        self.validate()?;
        log::debug!(
            "Crew '{}' kickoff: process={}, tasks={}",
            self.display_name(),
            self.process,
            self.tasks.len()
        );

        let mut task_outputs: Vec<TaskOutput> = Vec::new();

        for template in &self.tasks {
            let task = template.interpolate_inputs(inputs)?;
            let context = if task_outputs.is_empty() {
                None
            } else {
                Some(
                    task_outputs
                        .iter()
                        .map(|o| o.raw.clone())
                        .collect::<Vec<String>>()
                        .join(CONTEXT_SEPARATOR),
                )
            };

            let agent = self.agent_for(&task)?;
            let mut output = task.execute(agent, context.as_deref()).await?;

            if self.process == Process::Hierarchical {
                if let Some(manager) = self.manager_agent.as_ref().filter(|m| m.id != agent.id) {
                    output = self.review(manager, &task, output).await?;
                }
            }

            if self.verbose {
                log::info!("Crew '{}' task output:\n{}", self.display_name(), output.raw);
            }
            task_outputs.push(output);
        }

        Ok(CrewOutput::from_tasks(task_outputs))
    }

    /// Agent responsible for a task.
    ///
    /// Unassigned tasks go to the manager in a hierarchical crew, otherwise to
    /// the only agent of a single-agent crew.
    fn agent_for(&self, task: &Task) -> Result<&Agent, String> {
        match task.agent.as_deref() {
            Some(role) => self
                .get_agent(role)
                .or_else(|| self.manager_agent.as_ref().filter(|m| m.role == role))
                .ok_or_else(|| format!("No agent with role '{}' in crew", role)),
            None => match (&self.process, &self.manager_agent) {
                (Process::Hierarchical, Some(manager)) => Ok(manager),
                _ if self.agents.len() == 1 => Ok(&self.agents[0]),
                _ => Err(format!(
                    "The task '{}' has no agent assigned",
                    truncate_words(&task.description, 10)
                )),
            },
        }
    }

    /// Have the manager check a worker's draft against the task criteria.
    async fn review(
        &self,
        manager: &Agent,
        task: &Task,
        draft: TaskOutput,
    ) -> Result<TaskOutput, String> {
        let review = Task::new(
            format!(
                "Review the work delivered by {} for the following task:\n\n{}\n\n\
                 If the work fully meets the expected criteria, return it unchanged. \
                 Otherwise return a corrected, complete version. Return only the final \
                 deliverable in exactly the format the task asks for, with no commentary.",
                draft.agent, task.description
            ),
            task.expected_output.clone(),
        );

        let mut reviewed = review.execute(manager, Some(&draft.raw)).await?;
        reviewed.description = task.description.clone();
        reviewed.name = task.name.clone();
        Ok(reviewed)
    }

    fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }
}

impl fmt::Debug for Crew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crew")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("agents", &self.agents)
            .field("tasks", &self.tasks.len())
            .field("process", &self.process)
            .field("manager_agent", &self.manager_agent.as_ref().map(|m| &m.role))
            .finish()
    }
}

fn truncate_words(text: &str, words: usize) -> String {
    text.split_whitespace().take(words).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::agent::core::tests::ScriptedLLM;

    fn inputs() -> HashMap<String, String> {
        HashMap::from([("prompt".to_string(), "a walnut desk".to_string())])
    }

    fn writer(llm: Arc<ScriptedLLM>) -> Agent {
        Agent::new("Writer", "Write listings", "Seasoned copywriter.").with_llm(llm)
    }

    fn manager(llm: Arc<ScriptedLLM>) -> Agent {
        Agent::new("Manager", "Keep listings complete", "Product manager.").with_llm(llm)
    }

    #[tokio::test]
    async fn test_sequential_kickoff_passes_context() {
        let llm = Arc::new(ScriptedLLM::new(vec![
            Ok("outline".to_string()),
            Ok("final text".to_string()),
        ]));
        let crew = Crew::new(
            vec![writer(llm.clone())],
            vec![
                Task::new("Outline {prompt}", "An outline"),
                Task::new("Write {prompt}", "Final text"),
            ],
        );

        let output = crew.kickoff(&inputs()).await.unwrap();
        assert_eq!(output.raw, "final text");
        assert_eq!(output.tasks_output.len(), 2);

        let calls = llm.calls();
        assert!(calls[0][1].content.starts_with("Outline a walnut desk"));
        assert!(calls[1][1].content.contains("working with:\noutline"));
    }

    #[tokio::test]
    async fn test_hierarchical_manager_reviews_draft() {
        let worker_llm = Arc::new(ScriptedLLM::new(vec![Ok("draft".to_string())]));
        let manager_llm = Arc::new(ScriptedLLM::new(vec![Ok("approved".to_string())]));
        let crew = Crew::new(
            vec![writer(worker_llm.clone())],
            vec![Task::new("Describe {prompt}", "JSON").with_agent("Writer")],
        )
        .with_process(Process::Hierarchical)
        .with_manager(manager(manager_llm.clone()));

        let output = crew.kickoff(&inputs()).await.unwrap();
        assert_eq!(output.raw, "approved");
        assert_eq!(output.tasks_output[0].agent, "Manager");
        assert_eq!(output.tasks_output[0].description, "Describe a walnut desk");

        let review_prompt = &manager_llm.calls()[0][1].content;
        assert!(review_prompt.contains("delivered by Writer"));
        assert!(review_prompt.ends_with("working with:\ndraft"));
    }

    #[tokio::test]
    async fn test_hierarchical_unassigned_task_goes_to_manager() {
        let manager_llm = Arc::new(ScriptedLLM::new(vec![Ok("done".to_string())]));
        let crew = Crew::new(Vec::new(), vec![Task::new("Do {prompt}", "Done")])
            .with_process(Process::Hierarchical)
            .with_manager(manager(manager_llm.clone()));

        let output = crew.kickoff(&inputs()).await.unwrap();
        assert_eq!(output.raw, "done");
        assert_eq!(manager_llm.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_agent_role_fails() {
        let llm = Arc::new(ScriptedLLM::new(Vec::new()));
        let crew = Crew::new(
            vec![writer(llm)],
            vec![Task::new("Do it", "Done").with_agent("Editor")],
        );
        let err = crew.kickoff(&inputs()).await.unwrap_err();
        assert!(err.contains("Editor"));
    }

    #[test]
    fn test_hierarchical_without_manager_is_invalid() {
        let llm = Arc::new(ScriptedLLM::new(Vec::new()));
        let crew = Crew::new(vec![writer(llm)], vec![Task::new("Do it", "Done")])
            .with_process(Process::Hierarchical);
        assert!(crew.validate().unwrap_err().contains("manager"));
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let llm = Arc::new(ScriptedLLM::new(vec![Err("connection refused".to_string())]));
        let crew = Crew::new(vec![writer(llm)], vec![Task::new("Write {prompt}", "Text")]);
        let err = crew.kickoff(&inputs()).await.unwrap_err();
        assert!(err.contains("connection refused"));
    }
}
