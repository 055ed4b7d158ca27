//! Core Agent struct.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::llms::base_llm::{BaseLLM, LLMMessage};

/// Represents an agent in a crew.
///
/// Each agent has a role, a goal, a backstory and the language model that
/// runs it. The LLM handle is shared; agents never own mutable state.
#[derive(Clone)]
pub struct Agent {
    /// Unique identifier for the agent.
    pub id: Uuid,
    /// Role of the agent.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Backstory of the agent.
    pub backstory: String,
    /// Log task outputs at info level.
    pub verbose: bool,
    /// Language model that will run the agent.
    pub llm: Option<Arc<dyn BaseLLM>>,
}

impl Agent {
    /// Create a new agent with the given role, goal and backstory.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            llm: None,
        }
    }

    /// Attach the LLM that runs this agent.
    pub fn with_llm(mut self, llm: Arc<dyn BaseLLM>) -> Self {
        self.llm = Some(llm);
        self
    }

    /// Role-playing system prompt.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    /// Build the user prompt for a task, appending context from earlier work.
    pub fn task_prompt(task_description: &str, context: Option<&str>) -> String {
        match context {
            Some(ctx) if !ctx.trim().is_empty() => format!(
                "{}\n\nThis is the context you're working with:\n{}",
                task_description, ctx
            ),
            _ => task_description.to_string(),
        }
    }

    /// Execute a task with a single LLM call and return the raw answer.
    pub async fn execute_task(
        &self,
        task_description: &str,
        context: Option<&str>,
    ) -> Result<String, String> {
        log::debug!("Agent '{}' executing task: {}", self.role, task_description);

        let llm = self
            .llm
            .as_ref()
            .ok_or_else(|| format!("Agent '{}' has no LLM configured", self.role))?;

        let messages = vec![
            LLMMessage::system(self.system_prompt()),
            LLMMessage::user(Self::task_prompt(task_description, context)),
        ];

        let output = llm
            .acall(messages)
            .await
            .map_err(|e| format!("Agent '{}' execution failed: {}", self.role, e))?;

        if self.verbose {
            log::info!("Agent '{}' final answer:\n{}", self.role, output);
        }

        Ok(output)
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("llm", &self.llm.as_ref().map(|llm| llm.model().to_string()))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::llms::base_llm::LLMError;

    /// LLM double that replays canned replies and records every conversation.
    #[derive(Debug, Default)]
    pub(crate) struct ScriptedLLM {
        pub replies: Mutex<Vec<Result<String, String>>>,
        pub calls: Mutex<Vec<Vec<LLMMessage>>>,
    }

    impl ScriptedLLM {
        pub(crate) fn new(replies: Vec<Result<String, String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn calls(&self) -> Vec<Vec<LLMMessage>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BaseLLM for ScriptedLLM {
        fn model(&self) -> &str {
            "scripted"
        }

        fn temperature(&self) -> Option<f64> {
            None
        }

        async fn acall(&self, messages: Vec<LLMMessage>) -> Result<String, LLMError> {
            self.calls.lock().unwrap().push(messages);
            match self.replies.lock().unwrap().pop() {
                Some(Ok(reply)) => Ok(reply),
                Some(Err(e)) => Err(e.into()),
                None => Err("no scripted reply left".into()),
            }
        }
    }

    fn writer() -> Agent {
        Agent::new(
            "Product Description Writer",
            "Generate complete product descriptions",
            "A skilled writer.",
        )
    }

    #[test]
    fn test_system_prompt() {
        let prompt = writer().system_prompt();
        assert!(prompt.starts_with("You are Product Description Writer. A skilled writer."));
        assert!(prompt.ends_with("Your personal goal is: Generate complete product descriptions"));
    }

    #[test]
    fn test_task_prompt_with_and_without_context() {
        assert_eq!(Agent::task_prompt("Do it", None), "Do it");
        assert_eq!(Agent::task_prompt("Do it", Some("  ")), "Do it");
        assert!(Agent::task_prompt("Do it", Some("draft")).ends_with("working with:\ndraft"));
    }

    #[tokio::test]
    async fn test_execute_task_sends_system_and_user_messages() {
        let llm = Arc::new(ScriptedLLM::new(vec![Ok("answer".to_string())]));
        let agent = writer().with_llm(llm.clone());

        let output = agent.execute_task("Write a title", None).await.unwrap();
        assert_eq!(output, "answer");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, "system");
        assert_eq!(calls[0][1], LLMMessage::user("Write a title"));
    }

    #[tokio::test]
    async fn test_execute_task_without_llm_fails() {
        let err = writer().execute_task("Write", None).await.unwrap_err();
        assert!(err.contains("no LLM configured"));
    }

    #[tokio::test]
    async fn test_execute_task_propagates_llm_error() {
        let llm = Arc::new(ScriptedLLM::new(vec![Err("upstream 503".to_string())]));
        let err = writer().with_llm(llm).execute_task("Write", None).await.unwrap_err();
        assert!(err.contains("upstream 503"));
    }
}
