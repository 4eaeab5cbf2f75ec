use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::error::{AssistError, Result};
use crate::domain::traits::AssistantApi;
use crate::domain::types::{
    Assistant, AssistantParams, FunctionCall, MessageContent, RequiredAction, Run, RunStatus,
    SubmitToolOutputs, TextContent, Thread, ThreadMessage, ToolCall, ToolOutput,
};

// ===================
// Scripted Assistant API
// ===================

/// In-memory [`AssistantApi`] that replays a scripted sequence of runs and
/// records every call it receives.
#[derive(Default)]
pub struct ScriptedApi {
    runs: Mutex<VecDeque<Run>>,
    calls: Mutex<Vec<String>>,
    submissions: Mutex<Vec<Vec<ToolOutput>>>,
    messages: Mutex<Vec<ThreadMessage>>,
    assistants: Mutex<Vec<Assistant>>,
    threads: Mutex<Vec<Thread>>,
}

impl ScriptedApi {
    pub fn new(runs: Vec<Run>) -> Self {
        Self {
            runs: Mutex::new(runs.into()),
            ..Default::default()
        }
    }

    pub fn with_assistants(self, assistants: Vec<Assistant>) -> Self {
        *self.assistants.lock().unwrap() = assistants;
        self
    }

    pub fn with_reply(self, text: &str) -> Self {
        self.messages.lock().unwrap().push(assistant_message("msg_reply", text));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submissions(&self) -> Vec<Vec<ToolOutput>> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn assistants(&self) -> Vec<Assistant> {
        self.assistants.lock().unwrap().clone()
    }

    pub fn threads(&self) -> Vec<Thread> {
        self.threads.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn not_found(what: &str, id: &str) -> AssistError {
        AssistError::Api {
            status: 404,
            message: format!("No {} found with id '{}'.", what, id),
        }
    }
}

pub fn run(status: &str) -> Run {
    Run {
        id: "run_1".to_string(),
        thread_id: "thread_1".to_string(),
        status: RunStatus::from(status.to_string()),
        required_action: None,
    }
}

/// A `requires_action` run asking for the given `(call_id, name, arguments)` calls.
pub fn requires_action(calls: Vec<(&str, &str, serde_json::Value)>) -> Run {
    let tool_calls = calls
        .into_iter()
        .map(|(id, name, arguments)| ToolCall {
            id: id.to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        })
        .collect();

    Run {
        required_action: Some(RequiredAction {
            submit_tool_outputs: SubmitToolOutputs { tool_calls },
        }),
        ..run("requires_action")
    }
}

pub fn assistant(id: &str, name: &str) -> Assistant {
    Assistant {
        id: id.to_string(),
        name: Some(name.to_string()),
        model: "gpt-4o".to_string(),
        instructions: Some("Be helpful.".to_string()),
        tools: Vec::new(),
    }
}

pub fn assistant_message(id: &str, text: &str) -> ThreadMessage {
    ThreadMessage {
        id: id.to_string(),
        role: "assistant".to_string(),
        assistant_id: Some("asst_1".to_string()),
        content: vec![MessageContent::Text {
            text: TextContent {
                value: text.to_string(),
            },
        }],
    }
}

#[async_trait]
impl AssistantApi for ScriptedApi {
    async fn create_assistant(&self, params: &AssistantParams) -> Result<Assistant> {
        self.record("create_assistant");
        let mut assistants = self.assistants.lock().unwrap();
        let created = Assistant {
            id: format!("asst_{}", assistants.len() + 1),
            name: Some(params.name.clone()),
            model: params.model.clone(),
            instructions: Some(params.instructions.clone()),
            tools: params.tools.clone(),
        };
        assistants.push(created.clone());
        Ok(created)
    }

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant> {
        self.record("retrieve_assistant");
        self.assistants
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == assistant_id)
            .cloned()
            .ok_or_else(|| Self::not_found("assistant", assistant_id))
    }

    async fn list_assistants(&self) -> Result<Vec<Assistant>> {
        self.record("list_assistants");
        Ok(self.assistants())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()> {
        self.record("delete_assistant");
        self.assistants.lock().unwrap().retain(|a| a.id != assistant_id);
        Ok(())
    }

    async fn create_thread(&self) -> Result<Thread> {
        self.record("create_thread");
        let mut threads = self.threads.lock().unwrap();
        let thread = Thread {
            id: format!("thread_{}", threads.len() + 1),
            created_at: 1_700_000_000,
            metadata: Some(json!({})),
        };
        threads.push(thread.clone());
        Ok(thread)
    }

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread> {
        self.record("retrieve_thread");
        self.threads
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == thread_id)
            .cloned()
            .ok_or_else(|| Self::not_found("thread", thread_id))
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.record("delete_thread");
        self.threads.lock().unwrap().retain(|t| t.id != thread_id);
        Ok(())
    }

    async fn create_message(&self, _thread_id: &str, content: &str) -> Result<ThreadMessage> {
        self.record("create_message");
        let message = ThreadMessage {
            role: "user".to_string(),
            assistant_id: None,
            ..assistant_message("msg_user", content)
        };
        Ok(message)
    }

    async fn create_run(&self, thread_id: &str, _assistant_id: &str) -> Result<Run> {
        self.record("create_run");
        Ok(Run {
            thread_id: thread_id.to_string(),
            ..run("queued")
        })
    }

    async fn retrieve_run(&self, _thread_id: &str, _run_id: &str) -> Result<Run> {
        self.record("retrieve_run");
        self.runs.lock().unwrap().pop_front().ok_or(AssistError::Api {
            status: 500,
            message: "run script exhausted".to_string(),
        })
    }

    async fn submit_tool_outputs(
        &self,
        _thread_id: &str,
        _run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run> {
        self.record("submit_tool_outputs");
        self.submissions.lock().unwrap().push(outputs.to_vec());
        Ok(run("queued"))
    }

    async fn list_messages(&self, _thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>> {
        self.record("list_messages");
        let messages = self.messages.lock().unwrap();
        Ok(messages.iter().rev().take(limit as usize).cloned().collect())
    }
}
