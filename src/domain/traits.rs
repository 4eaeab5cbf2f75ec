//! # Domain Traits
//!
//! Abstract interfaces for the remote assistant service and for progress
//! reporting. Infrastructure provides the HTTP implementation; tests provide
//! scripted ones.

use async_trait::async_trait;

use crate::domain::error::Result;
use crate::domain::types::{
    Assistant, AssistantParams, Run, Thread, ThreadMessage, ToolOutput,
};

/// The subset of the assistant API the client consumes.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    async fn create_assistant(&self, params: &AssistantParams) -> Result<Assistant>;

    async fn retrieve_assistant(&self, assistant_id: &str) -> Result<Assistant>;

    async fn list_assistants(&self) -> Result<Vec<Assistant>>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<()>;

    async fn create_thread(&self) -> Result<Thread>;

    async fn retrieve_thread(&self, thread_id: &str) -> Result<Thread>;

    async fn delete_thread(&self, thread_id: &str) -> Result<()>;

    /// Appends a user message to the thread.
    async fn create_message(&self, thread_id: &str, content: &str) -> Result<ThreadMessage>;

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<Run>;

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<Run>;

    async fn submit_tool_outputs(
        &self,
        thread_id: &str,
        run_id: &str,
        outputs: &[ToolOutput],
    ) -> Result<Run>;

    /// Lists thread messages, newest first.
    async fn list_messages(&self, thread_id: &str, limit: u32) -> Result<Vec<ThreadMessage>>;
}

/// Receives human-readable progress lines from actions and the run loop.
pub trait EventSink: Send {
    fn log(&mut self, message: String);
}
