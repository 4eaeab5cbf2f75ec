//! # Run Session
//!
//! Drives one exchange with the assistant: post a user message, start a run
//! and poll it until it completes. Whenever the run stops in
//! `requires_action`, the requested tool calls are resolved through the
//! [`ActionRegistry`], executed one after another in server order, and their
//! outputs are submitted back in a single batch.
//!
//! ```text
//! Queued -> InProgress -> RequiresAction <-> InProgress -> Completed
//!                      \-> Error (any status we do not handle)
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::application::logging::LogQueue;
use crate::domain::error::{AssistError, Result};
use crate::domain::traits::{AssistantApi, EventSink};
use crate::domain::types::{Run, RunStatus, ThreadMessage, ToolOutput};
use crate::infrastructure::tools::{ActionRegistry, ToolExecutor};
use crate::strings::logs;

/// Where the session believes the remote run is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    /// Terminal: the run reported a status we cannot drive.
    Error(String),
}

impl SessionState {
    fn from_status(status: &RunStatus) -> Self {
        match status {
            RunStatus::Queued => SessionState::Queued,
            RunStatus::InProgress => SessionState::InProgress,
            RunStatus::RequiresAction => SessionState::RequiresAction,
            RunStatus::Completed => SessionState::Completed,
            RunStatus::Unknown(other) => SessionState::Error(other.clone()),
        }
    }
}

/// Handle on an in-flight run.
pub struct RunSession {
    api: Arc<dyn AssistantApi>,
    registry: Arc<ActionRegistry>,
    executor: Arc<ToolExecutor>,
    thread_id: String,
    run_id: String,
    state: SessionState,
    log: LogQueue,
}

impl RunSession {
    /// Posts `message` to the thread and starts a run of the assistant on it.
    pub async fn send(
        api: Arc<dyn AssistantApi>,
        registry: Arc<ActionRegistry>,
        executor: Arc<ToolExecutor>,
        assistant_id: &str,
        thread_id: &str,
        message: &str,
    ) -> Result<Self> {
        api.create_message(thread_id, message).await?;
        let run = api.create_run(thread_id, assistant_id).await?;

        // Whatever the creation response says, the first poll decides.
        Ok(Self {
            api,
            registry,
            executor,
            thread_id: thread_id.to_string(),
            run_id: run.id,
            state: SessionState::Queued,
            log: LogQueue::new(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Checks the run once. Returns `true` when it has completed.
    ///
    /// A run in `requires_action` has its tool calls dispatched before this
    /// returns. Once the session is terminal no further requests are made.
    pub async fn poll(&mut self) -> Result<bool> {
        match &self.state {
            SessionState::Completed => return Ok(true),
            SessionState::Error(status) => {
                return Err(AssistError::UnhandledRunStatus(status.clone()));
            }
            _ => {}
        }

        let run = self.api.retrieve_run(&self.thread_id, &self.run_id).await?;
        self.state = SessionState::from_status(&run.status);
        tracing::debug!("Run '{}' status: {}", self.run_id, run.status);

        match &run.status {
            RunStatus::Completed => Ok(true),
            RunStatus::RequiresAction => {
                self.run_required_action(&run).await?;
                Ok(false)
            }
            RunStatus::Queued | RunStatus::InProgress => Ok(false),
            RunStatus::Unknown(status) => {
                tracing::error!("Run '{}' reported unhandled status '{}'", self.run_id, status);
                Err(AssistError::UnhandledRunStatus(status.clone()))
            }
        }
    }

    async fn run_required_action(&mut self, run: &Run) -> Result<()> {
        if run.tool_calls().is_empty() {
            tracing::warn!("Run '{}' requires action but lists no tool calls", run.id);
            return Ok(());
        }

        let mut outputs = Vec::with_capacity(run.tool_calls().len());

        for call in run.tool_calls() {
            self.log
                .log(logs::should_run(&call.function.name, &call.function.arguments));

            let action = self
                .registry
                .resolve(&call.function.name)?
                .build(&call.function.arguments)?;
            tracing::debug!("Dispatching call '{}' to {}", call.id, action.name());
            let outcome = action.execute(&self.executor, &mut self.log).await?;
            if !outcome.success {
                tracing::info!("Call '{}' ({}) reported failure", call.id, action.name());
            }

            outputs.push(ToolOutput {
                tool_call_id: call.id.clone(),
                output: outcome.to_output(),
            });
        }

        self.api
            .submit_tool_outputs(&self.thread_id, &run.id, &outputs)
            .await?;
        self.state = SessionState::InProgress;
        Ok(())
    }

    /// Returns and clears the progress lines queued since the last drain.
    pub fn drain_log(&mut self) -> Vec<String> {
        self.log.drain()
    }

    /// Newest message on the thread.
    pub async fn get_latest_response(&self) -> Result<Option<ThreadMessage>> {
        let mut messages = self.api.list_messages(&self.thread_id, 1).await?;
        Ok(if messages.is_empty() {
            None
        } else {
            Some(messages.swap_remove(0))
        })
    }

    /// Polls until completion, sleeping `interval` between polls and handing
    /// every drained progress line to `on_progress`.
    pub async fn wait(
        &mut self,
        interval: Duration,
        mut on_progress: impl FnMut(String),
    ) -> Result<Option<ThreadMessage>> {
        loop {
            let done = self.poll().await;
            for line in self.drain_log() {
                on_progress(line);
            }
            if done? {
                break;
            }
            tokio::time::sleep(interval).await;
        }
        self.get_latest_response().await
    }
}
