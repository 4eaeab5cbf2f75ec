//! # Chat Command
//!
//! Interactive loop: read a line, send it on the selected thread, poll the
//! run (dispatching tool calls) and print the assistant's reply.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;

use super::CommandContext;
use crate::application::session::RunSession;
use crate::domain::types::{Thread, ThreadMessage};
use crate::infrastructure::tools::{ActionRegistry, ToolExecutor};
use crate::strings::messages;

/// Per-chat resources shared by every message of the conversation.
struct Conversation {
    assistant_id: String,
    thread_id: String,
    registry: Arc<ActionRegistry>,
    executor: Arc<ToolExecutor>,
}

pub async fn handle_chat(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    input: &mut impl BufRead,
    message: Option<String>,
) -> Result<()> {
    let assistant_id = ctx.selected_assistant()?;
    let assistant = ctx
        .api
        .retrieve_assistant(&assistant_id)
        .await
        .with_context(|| format!("Failed to retrieve assistant {}", assistant_id))?;

    let thread = open_thread(ctx).await?;
    writeln!(out, "{}", messages::using_thread(&thread.id))?;

    let conversation = Conversation {
        assistant_id: assistant.id,
        thread_id: thread.id,
        registry: Arc::new(ActionRegistry::with_defaults()),
        executor: Arc::new(ToolExecutor::from_config(&ctx.settings.tools)),
    };
    tracing::info!(
        "Chatting with '{}' on thread '{}', local tools: {}",
        conversation.assistant_id,
        conversation.thread_id,
        conversation.registry.names().collect::<Vec<_>>().join(", ")
    );

    if let Some(message) = message {
        writeln!(out, "{}{}", messages::CHAT_PROMPT, message)?;
        send_message(ctx, &conversation, out, &message).await?;
    }

    loop {
        write!(out, "{}", messages::CHAT_PROMPT)?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        send_message(ctx, &conversation, out, line).await?;
    }
    Ok(())
}

/// The selected thread, or a fresh one that becomes the selection.
async fn open_thread(ctx: &mut CommandContext) -> Result<Thread> {
    if let Some(thread_id) = ctx.config.selected.thread_id.clone() {
        return ctx
            .api
            .retrieve_thread(&thread_id)
            .await
            .with_context(|| format!("Failed to retrieve thread {}", thread_id));
    }

    let thread = ctx
        .api
        .create_thread()
        .await
        .context("Failed to create thread")?;
    ctx.update(|cfg| {
        cfg.select_thread(&thread);
        Ok(())
    })?;
    Ok(thread)
}

async fn send_message(
    ctx: &mut CommandContext,
    conversation: &Conversation,
    out: &mut impl Write,
    message: &str,
) -> Result<()> {
    let mut session = RunSession::send(
        ctx.api.clone(),
        conversation.registry.clone(),
        conversation.executor.clone(),
        &conversation.assistant_id,
        &conversation.thread_id,
        message,
    )
    .await
    .context("Failed to send message")?;

    let run_id = session.run_id().to_string();
    ctx.update(|cfg| {
        cfg.selected.run_id = Some(run_id);
        Ok(())
    })?;

    writeln!(out, "{}", messages::WORKING)?;
    let interval = ctx.settings.chat.poll_interval();
    let response = session
        .wait(interval, |line| {
            let timestamp = chrono::Local::now().format("%H:%M:%S");
            let _ = writeln!(out, "[{}] {}", timestamp, line);
        })
        .await
        .with_context(|| format!("Run {} failed", session.run_id()))?;
    tracing::info!("Run '{}' finished: {:?}", session.run_id(), session.state());

    match response {
        Some(reply) => show_assistant_message(out, &reply)?,
        None => writeln!(out, "{}", messages::NO_RESPONSE)?,
    }
    Ok(())
}

fn show_assistant_message(out: &mut impl Write, message: &ThreadMessage) -> Result<()> {
    writeln!(out, "{}", messages::assistant_header(message.assistant_id.as_deref()))?;
    for text in message.texts() {
        writeln!(out, "{}", text)?;
    }
    writeln!(out)?;
    Ok(())
}
