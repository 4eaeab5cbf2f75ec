//! # Thread Commands
//!
//! `thread list|create|select|delete`. Threads cannot be listed remotely, so
//! `list` shows the threads cached in the state file.

use anyhow::{Context, Result};
use std::io::Write;

use super::{CommandContext, marker};
use crate::strings::messages;

pub async fn handle_create(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    label: Option<String>,
    select: bool,
) -> Result<()> {
    ctx.selected_assistant()?;
    let thread = ctx
        .api
        .create_thread()
        .await
        .context("Failed to create thread")?;

    ctx.update(|cfg| {
        if select {
            cfg.selected.thread_id = Some(thread.id.clone());
        }
        if let Some(label) = label {
            cfg.labels.thread.insert(thread.id.clone(), label);
        }
        cfg.cache.thread.insert(thread.id.clone(), thread.clone());
        Ok(())
    })?;

    writeln!(out, "{}", messages::thread_created(&thread.id, select))?;
    Ok(())
}

pub fn handle_list(ctx: &CommandContext, out: &mut impl Write) -> Result<()> {
    ctx.selected_assistant()?;
    let mut threads: Vec<_> = ctx.config.cache.thread.values().collect();
    if threads.is_empty() {
        writeln!(out, "{}", messages::NO_THREADS)?;
        return Ok(());
    }
    threads.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    writeln!(out, "  {:<20} {:<32} CREATED", "LABEL", "ID")?;
    for thread in threads {
        let selected = ctx.config.selected.thread_id.as_deref() == Some(thread.id.as_str());
        let created = chrono::DateTime::from_timestamp(thread.created_at, 0)
            .map(|ts| ts.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{} {:<20} {:<32} {}",
            marker(selected),
            ctx.config.labels.thread.get(&thread.id).map(String::as_str).unwrap_or(""),
            thread.id,
            created,
        )?;
    }
    Ok(())
}

pub async fn handle_select(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    thread_id: &str,
) -> Result<()> {
    ctx.selected_assistant()?;
    let thread = ctx
        .api
        .retrieve_thread(thread_id)
        .await
        .with_context(|| format!("Failed to retrieve thread {}", thread_id))?;

    ctx.update(|cfg| {
        cfg.select_thread(&thread);
        Ok(())
    })?;
    writeln!(out, "{}", messages::now_selected(&thread.id))?;
    Ok(())
}

pub async fn handle_delete(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    thread_id: &str,
) -> Result<()> {
    ctx.selected_assistant()?;
    ctx.api
        .delete_thread(thread_id)
        .await
        .with_context(|| format!("Failed to delete thread {}", thread_id))?;

    ctx.update(|cfg| {
        cfg.forget_thread(thread_id);
        Ok(())
    })?;
    writeln!(out, "{}", messages::thread_deleted(thread_id))?;
    Ok(())
}
