//! # Assistant Commands
//!
//! `assistant list|create|select|delete`.

use anyhow::{Context, Result, anyhow};
use std::io::Write;

use super::{CommandContext, marker};
use crate::domain::types::{AssistantParams, AssistantTool};
use crate::infrastructure::tools::ActionRegistry;
use crate::strings::messages;

pub async fn handle_list(ctx: &CommandContext, out: &mut impl Write) -> Result<()> {
    let assistants = ctx
        .api
        .list_assistants()
        .await
        .context("Failed to list assistants")?;

    if assistants.is_empty() {
        writeln!(out, "{}", messages::NO_ASSISTANTS)?;
        return Ok(());
    }

    writeln!(out, "  {:<24} {:<32} {:<20} INSTRUCTIONS", "NAME", "ID", "MODEL")?;
    for assistant in &assistants {
        let selected = ctx.config.selected.assistant_id.as_deref() == Some(assistant.id.as_str());
        writeln!(
            out,
            "{} {:<24} {:<32} {:<20} {}",
            marker(selected),
            assistant.name.as_deref().unwrap_or(""),
            assistant.id,
            assistant.model,
            assistant.instructions_summary(),
        )?;
    }
    Ok(())
}

pub struct CreateOptions {
    pub model: String,
    pub name: String,
    pub instructions: String,
    pub code_interpreter: bool,
    pub file_search: bool,
    pub select: bool,
}

pub async fn handle_create(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    options: CreateOptions,
) -> Result<()> {
    let mut tools = Vec::new();
    if options.code_interpreter {
        tools.push(AssistantTool::CodeInterpreter);
    }
    if options.file_search {
        tools.push(AssistantTool::FileSearch);
    }
    tools.extend(
        ActionRegistry::with_defaults()
            .definitions()
            .into_iter()
            .map(|function| AssistantTool::Function { function }),
    );

    let params = AssistantParams {
        model: options.model,
        name: options.name,
        instructions: options.instructions,
        tools,
    };
    let assistant = ctx
        .api
        .create_assistant(&params)
        .await
        .context("Failed to create assistant")?;

    writeln!(
        out,
        "{}",
        messages::created_assistant(assistant.name.as_deref().unwrap_or(""), &assistant.id)
    )?;

    if options.select {
        let id = assistant.id.clone();
        ctx.update(|cfg| {
            cfg.selected.assistant_id = Some(id);
            Ok(())
        })?;
        writeln!(out, "{}", messages::now_selected(&assistant.id))?;
    }
    Ok(())
}

pub async fn handle_select(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    assistant_id: &str,
    by_name: bool,
) -> Result<()> {
    let assistant = if by_name {
        ctx.api
            .list_assistants()
            .await
            .context("Failed to list assistants")?
            .into_iter()
            .find(|a| a.name.as_deref() == Some(assistant_id))
            .ok_or_else(|| anyhow!(messages::unknown_assistant_name(assistant_id)))?
    } else {
        ctx.api
            .retrieve_assistant(assistant_id)
            .await
            .with_context(|| format!("Failed to retrieve assistant {}", assistant_id))?
    };

    let id = assistant.id.clone();
    ctx.update(|cfg| {
        cfg.selected.assistant_id = Some(id);
        Ok(())
    })?;
    writeln!(out, "{}", messages::now_selected(&assistant.id))?;
    Ok(())
}

pub async fn handle_delete(
    ctx: &mut CommandContext,
    out: &mut impl Write,
    assistant_ids: &[String],
) -> Result<()> {
    for id in assistant_ids {
        writeln!(out, "{}", messages::deleting_assistant(id))?;
        ctx.api
            .delete_assistant(id)
            .await
            .with_context(|| format!("Failed to delete assistant {}", id))?;
        ctx.update(|cfg| {
            cfg.forget_assistant(id);
            Ok(())
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_utils::{ScriptedApi, assistant};
    use crate::interface::commands::fixtures::{context, output};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn api() -> Arc<ScriptedApi> {
        Arc::new(ScriptedApi::new(vec![]).with_assistants(vec![
            assistant("asst_1", "coder"),
            assistant("asst_2", "writer"),
        ]))
    }

    #[tokio::test]
    async fn test_list_marks_selected() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(api(), &dir);
        ctx.config.selected.assistant_id = Some("asst_2".to_string());

        let mut buffer = Vec::new();
        handle_list(&ctx, &mut buffer).await.unwrap();
        let text = output(buffer);

        let selected_line = text.lines().find(|l| l.contains("asst_2")).unwrap();
        assert!(selected_line.starts_with('*'));
        let other_line = text.lines().find(|l| l.contains("asst_1")).unwrap();
        assert!(other_line.starts_with(' '));
        assert!(other_line.contains("Be helpful."));
    }

    #[tokio::test]
    async fn test_select_by_name_persists() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(api(), &dir);

        let mut buffer = Vec::new();
        handle_select(&mut ctx, &mut buffer, "writer", true).await.unwrap();

        assert_eq!(output(buffer), "asst_2 is now selected.\n");
        let saved = ctx.store.load().unwrap();
        assert_eq!(saved.selected.assistant_id.as_deref(), Some("asst_2"));
    }

    #[tokio::test]
    async fn test_select_unknown_name_fails() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(api(), &dir);

        let mut buffer = Vec::new();
        let err = handle_select(&mut ctx, &mut buffer, "nobody", true).await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown name: 'nobody'");
        assert!(ctx.config.selected.assistant_id.is_none());
    }

    #[tokio::test]
    async fn test_create_registers_local_tools() {
        let dir = TempDir::new().unwrap();
        let api = api();
        let mut ctx = context(api.clone(), &dir);

        let mut buffer = Vec::new();
        handle_create(
            &mut ctx,
            &mut buffer,
            CreateOptions {
                model: "gpt-4o".to_string(),
                name: "tooling".to_string(),
                instructions: "Use tools.".to_string(),
                code_interpreter: true,
                file_search: false,
                select: true,
            },
        )
        .await
        .unwrap();

        let created = api.assistants().pop().unwrap();
        assert_eq!(created.tools.len(), 5);
        assert_eq!(created.tools[0], AssistantTool::CodeInterpreter);
        let function_names: Vec<String> = created
            .tools
            .iter()
            .filter_map(|t| match t {
                AssistantTool::Function { function } => Some(function.name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(function_names, vec!["read_file", "write_file", "exec_shell", "git_command"]);
        assert_eq!(ctx.store.load().unwrap().selected.assistant_id, Some(created.id));
    }

    #[tokio::test]
    async fn test_delete_clears_selection() {
        let dir = TempDir::new().unwrap();
        let api = api();
        let mut ctx = context(api.clone(), &dir);
        ctx.config.selected.assistant_id = Some("asst_1".to_string());

        let mut buffer = Vec::new();
        handle_delete(&mut ctx, &mut buffer, &["asst_1".to_string()])
            .await
            .unwrap();

        assert_eq!(api.assistants().len(), 1);
        assert!(ctx.store.load().unwrap().selected.assistant_id.is_none());
    }
}
