//! # Main Entry Point
//!
//! Wires the pieces together:
//! - Domain: settings, paths, API types
//! - Infrastructure: OpenAI client, local tool executor
//! - Application: run sessions, persisted selection state
//! - Interface: command line and command handlers

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::application::state::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::paths;
use crate::infrastructure::llm::OpenAiClient;
use crate::interface::cli::{AssistantCommand, Cli, Command, ThreadCommand};
use crate::interface::commands::{CommandContext, assistant, chat, thread};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 1. Logging Setup
    let log_dir = paths::app_dir();
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, paths::LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));

    // Full log to file, only warnings and errors on the terminal.
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter);
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .init();

    // 2. Configuration
    let settings_path = cli.settings.clone().unwrap_or_else(paths::settings_path);
    let settings = AppConfig::load(&settings_path)?;
    tracing::info!("Loaded settings from {}", settings_path.display());

    // 3. Infrastructure
    let api = Arc::new(OpenAiClient::from_config(&settings.api)?);
    let store = ConfigStore::new(cli.state.clone().unwrap_or_else(paths::state_path));
    let mut ctx = CommandContext::new(api, store, settings)?;

    // 4. Dispatch
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = run(&mut ctx, &mut out, cli.command).await;
    out.flush()?;

    Ok(ExitCode::from(report(result)))
}

/// Logs a failed command once (console and session log) and maps the
/// outcome to the process exit status.
fn report(result: Result<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{:#}", e);
            1
        }
    }
}

async fn run(ctx: &mut CommandContext, out: &mut impl Write, command: Command) -> Result<()> {
    match command {
        Command::Chat { message } => {
            let stdin = std::io::stdin();
            chat::handle_chat(ctx, out, &mut stdin.lock(), message).await
        }
        Command::Assistant { action } => match action.unwrap_or(AssistantCommand::List) {
            AssistantCommand::List => assistant::handle_list(ctx, out).await,
            AssistantCommand::Create {
                model,
                name,
                instructions,
                code_interpreter,
                file_search,
                select,
            } => {
                let options = assistant::CreateOptions {
                    model,
                    name,
                    instructions,
                    code_interpreter,
                    file_search,
                    select,
                };
                assistant::handle_create(ctx, out, options).await
            }
            AssistantCommand::Select { assistant_id, name } => {
                assistant::handle_select(ctx, out, &assistant_id, name).await
            }
            AssistantCommand::Delete { assistant_ids } => {
                assistant::handle_delete(ctx, out, &assistant_ids).await
            }
        },
        Command::Thread { action } => match action.unwrap_or(ThreadCommand::List) {
            ThreadCommand::List => thread::handle_list(ctx, out),
            ThreadCommand::Create { label, select } => {
                thread::handle_create(ctx, out, label, select).await
            }
            ThreadCommand::Select { thread_id } => thread::handle_select(ctx, out, &thread_id).await,
            ThreadCommand::Delete { thread_id } => thread::handle_delete(ctx, out, &thread_id).await,
        },
    }
}
