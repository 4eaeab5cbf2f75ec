//! # Tool Actions
//!
//! The closed set of actions a run may request. Each [`ActionKind`] knows its
//! wire name, its JSON schema and how to build a [`ToolAction`] from the raw
//! JSON arguments of a tool call. A [`ToolAction`] then executes itself
//! through the [`ToolExecutor`] and yields a [`ToolOutcome`].

use serde::Deserialize;
use serde_json::{Value, json};

use crate::domain::error::{AssistError, Result};
use crate::domain::paths::sanitize_path;
use crate::domain::traits::EventSink;
use crate::domain::types::FunctionDefinition;
use crate::infrastructure::tools::executor::ToolExecutor;
use crate::strings::logs;

/// Kinds of local action, one per tool name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    ReadFile,
    WriteFile,
    ShellExec,
    GitCommand,
}

impl ActionKind {
    /// Default tool set, in the order it is offered to the assistant.
    pub const ALL: [ActionKind; 4] = [
        ActionKind::ReadFile,
        ActionKind::WriteFile,
        ActionKind::ShellExec,
        ActionKind::GitCommand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::ReadFile => "read_file",
            ActionKind::WriteFile => "write_file",
            ActionKind::ShellExec => "exec_shell",
            ActionKind::GitCommand => "git_command",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ActionKind::ReadFile => {
                "Read content from a file within a local directory. If the path is a directory \
                 a list of files will be returned (sub-directories will have a trailing slash)."
            }
            ActionKind::WriteFile => "Write contents to a file within a local directory.",
            ActionKind::ShellExec => "Execute a single shell command using: sh -c '{command}'",
            ActionKind::GitCommand => "Execute a Git command within a repository.",
        }
    }

    pub fn parameters(&self) -> Value {
        match self {
            ActionKind::ReadFile => json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Relative path of a file or directory"}
                },
                "required": ["path"]
            }),
            ActionKind::WriteFile => json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string", "description": "Relative path of the file"},
                    "content": {"type": "string", "description": "Full file content"}
                },
                "required": ["path", "content"]
            }),
            ActionKind::ShellExec => json!({
                "type": "object",
                "properties": {
                    "command": {"type": "string"},
                    "input": {"type": "string", "description": "Optional text piped to stdin"}
                },
                "required": ["command"]
            }),
            ActionKind::GitCommand => json!({
                "type": "object",
                "properties": {
                    "command": {"type": "string", "description": "Git subcommand, e.g. status"},
                    "args": {"type": "array", "items": {"type": "string"}},
                    "repo_dir": {"type": "string"}
                },
                "required": ["command", "repo_dir"]
            }),
        }
    }

    pub fn definition(&self) -> FunctionDefinition {
        FunctionDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }

    /// Parses tool call arguments into an action of this kind.
    pub fn build(&self, arguments: &str) -> Result<ToolAction> {
        let action = match self {
            ActionKind::ReadFile => {
                let args: ReadFileArgs = self.parse(arguments)?;
                ToolAction::ReadFile {
                    path: sanitize_path(&args.path),
                }
            }
            ActionKind::WriteFile => {
                let args: WriteFileArgs = self.parse(arguments)?;
                ToolAction::WriteFile {
                    path: sanitize_path(&args.path),
                    content: args.content,
                }
            }
            ActionKind::ShellExec => {
                let args: ShellExecArgs = self.parse(arguments)?;
                ToolAction::ShellExec {
                    command: args.command,
                    stdin: args.input,
                }
            }
            ActionKind::GitCommand => {
                let args: GitCommandArgs = self.parse(arguments)?;
                ToolAction::GitCommand {
                    command: args.command,
                    args: args.args,
                    repo_dir: args.repo_dir,
                }
            }
        };
        Ok(action)
    }

    fn parse<T: for<'de> Deserialize<'de>>(&self, arguments: &str) -> Result<T> {
        serde_json::from_str(arguments).map_err(|e| AssistError::InvalidArguments {
            name: self.name().to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Deserialize)]
struct ReadFileArgs {
    path: String,
}

#[derive(Deserialize)]
struct WriteFileArgs {
    path: String,
    content: String,
}

#[derive(Deserialize)]
struct ShellExecArgs {
    command: String,
    #[serde(default, alias = "stdin")]
    input: Option<String>,
}

#[derive(Deserialize)]
struct GitCommandArgs {
    command: String,
    #[serde(default)]
    args: Vec<String>,
    repo_dir: String,
}

/// A concrete request built from one tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    ShellExec {
        command: String,
        stdin: Option<String>,
    },
    WriteFile {
        path: String,
        content: String,
    },
    ReadFile {
        path: String,
    },
    GitCommand {
        command: String,
        args: Vec<String>,
        repo_dir: String,
    },
}

/// Result of executing an action. `payload` is a JSON string for text
/// results or a JSON object for structured ones.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutcome {
    pub success: bool,
    pub payload: Value,
}

impl ToolOutcome {
    pub fn text(success: bool, text: impl Into<String>) -> Self {
        Self {
            success,
            payload: Value::String(text.into()),
        }
    }

    pub fn structured(payload: Value) -> Self {
        let success = payload
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(true);
        Self { success, payload }
    }

    /// The string submitted back to the run.
    pub fn to_output(&self) -> String {
        match &self.payload {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

impl ToolAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            ToolAction::ShellExec { .. } => ActionKind::ShellExec,
            ToolAction::WriteFile { .. } => ActionKind::WriteFile,
            ToolAction::ReadFile { .. } => ActionKind::ReadFile,
            ToolAction::GitCommand { .. } => ActionKind::GitCommand,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub async fn execute(
        &self,
        executor: &ToolExecutor,
        sink: &mut dyn EventSink,
    ) -> Result<ToolOutcome> {
        match self {
            ToolAction::ShellExec { command, stdin } => {
                sink.log(logs::executing(command));
                let output = executor.execute_command(command, stdin.as_deref()).await?;
                Ok(ToolOutcome::text(output.success(), output.combined()))
            }
            ToolAction::WriteFile { path, content } => {
                sink.log(logs::writing_file(path));
                match executor.write_file(path, content).await {
                    Ok(()) => Ok(ToolOutcome::structured(json!({"success": true}))),
                    Err(e) => {
                        tracing::warn!("Write failed for '{}': {}", path, e);
                        sink.log(logs::write_failed(path));
                        Ok(ToolOutcome::structured(json!({
                            "success": false,
                            "error": "Unable to write file"
                        })))
                    }
                }
            }
            ToolAction::ReadFile { path } => Ok(read_file(executor, path, sink).await),
            ToolAction::GitCommand {
                command,
                args,
                repo_dir,
            } => {
                let mut argv = vec!["git", "-C", repo_dir.as_str(), command.as_str()];
                argv.extend(args.iter().map(String::as_str));
                sink.log(logs::executing_git(&argv.join(" ")));

                let output = executor.run_git(repo_dir, command, args).await?;
                if output.success() {
                    Ok(ToolOutcome::structured(
                        json!({"success": true, "output": output.stdout}),
                    ))
                } else {
                    Ok(ToolOutcome::structured(
                        json!({"success": false, "error": output.stderr}),
                    ))
                }
            }
        }
    }
}

async fn read_file(executor: &ToolExecutor, path: &str, sink: &mut dyn EventSink) -> ToolOutcome {
    let result = if executor.is_dir(path).await {
        executor.list_dir(path).await.map(|listing| {
            sink.log(logs::listing_dir(path, &listing));
            json!({
                "success": true,
                "path": path,
                "file-type": "directory",
                "content": listing,
            })
        })
    } else {
        sink.log(logs::reading_file(path));
        executor.read_file(path).await.map(|content| {
            json!({
                "success": true,
                "path": path,
                "file-type": "file",
                "content": content,
            })
        })
    };

    match result {
        Ok(payload) => ToolOutcome::structured(payload),
        Err(e) => {
            tracing::warn!("Read failed for '{}': {}", path, e);
            sink.log(logs::read_failed(path));
            ToolOutcome::structured(json!({
                "success": false,
                "error": "Unable to access file"
            }))
        }
    }
}
