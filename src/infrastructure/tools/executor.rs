//! # Tool Executor
//!
//! Runs shell commands, git and filesystem operations on behalf of tool
//! calls. Every relative path is resolved against the configured working
//! directory; callers are expected to have sanitized the path already.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::domain::config::ToolsConfig;
use crate::domain::error::Result;

/// Configuration for the ToolExecutor
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Base directory for relative paths and the cwd of spawned processes.
    pub workdir: PathBuf,
    /// Kill shell commands that run longer than this.
    pub shell_timeout: Option<Duration>,
}

/// Captured result of a spawned process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when killed by a signal or timed out.
    pub code: Option<i32>,
    pub timed_out: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// stdout followed by stderr, with the exit code appended on failure.
    pub fn combined(&self) -> String {
        let mut result = String::new();
        result.push_str(&self.stdout);
        result.push_str(&self.stderr);

        if self.timed_out {
            if !result.is_empty() && !result.ends_with('\n') {
                result.push('\n');
            }
            result.push_str("[Timed out]");
        } else if !self.success() {
            if !result.is_empty() && !result.ends_with('\n') {
                result.push('\n');
            }
            match self.code {
                Some(code) => result.push_str(&format!("[Exit Code: {}]", code)),
                None => result.push_str("[Terminated by signal]"),
            }
        }
        result
    }
}

/// Writes `input` to a child's stdin and closes it.
async fn feed_stdin(mut pipe: tokio::process::ChildStdin, input: String) -> std::io::Result<()> {
    match pipe.write_all(input.as_bytes()).await {
        // A command that exits without reading stdin closes the pipe early.
        Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
        _ => Ok(()),
    }
}

/// Background reader that accumulates one output pipe of a child process.
/// The buffer stays readable if the reader is aborted part way.
struct PipeCollector {
    buffer: Arc<Mutex<Vec<u8>>>,
    task: Option<JoinHandle<()>>,
}

impl PipeCollector {
    fn spawn<R>(pipe: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        let task = pipe.map(|mut pipe| {
            let buffer = buffer.clone();
            tokio::spawn(async move {
                let mut chunk = [0u8; 8192];
                loop {
                    match pipe.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            buffer
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner())
                                .extend_from_slice(&chunk[..n]);
                        }
                    }
                }
            })
        });
        Self { buffer, task }
    }

    /// Waits for the pipe to close and returns everything read.
    async fn finish(mut self) -> String {
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        self.contents()
    }

    /// Stops reading and returns what has been read so far.
    fn abort(mut self) -> String {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.contents()
    }

    fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

/// Executes tools (shell, git, fs) relative to a working directory.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    config: ToolConfig,
}

impl ToolExecutor {
    pub fn new(workdir: impl Into<PathBuf>, shell_timeout: Option<Duration>) -> Self {
        Self {
            config: ToolConfig {
                workdir: workdir.into(),
                shell_timeout,
            },
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(
            config.workdir.clone(),
            config.shell_timeout.map(Duration::from_secs),
        )
    }

    /// Joins a sanitized relative path onto the working directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.config.workdir.join(path)
    }

    /// Execute a shell command in the working directory, optionally feeding stdin.
    pub async fn execute_command(&self, command: &str, stdin: Option<&str>) -> Result<CommandOutput> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = tokio::process::Command::new("cmd");
            c.args(["/C", command]);
            c
        } else {
            let mut c = tokio::process::Command::new("sh");
            c.args(["-c", command]);
            c
        };

        cmd.current_dir(&self.config.workdir);
        cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() });
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        let mut child = cmd.spawn()?;

        // stdin is fed while stdout and stderr are drained.
        let stdout = PipeCollector::spawn(child.stdout.take());
        let stderr = PipeCollector::spawn(child.stderr.take());
        let feeder = stdin.zip(child.stdin.take()).map(|(input, pipe)| {
            let input = input.to_owned();
            tokio::spawn(feed_stdin(pipe, input))
        });

        let status = match self.config.shell_timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    tracing::warn!("Command timed out after {:?}: {}", limit, command);
                    if let Err(e) = child.kill().await {
                        tracing::debug!("Failed to kill timed out command: {}", e);
                    }
                    if let Some(feeder) = feeder {
                        feeder.abort();
                    }
                    return Ok(CommandOutput {
                        stdout: stdout.abort(),
                        stderr: stderr.abort(),
                        code: None,
                        timed_out: true,
                    });
                }
            },
            None => child.wait().await?,
        };

        if let Some(feeder) = feeder {
            if let Ok(Err(e)) = feeder.await {
                return Err(e.into());
            }
        }

        Ok(CommandOutput {
            stdout: stdout.finish().await,
            stderr: stderr.finish().await,
            code: status.code(),
            timed_out: false,
        })
    }

    /// Runs `git -C <repo_dir> <command> <args...>` from the working directory.
    pub async fn run_git(&self, repo_dir: &str, command: &str, args: &[String]) -> Result<CommandOutput> {
        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(repo_dir)
            .arg(command)
            .args(args)
            .current_dir(&self.config.workdir)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
            timed_out: false,
        })
    }

    pub async fn is_dir(&self, path: &str) -> bool {
        tokio::fs::metadata(self.resolve(path))
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false)
    }

    pub async fn read_file(&self, path: &str) -> std::io::Result<String> {
        tokio::fs::read_to_string(self.resolve(path)).await
    }

    pub async fn write_file(&self, path: &str, content: &str) -> std::io::Result<()> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            if !parent.exists() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(target, content).await
    }

    /// Lists a directory; sub-directories get a trailing `/`. Sorted by name.
    pub async fn list_dir(&self, path: &str) -> std::io::Result<Vec<String>> {
        let mut entries = tokio::fs::read_dir(self.resolve(path)).await?;
        let mut listing = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let mut name = entry.file_name().to_string_lossy().to_string();
            if entry.file_type().await?.is_dir() {
                name.push('/');
            }
            listing.push(name);
        }
        listing.sort();
        Ok(listing)
    }
}
