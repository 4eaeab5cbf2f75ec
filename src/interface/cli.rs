//! # Command Line
//!
//! Argument definitions. Subcommands can be abbreviated to any unique prefix
//! (`a l` is `assistant list`) and the groups accept their plural form.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "oa-assist",
    version,
    about = "Chat with hosted assistants that can run local tools",
    infer_subcommands = true
)]
pub struct Cli {
    /// Settings file (defaults to ~/.config/oa-assist/settings.yaml)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    /// Selection state file (defaults to ~/.config/oa-assist/config.json)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Chat with the selected assistant on the selected thread
    Chat {
        /// First message to send before prompting
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Manage assistants (lists them when no subcommand is given)
    #[command(visible_alias = "assistants")]
    Assistant {
        #[command(subcommand)]
        action: Option<AssistantCommand>,
    },

    /// Manage threads (lists them when no subcommand is given)
    #[command(visible_alias = "threads")]
    Thread {
        #[command(subcommand)]
        action: Option<ThreadCommand>,
    },
}

#[derive(Debug, Subcommand)]
#[command(infer_subcommands = true)]
pub enum AssistantCommand {
    /// List assistants
    #[command(visible_alias = "ls")]
    List,

    /// Create an assistant with the local tools enabled
    Create {
        model: String,
        name: String,
        instructions: String,
        /// Do not enable the code interpreter tool
        #[arg(long = "no-code-interpreter", action = ArgAction::SetFalse)]
        code_interpreter: bool,
        /// Enable the file search tool
        #[arg(long)]
        file_search: bool,
        /// Select the new assistant
        #[arg(short, long)]
        select: bool,
    },

    /// Select an assistant by id (or by name with --name)
    Select {
        assistant_id: String,
        #[arg(short, long)]
        name: bool,
    },

    /// Delete one or more assistants
    Delete {
        #[arg(required = true)]
        assistant_ids: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
#[command(infer_subcommands = true)]
pub enum ThreadCommand {
    /// List known threads
    #[command(visible_alias = "ls")]
    List,

    /// Create a thread
    Create {
        #[arg(short, long)]
        label: Option<String>,
        #[arg(short, long)]
        select: bool,
    },

    /// Select a thread by id
    Select { thread_id: String },

    /// Delete a thread
    Delete { thread_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("oa-assist").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_group_without_subcommand() {
        assert!(matches!(
            parse(&["assistant"]).command,
            Command::Assistant { action: None }
        ));
    }

    #[test]
    fn test_plural_alias() {
        assert!(matches!(
            parse(&["threads"]).command,
            Command::Thread { action: None }
        ));
        assert!(matches!(
            parse(&["assistants", "list"]).command,
            Command::Assistant {
                action: Some(AssistantCommand::List)
            }
        ));
    }

    #[test]
    fn test_prefix_inference() {
        match parse(&["a", "sel", "asst_1", "--name"]).command {
            Command::Assistant {
                action: Some(AssistantCommand::Select { assistant_id, name }),
            } => {
                assert_eq!(assistant_id, "asst_1");
                assert!(name);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(matches!(parse(&["ch"]).command, Command::Chat { message: None }));
    }

    #[test]
    fn test_create_flags() {
        match parse(&["assistant", "create", "gpt-4o", "helper", "Be brief.", "-s"]).command {
            Command::Assistant {
                action:
                    Some(AssistantCommand::Create {
                        code_interpreter,
                        file_search,
                        select,
                        ..
                    }),
            } => {
                assert!(code_interpreter);
                assert!(!file_search);
                assert!(select);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        match parse(&[
            "assistant",
            "create",
            "gpt-4o",
            "helper",
            "Be brief.",
            "--no-code-interpreter",
            "--file-search",
        ])
        .command
        {
            Command::Assistant {
                action:
                    Some(AssistantCommand::Create {
                        code_interpreter,
                        file_search,
                        ..
                    }),
            } => {
                assert!(!code_interpreter);
                assert!(file_search);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_chat_message_and_global_paths() {
        let cli = parse(&["chat", "-m", "hi", "--state", "/tmp/state.json"]);
        assert_eq!(cli.state, Some(PathBuf::from("/tmp/state.json")));
        assert!(matches!(cli.command, Command::Chat { message: Some(ref m) } if m == "hi"));
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["oa-assist", "assistant", "delete"]).is_err());
    }
}
