//! # Errors
//!
//! Failures raised by the run loop, the action registry and the API client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistError {
    /// The server requested a tool that is not in the registry.
    #[error("unknown action: '{0}'")]
    UnknownAction(String),

    #[error("action '{0}' is already registered")]
    DuplicateAction(String),

    /// The run reported a status outside the handled lifecycle.
    #[error("unhandled run status: {0}")]
    UnhandledRunStatus(String),

    #[error("invalid arguments for '{name}': {reason}")]
    InvalidArguments { name: String, reason: String },

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T, E = AssistError> = std::result::Result<T, E>;
