//! Error types for command execution.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external command.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The argument vector had no program name.
    #[error("Cannot run an empty command")]
    EmptyCommand,

    /// The program could not be found on `PATH`.
    #[error("Command `{0}` not found")]
    NotFound(String),

    /// Spawning or talking to the child failed.
    #[error("IO error running `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The child did not exit within the configured timeout and was killed.
    #[error("Command `{0}` timed out after {1:?}")]
    Timeout(String, Duration),

    /// The child exited with a non-zero status.
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Captured stdout was not valid UTF-8.
    #[error("Command output was not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A test runner received a command it was not scripted for.
    #[error("Unexpected command `{0}`")]
    Unexpected(String),

    /// A test runner was scripted to fail this command.
    #[error("Command `{command}` failed: {message}")]
    Scripted { command: String, message: String },
}

impl ExecError {
    pub(crate) fn io(command: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            command: command.into(),
            source,
        }
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, ExecError>;
