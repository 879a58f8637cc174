//! Domain-specific error types for mlstrap.
//!
//! This module defines `MlstrapError`, a `thiserror`-based enum that
//! provides typed error variants for every way an installation can fail.
//! Public API functions return `Result<T, MlstrapError>` for programmatic
//! error handling, while trait boundaries continue to use `anyhow::Result`.
//!
//! `MlstrapError` implements `Into<anyhow::Error>`, so the `?` operator
//! converts it automatically at boundaries that return `anyhow::Result`.

use std::io;

/// Formats an IO error kind into a human-readable message.
///
/// Gives consistent messages for common kinds (e.g., "I/O error: not found")
/// instead of the OS-level text. Unrecognized kinds fall back to the
/// OS-level message.
pub(crate) fn io_error_kind_message(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::NotFound => "I/O error: not found".to_string(),
        io::ErrorKind::PermissionDenied => "I/O error: permission denied".to_string(),
        io::ErrorKind::IsADirectory => "I/O error: is a directory".to_string(),
        io::ErrorKind::UnexpectedEof => "I/O error: unexpected end of input".to_string(),
        _ => format!("I/O error: {}", err),
    }
}

/// Domain-specific error type for mlstrap.
///
/// Every variant is fatal to the installation: the binary logs it and exits
/// with status 1.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MlstrapError {
    /// A provisioning step returned a non-zero status or could not be started.
    #[error("step failed: {step}: {command}: {status}")]
    StepFailure {
        /// Human-readable description of the step.
        step: String,
        /// The full command line that failed.
        command: String,
        /// Exit status or the reason the command could not run.
        status: String,
    },

    /// User-supplied input was rejected (e.g., an empty environment name).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required tool is not reachable through `PATH`.
    #[error("missing dependency: {tool} is not found in PATH")]
    MissingDependency {
        /// Name of the executable that was looked up.
        tool: String,
    },

    /// The command interpreter could not be located.
    #[error("command not found in PATH: {command}")]
    CommandNotFound {
        /// Name of the executable that was looked up.
        command: String,
    },

    /// Executor-internal failure (thread spawn, wait failure, reader panic).
    #[error("command execution failed: {command}: {status}")]
    Execution {
        /// The command that was executed.
        command: String,
        /// Description of the internal failure.
        status: String,
    },

    /// A profile value violated a constraint.
    #[error("validation error: {0}")]
    Validation(String),

    /// A profile could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O operation failed with contextual information.
    #[error("{context}: {message}")]
    Io {
        /// What was being done when the error occurred (usually a path).
        context: String,
        /// Message derived from [`io_error_kind_message`].
        message: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl MlstrapError {
    /// Creates an `Io` variant with the `message` field derived from `source`.
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            message: io_error_kind_message(&source),
            source,
        }
    }
}
