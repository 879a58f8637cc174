//! Command execution abstraction for mlstrap.
//!
//! This module provides:
//! - [`CommandSpec`]: Specification for commands to execute
//! - [`ExecutionResult`]: Result of command execution
//! - [`CommandExecutor`]: Trait for command execution strategies
//! - [`RealCommandExecutor`]: Production implementation using `std::process::Command`

mod pipe;
mod real;

use std::process::ExitStatus;

use anyhow::Result;

pub use real::RealCommandExecutor;

/// Interpreter used for provisioning command lines.
pub const SHELL: &str = "sh";

/// Specification for a command to be executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to execute (e.g., "sh")
    pub command: String,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Creates a new CommandSpec with command and args
    #[must_use]
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    /// Creates a spec that runs `line` through [`SHELL`] with `-c`.
    #[must_use]
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new(SHELL, vec!["-c".to_string(), line.into()])
    }

    /// Returns the command line handed to the shell.
    pub fn display_line(&self) -> &str {
        self.args.last().map_or(self.command.as_str(), String::as_str)
    }
}

/// Result of command execution
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command (None in dry-run mode)
    pub status: Option<ExitStatus>,
}

impl ExecutionResult {
    /// Returns true if the command executed successfully.
    ///
    /// In dry-run mode (status is None), this always returns true.
    pub fn success(&self) -> bool {
        self.status.is_none_or(|s| s.success())
    }
}

/// Trait for command execution.
///
/// Implementations must be `Send + Sync` so a single executor can be shared
/// as `Arc<dyn CommandExecutor>`.
pub trait CommandExecutor: Send + Sync {
    /// Executes a command with the given specification and waits for it.
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult>;
}
