//! Interactive acquisition of the environment name.

use std::io::{BufRead, Write};

use anyhow::Result;
use dialoguer::Input;

use crate::error::MlstrapError;
use crate::step::EnvironmentName;

pub const ENVIRONMENT_NAME_PROMPT: &str = "Enter the name for your new Conda environment";

/// Source of a single line of user input.
pub trait LineReader {
    /// Shows `prompt` and returns the line entered, or an empty string at EOF.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Reads from an interactive terminal using `dialoguer`.
#[derive(Default)]
pub struct TerminalReader;

impl LineReader for TerminalReader {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        let line = Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;
        Ok(line)
    }
}

/// Reads from any buffered reader, e.g. piped stdin, writing the prompt to
/// `out` first.
pub struct BufReadReader<R, W> {
    inner: R,
    out: W,
}

impl<R: BufRead, W: Write> BufReadReader<R, W> {
    pub fn new(inner: R, out: W) -> Self {
        Self { inner, out }
    }
}

impl<R: BufRead, W: Write> LineReader for BufReadReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{}: ", prompt)
            .and_then(|()| self.out.flush())
            .map_err(|e| MlstrapError::io("failed to write prompt", e))?;
        let mut line = String::new();
        self.inner
            .read_line(&mut line)
            .map_err(|e| MlstrapError::io("failed to read environment name", e))?;
        Ok(line)
    }
}

/// Reads the environment name from `input`.
///
/// Empty or whitespace-only input (including EOF) is rejected with
/// `InvalidInput`.
pub fn acquire_environment_name(input: &mut dyn LineReader) -> Result<EnvironmentName> {
    let line = input.read_line(ENVIRONMENT_NAME_PROMPT)?;
    Ok(EnvironmentName::new(&line)?)
}
