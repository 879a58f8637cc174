use std::sync::Mutex;

use anyhow::Result;
use mlstrap::executor::{CommandExecutor, CommandSpec, ExecutionResult};
use mlstrap::prompt::LineReader;

/// Records executed command lines in order, optionally failing on one call.
#[allow(dead_code)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<String>>,
    /// If set, the Nth call (0-indexed) returns an error.
    fail_on_call: Option<usize>,
    /// If set, any command line containing this text returns an error.
    fail_on_match: Option<String>,
}

#[allow(dead_code)]
impl RecordingExecutor {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_on_call: None,
            fail_on_match: None,
        }
    }

    pub fn failing_on(call_index: usize) -> Self {
        Self {
            fail_on_call: Some(call_index),
            ..Self::new()
        }
    }

    pub fn failing_on_match(pattern: impl Into<String>) -> Self {
        Self {
            fail_on_match: Some(pattern.into()),
            ..Self::new()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandExecutor for RecordingExecutor {
    fn execute(&self, spec: &CommandSpec) -> Result<ExecutionResult> {
        let line = spec.display_line().to_string();
        let mut calls = self.calls.lock().unwrap();
        let index = calls.len();
        calls.push(line.clone());
        drop(calls);

        let matched = self
            .fail_on_match
            .as_deref()
            .is_some_and(|pattern| line.contains(pattern));
        if self.fail_on_call == Some(index) || matched {
            anyhow::bail!("simulated failure on call {}", index);
        }
        Ok(ExecutionResult { status: None })
    }
}

/// Line reader returning a fixed answer and counting how often it was asked.
#[allow(dead_code)]
pub struct ScriptedReader {
    answer: String,
    pub prompts: usize,
}

#[allow(dead_code)]
impl ScriptedReader {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            prompts: 0,
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.prompts += 1;
        Ok(self.answer.clone())
    }
}
