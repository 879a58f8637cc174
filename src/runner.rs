//! Sequential, fail-fast execution of provisioning steps.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::MlstrapError;
use crate::executor::CommandExecutor;
use crate::step::ProvisioningStep;

/// Runs provisioning steps one at a time through a [`CommandExecutor`].
pub struct StepRunner {
    executor: Arc<dyn CommandExecutor>,
}

impl StepRunner {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self { executor }
    }

    /// Runs a single step and waits for it to finish.
    ///
    /// Returns `StepFailure` when the command exits non-zero or could not be
    /// started at all.
    pub fn run_step(&self, step: &ProvisioningStep) -> Result<(), MlstrapError> {
        info!("starting: {}", step.name());
        debug!("command: {}", step.command());

        let spec = step.to_spec();
        let result = self
            .executor
            .execute(&spec)
            .map_err(|e| MlstrapError::StepFailure {
                step: step.name().to_string(),
                command: step.command().to_string(),
                status: format!("{:#}", e),
            })?;

        if !result.success() {
            let status = match result.status {
                Some(status) => status.to_string(),
                None => "unknown status".to_string(),
            };
            return Err(MlstrapError::StepFailure {
                step: step.name().to_string(),
                command: step.command().to_string(),
                status,
            });
        }

        info!("completed: {}", step.name());
        Ok(())
    }

    /// Runs `steps` in order, stopping at the first failure.
    ///
    /// Steps after a failed one are never started. Returns the number of
    /// steps run.
    pub fn run_all(&self, steps: &[ProvisioningStep]) -> Result<usize, MlstrapError> {
        for (index, step) in steps.iter().enumerate() {
            info!("step {}/{}", index + 1, steps.len());
            self.run_step(step)?;
        }
        Ok(steps.len())
    }
}
