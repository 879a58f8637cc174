//! Checks that required tools are reachable before anything runs.

use tracing::debug;
use which::which;

use crate::error::MlstrapError;

/// Looks `tool_name` up on `PATH`.
pub fn check_prerequisite(tool_name: &str) -> Result<(), MlstrapError> {
    match which(tool_name) {
        Ok(path) => {
            debug!("prerequisite found: {}: {}", tool_name, path.to_string_lossy());
            Ok(())
        }
        Err(_) => Err(MlstrapError::MissingDependency {
            tool: tool_name.to_string(),
        }),
    }
}

/// Checks every tool in order, failing on the first one that is missing.
pub fn check_prerequisites(tools: &[String]) -> Result<(), MlstrapError> {
    tools.iter().try_for_each(|tool| check_prerequisite(tool))
}
