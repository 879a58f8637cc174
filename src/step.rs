//! Provisioning steps and the environment name they target.

use std::fmt;

use crate::error::MlstrapError;
use crate::executor::CommandSpec;

/// Name of the conda environment being provisioned.
///
/// Always trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    /// Creates a name from user-supplied text, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self, MlstrapError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(MlstrapError::InvalidInput(
                "environment name cannot be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One external command plus the description shown while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningStep {
    name: String,
    command: String,
}

impl ProvisioningStep {
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shell command line executed for this step.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Builds the executor spec that runs the command line through `sh -c`.
    pub fn to_spec(&self) -> CommandSpec {
        CommandSpec::shell(&self.command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_name_is_trimmed() {
        let name = EnvironmentName::new("  ml-env\n").unwrap();
        assert_eq!(name.as_str(), "ml-env");
        assert_eq!(name.to_string(), "ml-env");
    }

    #[test]
    fn test_environment_name_rejects_empty() {
        for raw in ["", "   ", "\t\n"] {
            let err = EnvironmentName::new(raw).unwrap_err();
            assert!(matches!(err, MlstrapError::InvalidInput(_)), "input {:?}", raw);
        }
    }

    #[test]
    fn test_step_spec_wraps_command_in_shell() {
        let step = ProvisioningStep::new("Upgrading pip", "conda run -n x pip install -U pip");
        let spec = step.to_spec();
        assert_eq!(spec.command, "sh");
        assert_eq!(spec.args, vec!["-c".to_string(), step.command().to_string()]);
    }
}
