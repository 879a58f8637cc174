//! Installer profile: what to install and how the environment is named.
//!
//! Profiles are YAML documents. Every field has a default matching the
//! stock Nerfstudio installer, so a profile only lists what it overrides.

use std::fs::File;
use std::io::BufReader;

use camino::Utf8Path;
use clap::ValueEnum;
use serde::Deserialize;
use strum::Display;
use tracing::debug;

use crate::error::MlstrapError;

/// Built-in installer variants.
///
/// Each preset fixes how the environment name is acquired and whether
/// `conda` must be found on `PATH` before anything runs.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Display, ValueEnum)]
#[strum(serialize_all = "lowercase")]
pub enum Preset {
    /// Fixed environment name `nerfstudio`, no prerequisite check
    Basic,
    /// Prompted environment name, no prerequisite check
    Prompted,
    /// Prompted environment name and a `conda` check (default)
    #[default]
    Server,
}

impl Preset {
    /// Builds the profile for this preset.
    pub fn profile(self) -> Profile {
        let mut profile = Profile::default();
        match self {
            Preset::Basic => {
                profile.environment.name = Some(DEFAULT_ENV_NAME.to_string());
            }
            Preset::Prompted => {}
            Preset::Server => {
                profile.prerequisites = vec![PACKAGE_MANAGER.to_string()];
            }
        }
        profile
    }
}

const DEFAULT_ENV_NAME: &str = "nerfstudio";

/// Package and environment manager every step is run through.
pub const PACKAGE_MANAGER: &str = "conda";

/// How pip is invoked inside the environment.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PipStyle {
    /// `python -m pip` (default)
    #[default]
    Module,
    /// bare `pip`
    Bare,
}

impl PipStyle {
    /// Returns the command prefix used to invoke pip.
    pub fn invocation(self) -> &'static str {
        match self {
            PipStyle::Module => "python -m pip",
            PipStyle::Bare => "pip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Fixed environment name; prompted for when absent
    pub name: Option<String>,
    /// Python version passed to `conda create`
    pub python: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            name: None,
            python: "3.8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CudaConfig {
    /// Conda channel providing the toolkit
    pub channel: String,
    /// Toolkit package name
    pub package: String,
    /// Human-readable version shown in progress output
    pub version: String,
}

impl Default for CudaConfig {
    fn default() -> Self {
        Self {
            channel: "nvidia/label/cuda-11.8.0".to_string(),
            package: "cuda-toolkit".to_string(),
            version: "11.8".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TorchConfig {
    pub packages: Vec<String>,
    /// Extra pip index serving the CUDA builds
    pub index_url: String,
}

impl Default for TorchConfig {
    fn default() -> Self {
        Self {
            packages: vec![
                "torch==2.1.2+cu118".to_string(),
                "torchvision==0.16.2+cu118".to_string(),
            ],
            index_url: "https://download.pytorch.org/whl/cu118".to_string(),
        }
    }
}

/// Optional native extension compiled against the CUDA toolkit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtensionConfig {
    pub description: String,
    pub packages: Vec<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            description: "Compiling and installing tiny-cuda-nn (this may take a few minutes)"
                .to_string(),
            packages: vec![
                "ninja".to_string(),
                "git+https://github.com/NVlabs/tiny-cuda-nn/#subdirectory=bindings/torch"
                    .to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApplicationConfig {
    /// Name shown in the completion banner
    pub display_name: String,
    pub description: String,
    pub packages: Vec<String>,
    /// Commands suggested to the user after a successful install
    pub next_steps: Vec<String>,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            display_name: "Nerfstudio".to_string(),
            description: "Installing Nerfstudio and Viewer".to_string(),
            packages: vec!["nerfstudio".to_string()],
            next_steps: vec!["ns-train splatfacto --data <your_data_folder>".to_string()],
        }
    }
}

/// Complete installer profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub environment: EnvironmentConfig,
    /// Tools that must be on `PATH` before anything runs
    pub prerequisites: Vec<String>,
    pub pip: PipStyle,
    pub cuda: CudaConfig,
    pub torch: TorchConfig,
    /// Set to `null` to skip the native extension build
    pub extension: Option<ExtensionConfig>,
    pub application: ApplicationConfig,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            prerequisites: Vec::new(),
            pip: PipStyle::default(),
            cuda: CudaConfig::default(),
            torch: TorchConfig::default(),
            extension: Some(ExtensionConfig::default()),
            application: ApplicationConfig::default(),
        }
    }
}

fn require_non_empty(value: &str, field: &str) -> Result<(), MlstrapError> {
    if value.trim().is_empty() {
        return Err(MlstrapError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_packages(packages: &[String], field: &str) -> Result<(), MlstrapError> {
    if packages.is_empty() {
        return Err(MlstrapError::Validation(format!("{} must list at least one package", field)));
    }
    for (index, package) in packages.iter().enumerate() {
        require_non_empty(package, &format!("{}[{}]", field, index))?;
    }
    Ok(())
}

impl Profile {
    /// Validates the profile values.
    pub fn validate(&self) -> Result<(), MlstrapError> {
        if let Some(name) = &self.environment.name {
            require_non_empty(name, "environment.name")?;
        }
        require_non_empty(&self.environment.python, "environment.python")?;

        for (index, tool) in self.prerequisites.iter().enumerate() {
            require_non_empty(tool, &format!("prerequisites[{}]", index))?;
        }

        require_non_empty(&self.cuda.channel, "cuda.channel")?;
        require_non_empty(&self.cuda.package, "cuda.package")?;

        require_packages(&self.torch.packages, "torch.packages")?;
        let index_url = url::Url::parse(&self.torch.index_url).map_err(|e| {
            MlstrapError::Validation(format!(
                "torch.index_url is not a valid URL: {}: {}",
                self.torch.index_url, e
            ))
        })?;
        if !matches!(index_url.scheme(), "http" | "https") {
            return Err(MlstrapError::Validation(format!(
                "torch.index_url must use http or https, got: {}",
                index_url.scheme()
            )));
        }

        if let Some(extension) = &self.extension {
            require_non_empty(&extension.description, "extension.description")?;
            require_packages(&extension.packages, "extension.packages")?;
        }

        require_non_empty(&self.application.display_name, "application.display_name")?;
        require_non_empty(&self.application.description, "application.description")?;
        require_packages(&self.application.packages, "application.packages")?;

        Ok(())
    }

    /// Forces a fixed environment name, replacing any prompt.
    pub fn with_environment_name(mut self, name: impl Into<String>) -> Self {
        self.environment.name = Some(name.into());
        self
    }

    /// Clears the prerequisite list.
    pub fn without_prerequisites(mut self) -> Self {
        self.prerequisites.clear();
        self
    }
}

/// Loads a profile from a YAML file.
pub fn load_profile(path: &Utf8Path) -> Result<Profile, MlstrapError> {
    let file = File::open(path).map_err(|e| MlstrapError::io(path.as_str(), e))?;
    let reader = BufReader::new(file);
    let profile: Profile = serde_yaml::from_reader(reader)
        .map_err(|e| MlstrapError::Config(format!("failed to parse YAML: {}: {}", path, e)))?;
    debug!("loaded profile from {}", path);
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_is_valid() {
        Profile::default().validate().unwrap();
    }

    #[test]
    fn test_presets_differ_in_name_source_and_check() {
        let basic = Preset::Basic.profile();
        assert_eq!(basic.environment.name.as_deref(), Some("nerfstudio"));
        assert!(basic.prerequisites.is_empty());

        let prompted = Preset::Prompted.profile();
        assert!(prompted.environment.name.is_none());
        assert!(prompted.prerequisites.is_empty());

        let server = Preset::Server.profile();
        assert!(server.environment.name.is_none());
        assert_eq!(server.prerequisites, vec![PACKAGE_MANAGER.to_string()]);
        assert_eq!(PACKAGE_MANAGER, "conda");
    }

    #[test]
    fn test_preset_display_is_lowercase() {
        assert_eq!(Preset::Server.to_string(), "server");
        assert_eq!(Preset::Basic.to_string(), "basic");
    }

    #[test]
    fn test_pip_invocation() {
        assert_eq!(PipStyle::Module.invocation(), "python -m pip");
        assert_eq!(PipStyle::Bare.invocation(), "pip");
    }

    #[test]
    fn test_validate_rejects_blank_fixed_name() {
        let profile = Profile::default().with_environment_name("   ");
        let err = profile.validate().unwrap_err();
        assert!(matches!(err, MlstrapError::Validation(_)));
        assert!(err.to_string().contains("environment.name"));
    }

    #[test]
    fn test_validate_rejects_non_http_index_url() {
        let mut profile = Profile::default();
        profile.torch.index_url = "ftp://example.com/whl".to_string();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_validate_rejects_unparsable_index_url() {
        let mut profile = Profile::default();
        profile.torch.index_url = "not a url".to_string();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("torch.index_url"));
    }

    #[test]
    fn test_validate_rejects_empty_application_packages() {
        let mut profile = Profile::default();
        profile.application.packages.clear();
        let err = profile.validate().unwrap_err();
        assert!(err.to_string().contains("application.packages"));
    }

    #[test]
    fn test_without_prerequisites() {
        let profile = Preset::Server.profile().without_prerequisites();
        assert!(profile.prerequisites.is_empty());
    }
}
