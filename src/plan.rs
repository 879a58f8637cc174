//! Builds the ordered list of provisioning steps for a profile.
//!
//! The order is fixed: environment creation, pip self-update, CUDA toolkit,
//! PyTorch, the optional native extension, then the application. Later
//! steps rely on earlier ones (the extension build needs the toolkit), so
//! the list must be run front to back.

use crate::config::{PACKAGE_MANAGER, Profile};
use crate::step::{EnvironmentName, ProvisioningStep};

/// Prefix that runs a command inside the named environment.
fn env_prefix(env: &EnvironmentName) -> String {
    format!("{} run -n {}", PACKAGE_MANAGER, env)
}

fn pip_install(profile: &Profile, env: &EnvironmentName, args: &[String]) -> String {
    format!(
        "{} {} install {}",
        env_prefix(env),
        profile.pip.invocation(),
        args.join(" ")
    )
}

/// Returns the steps for `profile`, targeting `env`.
pub fn build_steps(profile: &Profile, env: &EnvironmentName) -> Vec<ProvisioningStep> {
    let mut steps = Vec::with_capacity(6);

    steps.push(ProvisioningStep::new(
        format!("Creating Conda environment '{}'", env),
        format!(
            "{} create --name {} -y python={}",
            PACKAGE_MANAGER, env, profile.environment.python
        ),
    ));

    steps.push(ProvisioningStep::new(
        "Upgrading pip",
        pip_install(profile, env, &["--upgrade".to_string(), "pip".to_string()]),
    ));

    steps.push(ProvisioningStep::new(
        format!("Installing CUDA Toolkit {}", profile.cuda.version),
        format!(
            "{} {} install -y -c \"{}\" {}",
            env_prefix(env),
            PACKAGE_MANAGER,
            profile.cuda.channel,
            profile.cuda.package
        ),
    ));

    let mut torch_args = profile.torch.packages.clone();
    torch_args.push("--extra-index-url".to_string());
    torch_args.push(profile.torch.index_url.clone());
    steps.push(ProvisioningStep::new(
        format!("Installing PyTorch ({})", profile.torch.packages.join(", ")),
        pip_install(profile, env, &torch_args),
    ));

    if let Some(extension) = &profile.extension {
        steps.push(ProvisioningStep::new(
            extension.description.clone(),
            pip_install(profile, env, &extension.packages),
        ));
    }

    steps.push(ProvisioningStep::new(
        profile.application.description.clone(),
        pip_install(profile, env, &profile.application.packages),
    ));

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipStyle;

    fn env(name: &str) -> EnvironmentName {
        EnvironmentName::new(name).unwrap()
    }

    #[test]
    fn test_default_profile_commands() {
        let steps = build_steps(&Profile::default(), &env("ml-env"));
        let commands: Vec<&str> = steps.iter().map(|s| s.command()).collect();
        assert_eq!(
            commands,
            vec![
                "conda create --name ml-env -y python=3.8",
                "conda run -n ml-env python -m pip install --upgrade pip",
                "conda run -n ml-env conda install -y -c \"nvidia/label/cuda-11.8.0\" cuda-toolkit",
                "conda run -n ml-env python -m pip install torch==2.1.2+cu118 \
                 torchvision==0.16.2+cu118 --extra-index-url https://download.pytorch.org/whl/cu118",
                "conda run -n ml-env python -m pip install ninja \
                 git+https://github.com/NVlabs/tiny-cuda-nn/#subdirectory=bindings/torch",
                "conda run -n ml-env python -m pip install nerfstudio",
            ]
        );
    }

    #[test]
    fn test_bare_pip_applies_to_every_pip_call() {
        let mut profile = Profile::default();
        profile.pip = PipStyle::Bare;
        let steps = build_steps(&profile, &env("foo"));
        let pip_steps: Vec<_> = steps.iter().filter(|s| s.command().contains("pip install")).collect();
        assert_eq!(pip_steps.len(), 4);
        for step in pip_steps {
            assert!(step.command().starts_with("conda run -n foo pip install"), "{}", step.command());
        }
    }

    #[test]
    fn test_extension_can_be_skipped() {
        let mut profile = Profile::default();
        profile.extension = None;
        let steps = build_steps(&profile, &env("foo"));
        assert_eq!(steps.len(), 5);
        assert!(!steps.iter().any(|s| s.command().contains("tiny-cuda-nn")));
        assert!(steps.last().unwrap().command().ends_with("install nerfstudio"));
    }

    #[test]
    fn test_every_command_goes_through_package_manager() {
        for step in build_steps(&Profile::default(), &env("foo")) {
            assert!(step.command().starts_with(PACKAGE_MANAGER), "{}", step.command());
        }
    }

    #[test]
    fn test_creation_step_names_environment() {
        let steps = build_steps(&Profile::default(), &env("foo"));
        assert_eq!(steps[0].name(), "Creating Conda environment 'foo'");
        assert_eq!(steps[2].name(), "Installing CUDA Toolkit 11.8");
    }
}
