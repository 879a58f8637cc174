pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod plan;
pub mod prerequisite;
pub mod prompt;
pub mod runner;
pub mod step;

pub use error::MlstrapError;

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::info;
use tracing_subscriber::{FmtSubscriber, filter::LevelFilter};

use crate::config::Profile;
use crate::executor::CommandExecutor;
use crate::prompt::LineReader;
use crate::runner::StepRunner;
use crate::step::{EnvironmentName, ProvisioningStep};

pub fn init_logging(log_level: cli::LogLevel) -> Result<()> {
    let filter = match log_level {
        cli::LogLevel::Trace => LevelFilter::TRACE,
        cli::LogLevel::Debug => LevelFilter::DEBUG,
        cli::LogLevel::Info => LevelFilter::INFO,
        cli::LogLevel::Warn => LevelFilter::WARN,
        cli::LogLevel::Error => LevelFilter::ERROR,
    };

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_max_level(filter).finish(),
    )
    .context("failed to set global default tracing subscriber")
}

/// Loads the profile named by the CLI options and applies overrides.
///
/// A `--file` profile replaces the preset entirely.
pub fn resolve_profile(opts: &cli::ProfileArgs) -> Result<Profile> {
    let mut profile = match &opts.file {
        Some(path) => config::load_profile(path)
            .with_context(|| format!("failed to load profile from {}", path))?,
        None => opts.preset.profile(),
    };

    if let Some(name) = &opts.name {
        profile = profile.with_environment_name(name.clone());
    }
    if opts.skip_prerequisite_check {
        profile = profile.without_prerequisites();
    }

    profile.validate().context("profile validation failed")?;
    Ok(profile)
}

/// Returns the fixed environment name, or prompts for one.
pub fn resolve_environment_name(
    profile: &Profile,
    input: &mut dyn LineReader,
) -> Result<EnvironmentName> {
    match &profile.environment.name {
        Some(name) => Ok(EnvironmentName::new(name)?),
        None => prompt::acquire_environment_name(input),
    }
}

/// Writes the completion banner with activation instructions.
pub fn write_summary(
    out: &mut dyn Write,
    profile: &Profile,
    env: &EnvironmentName,
) -> std::io::Result<()> {
    let rule = "=".repeat(50);
    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(
        out,
        "[COMPLETE] {} has been installed in environment: '{}'",
        profile.application.display_name, env
    )?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "To start using it, run the following in your terminal:")?;
    writeln!(out, "    conda activate {}", env)?;
    for next in &profile.application.next_steps {
        writeln!(out, "    {}", next)?;
    }
    writeln!(out, "{}", rule)?;
    Ok(())
}

/// Runs the full installation.
///
/// Prerequisites are checked first (skipped in dry-run mode), then the
/// environment name is acquired, then every step runs in order. Nothing is
/// executed if either of the first two fails.
pub fn run_install(
    opts: &cli::InstallArgs,
    executor: Arc<dyn CommandExecutor>,
    input: &mut dyn LineReader,
    out: &mut dyn Write,
) -> Result<()> {
    let profile = resolve_profile(&opts.profile)?;

    if opts.dry_run {
        for tool in &profile.prerequisites {
            info!("dry run: skipping prerequisite check for {}", tool);
        }
    } else {
        prerequisite::check_prerequisites(&profile.prerequisites)?;
    }

    let env = resolve_environment_name(&profile, input)?;
    let steps = plan::build_steps(&profile, &env);
    info!("provisioning environment '{}' with {} step(s)", env, steps.len());

    let runner = StepRunner::new(executor);
    runner.run_all(&steps)?;

    write_summary(out, &profile, &env).context("failed to write summary")?;
    Ok(())
}

/// Writes the numbered step list to `out` without running anything.
pub fn write_plan(out: &mut dyn Write, steps: &[ProvisioningStep]) -> std::io::Result<()> {
    for (index, step) in steps.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, step.name())?;
        writeln!(out, "   {}", step.command())?;
    }
    Ok(())
}

pub fn run_plan(opts: &cli::PlanArgs, input: &mut dyn LineReader, out: &mut dyn Write) -> Result<()> {
    let profile = resolve_profile(&opts.profile)?;
    let env = resolve_environment_name(&profile, input)?;
    let steps = plan::build_steps(&profile, &env);
    write_plan(out, &steps).context("failed to write plan")?;
    Ok(())
}

pub fn run_validate(opts: &cli::ValidateArgs) -> Result<()> {
    let profile = config::load_profile(opts.file.as_path())?;
    profile.validate().context("profile validation failed")?;
    info!("validation successful:\n{:#?}", profile);
    Ok(())
}

pub fn run_completions(opts: &cli::CompletionsArgs, out: &mut dyn Write) {
    let mut cmd = cli::Cli::command();
    clap_complete::generate(opts.shell, &mut cmd, env!("CARGO_PKG_NAME"), out);
}
