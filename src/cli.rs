use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::config::Preset;

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    /// Subcommand to run; `install` with default options when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the environment by running every step in order
    Install(InstallArgs),

    /// Print the steps that `install` would run, without running them
    Plan(PlanArgs),

    /// Validate the given YAML profile
    Validate(ValidateArgs),

    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

impl Commands {
    /// Returns the command to run, falling back to a default `install`.
    pub fn or_default(command: Option<Commands>) -> Commands {
        command.unwrap_or_else(|| Commands::Install(InstallArgs::default()))
    }

    /// Returns the log level requested by the command.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Commands::Install(opts) => opts.profile.log_level,
            Commands::Plan(opts) => opts.profile.log_level,
            Commands::Validate(opts) => opts.log_level,
            Commands::Completions(_) => LogLevel::Warn,
        }
    }
}

/// Options shared by commands that build a step list.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Path to a YAML profile; the preset is used when omitted
    #[arg(short, long)]
    pub file: Option<Utf8PathBuf>,

    /// Built-in installer variant
    #[arg(short, long, default_value_t = Preset::Server)]
    pub preset: Preset,

    /// Use this environment name instead of prompting for one
    #[arg(short, long)]
    pub name: Option<String>,

    /// Do not check that required tools are on PATH
    #[arg(long)]
    pub skip_prerequisite_check: bool,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

impl Default for ProfileArgs {
    fn default() -> Self {
        Self {
            file: None,
            preset: Preset::Server,
            name: None,
            skip_prerequisite_check: false,
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct InstallArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Do not run, just show what would be done
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PlanArgs {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML file to validate
    #[arg(short, long, default_value = "profile.yml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Log levels accepted by `--log-level`, mapped onto `tracing` levels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

pub fn parse_args() -> Result<Cli> {
    Ok(Cli::parse())
}
