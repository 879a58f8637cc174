use std::io::{self, IsTerminal};
use std::process;
use std::sync::Arc;

use anyhow::Result;
use tracing::error;

use mlstrap::cli::{self, Commands};
use mlstrap::executor::{CommandExecutor, RealCommandExecutor};
use mlstrap::prompt::{BufReadReader, LineReader, TerminalReader};

fn line_reader() -> Box<dyn LineReader> {
    if io::stdin().is_terminal() {
        Box::new(TerminalReader)
    } else {
        Box::new(BufReadReader::new(io::stdin().lock(), io::stdout()))
    }
}

fn run(command: &Commands) -> Result<()> {
    let mut stdout = io::stdout();
    match command {
        Commands::Install(opts) => {
            let executor: Arc<dyn CommandExecutor> = Arc::new(RealCommandExecutor {
                dry_run: opts.dry_run,
            });
            mlstrap::run_install(opts, executor, line_reader().as_mut(), &mut stdout)
        }
        Commands::Plan(opts) => mlstrap::run_plan(opts, line_reader().as_mut(), &mut stdout),
        Commands::Validate(opts) => mlstrap::run_validate(opts),
        Commands::Completions(opts) => {
            mlstrap::run_completions(opts, &mut stdout);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = cli::parse_args()?;
    let command = Commands::or_default(args.command);

    mlstrap::init_logging(command.log_level())?;

    if let Err(e) = run(&command) {
        error!("{:#}", e);
        process::exit(1);
    }

    Ok(())
}
