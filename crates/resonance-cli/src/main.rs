//! Resonance CLI
//!
//! Runs validation sessions and prints their summary.
//!
//! # Commands
//!
//! - `run-all`: run every built-in step
//! - `run <STEP>...`: run the named steps, report the rest as skipped
//! - `list`: show the built-in steps in declared order
//!
//! Logs go to stderr (`RUST_LOG`, or `-v`/`-vv`/`-vvv`); the summary table or
//! JSON report goes to stdout. Exit codes are listed in [`error`].

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;
mod output;

use commands::run::SessionArgs;
use error::CliExitCode;

/// Resonance validation sessions
#[derive(Parser, Debug)]
#[command(name = "resonance")]
#[command(version)]
#[command(about = "Run resonance validation sessions and report their claims")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every built-in validation step
    RunAll(SessionArgs),
    /// Run only the named steps
    Run {
        /// Step names, see `resonance list`
        #[arg(required = true, value_name = "STEP")]
        steps: Vec<String>,

        #[command(flatten)]
        session: SessionArgs,
    },
    /// List the built-in steps
    List,
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Commands) -> anyhow::Result<CliExitCode> {
    match command {
        Commands::RunAll(args) => commands::run::run_all_command(&args),
        Commands::Run { steps, session } => commands::run::run_steps_command(&steps, &session),
        Commands::List => Ok(commands::list::list_command()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.command) {
        Ok(code) => code.into(),
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            CliExitCode::Blocking.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_parses_steps_and_flags() {
        let cli = Cli::try_parse_from([
            "resonance",
            "run",
            "phase_lock",
            "gear_ratio",
            "--fast",
            "--skip",
            "gear_ratio",
            "--seed",
            "3",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run { steps, session } => {
                assert_eq!(steps, vec!["phase_lock", "gear_ratio"]);
                assert!(session.fast);
                assert_eq!(session.skip, vec!["gear_ratio"]);
                assert_eq!(session.seed, Some(3));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_run_requires_a_step() {
        assert!(Cli::try_parse_from(["resonance", "run"]).is_err());
    }

    #[test]
    fn test_run_all_repeatable_skip() {
        let cli = Cli::try_parse_from([
            "resonance",
            "run-all",
            "--skip",
            "phase_lock",
            "--skip",
            "harmonic_network",
            "--parallel",
            "--retain-artifacts",
            "--skip-visualization",
        ])
        .unwrap();
        let Commands::RunAll(args) = cli.command else {
            panic!("expected run-all");
        };
        assert_eq!(args.skip.len(), 2);
        assert!(args.parallel && args.retain_artifacts && args.skip_visualization);
    }
}
