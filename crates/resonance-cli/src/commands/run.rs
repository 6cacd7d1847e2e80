//! `run-all` and `run <STEP>...`

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{debug, info};

use resonance_validation::{SessionConfig, ValidationSession};

use crate::error::CliExitCode;
use crate::output::render_summary;

/// Session flags shared by `run-all` and `run`.
#[derive(Args, Debug, Clone, Default)]
pub struct SessionArgs {
    /// TOML session configuration
    #[arg(long, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Shrink harmonic depth, decomposition depth and simulation sizes
    #[arg(long)]
    pub fast: bool,

    /// Report a step as skipped (repeatable)
    #[arg(long = "skip", value_name = "STEP")]
    pub skip: Vec<String>,

    /// Do not write visualization exports such as GEXF
    #[arg(long)]
    pub skip_visualization: bool,

    /// Write per-step artifact files next to the report
    #[arg(long)]
    pub retain_artifacts: bool,

    /// Run steps on the rayon thread pool
    #[arg(long)]
    pub parallel: bool,

    /// Report directory
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Seed for every sampled estimate
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the full JSON report instead of the summary table
    #[arg(long)]
    pub json: bool,
}

impl SessionArgs {
    /// File (or defaults), then `RESONANCE_*` variables, then flags.
    pub fn session_config(&self) -> anyhow::Result<SessionConfig> {
        let base = match &self.config {
            Some(path) => SessionConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => SessionConfig::default(),
        };
        let mut config = base
            .with_env_overrides()
            .context("applying RESONANCE_* overrides")?;

        config.fast_mode |= self.fast;
        config.skip_visualization |= self.skip_visualization;
        config.retain_artifacts |= self.retain_artifacts;
        config.parallel_steps |= self.parallel;
        for step in &self.skip {
            if !config.skip_steps.contains(step) {
                config.skip_steps.push(step.clone());
            }
        }
        if let Some(dir) = &self.output {
            config.output_dir = dir.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        debug!(skip = ?config.skip_steps, fast = config.fast_mode, "session configuration resolved");
        Ok(config)
    }
}

/// Run every default step.
pub fn run_all_command(args: &SessionArgs) -> anyhow::Result<CliExitCode> {
    execute(args.session_config()?, args.json)
}

/// Run the named steps; the others are reported as skipped.
pub fn run_steps_command(steps: &[String], args: &SessionArgs) -> anyhow::Result<CliExitCode> {
    let mut config = args.session_config()?;
    config.only_steps = steps.to_vec();
    execute(config, args.json)
}

fn execute(config: SessionConfig, json: bool) -> anyhow::Result<CliExitCode> {
    let session = ValidationSession::with_default_steps(config)?;
    info!(steps = ?session.step_names(), "running validation session");
    let (report, path) = session.run_and_persist()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&report));
        println!("report: {}", path.display());
    }
    Ok(CliExitCode::from(&report.summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = SessionArgs {
            fast: true,
            skip: vec!["phase_lock".to_string(), "phase_lock".to_string()],
            output: Some(PathBuf::from("out")),
            seed: Some(9),
            ..Default::default()
        };
        let config = args.session_config().unwrap();
        assert!(config.fast_mode);
        assert_eq!(config.skip_steps, vec!["phase_lock".to_string()]);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let args = SessionArgs {
            config: Some(PathBuf::from("/nonexistent/resonance.toml")),
            ..Default::default()
        };
        assert!(args.session_config().is_err());
    }
}
