//! `list`: the built-in steps in declared order.

use resonance_validation::{default_steps, SessionConfig};

use crate::error::CliExitCode;

pub fn list_command() -> CliExitCode {
    print!("{}", render_step_list(&SessionConfig::default()));
    CliExitCode::Success
}

/// One line per step: name, claim count and description.
pub fn render_step_list(config: &SessionConfig) -> String {
    let steps = default_steps();
    let width = steps.iter().map(|s| s.name().len()).max().unwrap_or(0);
    steps
        .iter()
        .map(|step| {
            format!(
                "{:<width$}  {} claims  {}\n",
                step.name(),
                step.claims(config).len(),
                step.description()
            )
        })
        .collect()
}
