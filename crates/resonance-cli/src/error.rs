//! Process exit codes.
//!
//! - 0: every executed step passed
//! - 1: a claim failed or a step errored
//! - 2: the session could not run or its report could not be written

use std::process::ExitCode;

use resonance_validation::ReportSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CliExitCode {
    /// All executed steps passed
    Success = 0,
    /// Session finished with failed or errored steps
    Warning = 1,
    /// Invalid configuration or a fatal persistence error
    Blocking = 2,
}

impl From<CliExitCode> for ExitCode {
    fn from(code: CliExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl From<&ReportSummary> for CliExitCode {
    fn from(summary: &ReportSummary) -> Self {
        if summary.all_passed() {
            CliExitCode::Success
        } else {
            CliExitCode::Warning
        }
    }
}
