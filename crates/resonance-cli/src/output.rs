//! Human-readable session summary for stdout.

use std::fmt::Write;

use resonance_validation::{SessionReport, StepStatus, ValidationResult};

/// Per-step table followed by the totals line.
pub fn render_summary(report: &SessionReport) -> String {
    let width = report
        .steps
        .iter()
        .map(|s| s.step_name.len())
        .chain(std::iter::once("STEP".len()))
        .max()
        .unwrap_or(4);

    let mut out = String::new();
    let _ = writeln!(out, "session {}", report.session_id);
    if report.frequency_source.fallback {
        let reason = report
            .frequency_source
            .error
            .as_ref()
            .map_or("unknown error", |e| e.message.as_str());
        let _ = writeln!(
            out,
            "frequency source '{}' failed ({reason}); used representative table",
            report.frequency_source.name
        );
    }
    let _ = writeln!(
        out,
        "{:<width$}  {:<8}  {:>7}  {:>10}  NOTE",
        "STEP", "STATUS", "CLAIMS", "TIME (ms)"
    );
    for step in &report.steps {
        let claims = if step.claims.is_empty() {
            "-".to_string()
        } else {
            format!("{}/{}", step.claims_passed(), step.claims.len())
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:<8}  {:>7}  {:>10.1}  {}",
            step.step_name,
            step.status.as_str(),
            claims,
            step.duration_ms,
            note(step)
        );
    }
    let _ = writeln!(out, "{}", report.summary);
    out
}

fn note(step: &ValidationResult) -> String {
    match step.status {
        StepStatus::Errored => step
            .error
            .as_ref()
            .map(|e| format!("{}: {}", e.kind, e.message))
            .unwrap_or_default(),
        StepStatus::Failed => step
            .claims
            .iter()
            .filter(|c| !c.passed)
            .map(|c| format!("{} = {} (want {} {})", c.name, c.measured, c.comparator, c.threshold))
            .collect::<Vec<_>>()
            .join("; "),
        StepStatus::Passed | StepStatus::Skipped => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use resonance_validation::{
        Claim, ClaimResult, ErrorRecord, FrequencySourceRecord, ReportSummary, SessionConfig,
    };

    fn report(steps: Vec<ValidationResult>) -> SessionReport {
        let now = steps[0].timestamp;
        SessionReport {
            session_id: Default::default(),
            started_at: now,
            finished_at: now,
            fast_mode: false,
            frequency_source: FrequencySourceRecord {
                name: "unavailable".to_string(),
                count: 13,
                fallback: true,
                error: Some(ErrorRecord {
                    kind: "config".to_string(),
                    message: "frequency source unavailable".to_string(),
                }),
            },
            config: SessionConfig::default(),
            summary: ReportSummary::from_results(&steps),
            steps,
        }
    }

    #[test]
    fn test_summary_lists_failures_and_errors() {
        let claim = Claim::greater_than("orders_of_magnitude", 11.0);
        let mut failed = ValidationResult::skipped("frequency_span", vec![claim.clone()]);
        failed.status = StepStatus::Failed;
        failed.claims = vec![ClaimResult::evaluate(&claim, 5.0.into())];
        let errored = ValidationResult::errored(
            "phase_lock",
            Vec::new(),
            ErrorRecord::panic("boom"),
            1.5,
        );

        let text = render_summary(&report(vec![failed, errored]));
        assert!(text.contains("frequency_span"));
        assert!(text.contains("0/1"));
        assert!(text.contains("orders_of_magnitude = 5"));
        assert!(text.contains("panic: boom"));
        assert!(text.contains("used representative table"));
        assert!(text.contains("2 steps"));
    }
}
