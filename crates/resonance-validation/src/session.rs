//! Session orchestration.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use rayon::prelude::*;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::{Frequency, FrequencySource, StaticFrequencySource};

use crate::config::SessionConfig;
use crate::report::{write_artifacts, write_report_atomic};
use crate::result::{
    ClaimResult, ErrorRecord, FrequencySourceRecord, ReportSummary, SessionReport, StepStatus,
    ValidationResult,
};
use crate::step::{Artifact, StepContext, ValidationStep};
use crate::steps::default_steps;

/// Owns a step registry, a frequency source and the effective configuration.
///
/// Steps run in registration order. A step that returns an error or panics
/// is recorded as errored and the session continues with the next step.
pub struct ValidationSession {
    config: SessionConfig,
    steps: Vec<Box<dyn ValidationStep>>,
    source: Box<dyn FrequencySource>,
}

impl std::fmt::Debug for ValidationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationSession")
            .field("steps", &self.step_names())
            .field("source", &self.source.name())
            .field("fast_mode", &self.config.fast_mode)
            .finish()
    }
}

impl ValidationSession {
    /// Empty session reading the representative frequency table.
    ///
    /// # Errors
    /// `InvalidParameter` when any component configuration is invalid.
    pub fn new(config: SessionConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            config: config.effective(),
            steps: Vec::new(),
            source: Box::new(StaticFrequencySource::representative()),
        })
    }

    /// Session with the eight built-in steps registered in declared order.
    pub fn with_default_steps(config: SessionConfig) -> ResonanceResult<Self> {
        let mut session = Self::new(config)?;
        for step in default_steps() {
            session.register(step)?;
        }
        Ok(session)
    }

    /// Replace the frequency source.
    #[must_use]
    pub fn with_source(mut self, source: impl FrequencySource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Append a step. Names must be unique within the session.
    pub fn register(&mut self, step: Box<dyn ValidationStep>) -> ResonanceResult<()> {
        if self.steps.iter().any(|s| s.name() == step.name()) {
            return Err(ResonanceError::invalid(
                "step",
                format!("'{}' is already registered", step.name()),
            ));
        }
        self.steps.push(step);
        Ok(())
    }

    /// The effective configuration the steps run with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Which registered steps run, in registration order.
    ///
    /// # Errors
    /// `InvalidParameter` for a name in `skip_steps` or `only_steps` that is
    /// not registered.
    pub fn selection(&self) -> ResonanceResult<Vec<bool>> {
        let known: HashSet<&str> = self.steps.iter().map(|s| s.name()).collect();
        for (parameter, names) in [
            ("skip_steps", &self.config.skip_steps),
            ("only_steps", &self.config.only_steps),
        ] {
            if let Some(unknown) = names.iter().find(|n| !known.contains(n.as_str())) {
                return Err(ResonanceError::invalid(
                    parameter,
                    format!("unknown step '{unknown}', expected one of {:?}", self.step_names()),
                ));
            }
        }

        let only = &self.config.only_steps;
        Ok(self
            .steps
            .iter()
            .map(|step| {
                let name = step.name();
                let wanted = only.is_empty() || only.iter().any(|n| n == name);
                wanted && !self.config.skip_steps.iter().any(|n| n == name)
            })
            .collect())
    }

    /// Run every registered step and assemble the report.
    ///
    /// Artifacts are written under the output directory when
    /// `retain_artifacts` is set; the report itself is not persisted.
    ///
    /// # Errors
    /// Selection errors, a failing fallback source and artifact I/O failures.
    /// Step failures never surface here.
    pub fn run(&self) -> ResonanceResult<SessionReport> {
        let selection = self.selection()?;
        let session_id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(
            %session_id,
            steps = self.steps.len(),
            fast_mode = self.config.fast_mode,
            parallel = self.config.parallel_steps,
            "starting validation session"
        );

        let (frequencies, frequency_source) = self.load_frequencies()?;
        let ctx = StepContext::new(&self.config, &frequencies);

        let executed: Vec<(ValidationResult, Vec<Artifact>)> = if self.config.parallel_steps {
            self.steps
                .par_iter()
                .zip(selection.par_iter())
                .map(|(step, &selected)| self.execute(step.as_ref(), selected, &ctx))
                .collect()
        } else {
            self.steps
                .iter()
                .zip(selection.iter())
                .map(|(step, &selected)| self.execute(step.as_ref(), selected, &ctx))
                .collect()
        };

        let mut steps = Vec::with_capacity(executed.len());
        for (mut result, artifacts) in executed {
            if self.config.retain_artifacts {
                result.artifacts =
                    write_artifacts(&self.config.output_dir, &result.step_name, &artifacts)?;
            }
            steps.push(result);
        }

        let summary = ReportSummary::from_results(&steps);
        if summary.all_passed() {
            info!(%session_id, "{summary}");
        } else {
            warn!(%session_id, "{summary}");
        }

        Ok(SessionReport {
            session_id,
            started_at,
            finished_at: Utc::now(),
            fast_mode: self.config.fast_mode,
            frequency_source,
            config: self.config.clone(),
            steps,
            summary,
        })
    }

    /// Run, then atomically persist the report in the output directory.
    pub fn run_and_persist(&self) -> ResonanceResult<(SessionReport, PathBuf)> {
        let report = self.run()?;
        let path = write_report_atomic(&report, &self.config.output_dir)?;
        Ok((report, path))
    }

    fn load_frequencies(&self) -> ResonanceResult<(Vec<Frequency>, FrequencySourceRecord)> {
        let name = self.source.name().to_string();
        let primary = self.source.frequencies().and_then(|f| {
            if f.is_empty() {
                Err(ResonanceError::Config(format!(
                    "frequency source '{name}' returned no frequencies"
                )))
            } else {
                Ok(f)
            }
        });

        match primary {
            Ok(frequencies) => {
                debug!(source = %name, count = frequencies.len(), "frequency source ready");
                let record = FrequencySourceRecord {
                    name,
                    count: frequencies.len(),
                    fallback: false,
                    error: None,
                };
                Ok((frequencies, record))
            }
            Err(e) => {
                warn!(source = %name, error = %e, "frequency source failed, using representative table");
                let frequencies = StaticFrequencySource::representative().frequencies()?;
                let record = FrequencySourceRecord {
                    name,
                    count: frequencies.len(),
                    fallback: true,
                    error: Some(ErrorRecord::from(&e)),
                };
                Ok((frequencies, record))
            }
        }
    }

    fn execute(
        &self,
        step: &dyn ValidationStep,
        selected: bool,
        ctx: &StepContext<'_>,
    ) -> (ValidationResult, Vec<Artifact>) {
        let name = step.name().to_string();
        let declared = step.claims(ctx.config());
        if !selected {
            debug!(step = %name, "skipped");
            return (ValidationResult::skipped(name, declared), Vec::new());
        }

        let timestamp = Utc::now();
        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| step.run(ctx)));
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outcome = match outcome {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                warn!(step = %name, kind = e.kind(), error = %e, "step errored");
                let record = ErrorRecord::from(&e);
                return (ValidationResult::errored(name, declared, record, duration_ms), Vec::new());
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(step = %name, panic = %message, "step panicked");
                let record = ErrorRecord::panic(message);
                return (ValidationResult::errored(name, declared, record, duration_ms), Vec::new());
            }
        };

        let evaluated = declared
            .iter()
            .map(|claim| {
                outcome
                    .measurement(&claim.name)
                    .map(|measured| ClaimResult::evaluate(claim, measured.clone()))
                    .ok_or_else(|| claim.name.clone())
            })
            .collect::<Result<Vec<_>, String>>();
        let claims = match evaluated {
            Ok(claims) => claims,
            Err(missing) => {
                let e = ResonanceError::instability(
                    "claim_measurement",
                    format!("step '{name}' reported no value for claim '{missing}'"),
                );
                warn!(step = %name, error = %e, "step errored");
                let record = ErrorRecord::from(&e);
                return (ValidationResult::errored(name, declared, record, duration_ms), Vec::new());
            }
        };

        let status = if claims.iter().all(|c| c.passed) {
            StepStatus::Passed
        } else {
            StepStatus::Failed
        };
        info!(
            step = %name,
            %status,
            claims_passed = claims.iter().filter(|c| c.passed).count(),
            claims = claims.len(),
            duration_ms,
            "step finished"
        );

        let result = ValidationResult {
            step_name: name,
            status,
            timestamp,
            duration_ms,
            claims,
            measurements: outcome.measurements,
            declared_claims: declared,
            details: outcome.details,
            artifacts: Vec::new(),
            error: None,
        };
        (result, outcome.artifacts)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::step::StepOutcome;

    struct Constant(&'static str, f64);

    impl ValidationStep for Constant {
        fn name(&self) -> &str {
            self.0
        }

        fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
            vec![Claim::greater_than("value", 1.0)]
        }

        fn run(&self, _ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
            Ok(StepOutcome::new().measure("value", self.1))
        }
    }

    fn session() -> ValidationSession {
        let mut session = ValidationSession::new(SessionConfig::default()).unwrap();
        session.register(Box::new(Constant("a", 2.0))).unwrap();
        session.register(Box::new(Constant("b", 0.5))).unwrap();
        session
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut s = session();
        let err = s.register(Box::new(Constant("a", 1.0))).unwrap_err();
        assert!(matches!(err, ResonanceError::InvalidParameter { .. }));
        assert_eq!(s.step_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_selection_honours_only_and_skip() {
        let mut s = session();
        s.config.only_steps = vec!["b".to_string()];
        assert_eq!(s.selection().unwrap(), vec![false, true]);
        s.config.only_steps.clear();
        s.config.skip_steps = vec!["a".to_string()];
        assert_eq!(s.selection().unwrap(), vec![false, true]);
        s.config.skip_steps = vec!["nope".to_string()];
        assert!(s.selection().is_err());
    }

    #[test]
    fn test_pass_and_fail_statuses() {
        let report = session().run().unwrap();
        assert_eq!(report.step_names(), vec!["a", "b"]);
        assert_eq!(report.steps[0].status, StepStatus::Passed);
        assert_eq!(report.steps[1].status, StepStatus::Failed);
        assert_eq!(report.summary.claims_total, 2);
        assert_eq!(report.summary.claims_passed, 1);
        assert!(!report.frequency_source.fallback);
    }

    #[test]
    fn test_panic_message_extraction() {
        let boxed: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");
        let boxed: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }
}
