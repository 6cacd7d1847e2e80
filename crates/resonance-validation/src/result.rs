//! Step results and the session report.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resonance_core::error::ResonanceError;
use resonance_core::Numeric;

use crate::claim::{Claim, Comparator};
use crate::config::SessionConfig;

/// Outcome of one step.
///
/// `Failed` means the computation finished and a claim was not met;
/// `Errored` means the computation itself broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Passed,
    Failed,
    Errored,
    Skipped,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Passed => "passed",
            StepStatus::Failed => "failed",
            StepStatus::Errored => "errored",
            StepStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable form of a computation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub kind: String,
    pub message: String,
}

impl ErrorRecord {
    /// Record for a step that panicked instead of returning an error.
    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            kind: "panic".to_string(),
            message: message.into(),
        }
    }
}

impl From<&ResonanceError> for ErrorRecord {
    fn from(err: &ResonanceError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

/// One evaluated claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimResult {
    pub name: String,
    pub comparator: Comparator,
    pub threshold: Numeric,
    pub measured: Numeric,
    pub passed: bool,
}

impl ClaimResult {
    pub fn evaluate(claim: &Claim, measured: Numeric) -> Self {
        Self {
            name: claim.name.clone(),
            comparator: claim.comparator,
            threshold: claim.threshold.clone(),
            passed: claim.evaluate(&measured),
            measured,
        }
    }
}

/// Result of one declared step. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub step_name: String,
    pub status: StepStatus,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: f64,
    /// Evaluated claims; empty for skipped and errored steps.
    pub claims: Vec<ClaimResult>,
    /// Every measurement the step reported, including ones without a claim.
    pub measurements: Vec<(String, Numeric)>,
    /// Declared claims, kept for steps that did not produce measurements.
    pub declared_claims: Vec<Claim>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

impl ValidationResult {
    pub fn skipped(step_name: impl Into<String>, declared_claims: Vec<Claim>) -> Self {
        Self {
            step_name: step_name.into(),
            status: StepStatus::Skipped,
            timestamp: Utc::now(),
            duration_ms: 0.0,
            claims: Vec::new(),
            measurements: Vec::new(),
            declared_claims,
            details: serde_json::Value::Null,
            artifacts: Vec::new(),
            error: None,
        }
    }

    pub fn errored(
        step_name: impl Into<String>,
        declared_claims: Vec<Claim>,
        error: ErrorRecord,
        duration_ms: f64,
    ) -> Self {
        Self {
            status: StepStatus::Errored,
            duration_ms,
            error: Some(error),
            ..Self::skipped(step_name, declared_claims)
        }
    }

    pub fn claims_passed(&self) -> usize {
        self.claims.iter().filter(|c| c.passed).count()
    }

    pub fn measurement(&self, name: &str) -> Option<&Numeric> {
        self.measurements
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Where the base frequencies came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencySourceRecord {
    pub name: String,
    pub count: usize,
    /// True when the configured source failed and the representative table
    /// was used instead.
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

/// Explicit counts over the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub skipped: usize,
    pub claims_total: usize,
    pub claims_passed: usize,
    pub claims_failed: usize,
}

impl ReportSummary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            match result.status {
                StepStatus::Passed => summary.passed += 1,
                StepStatus::Failed => summary.failed += 1,
                StepStatus::Errored => summary.errored += 1,
                StepStatus::Skipped => summary.skipped += 1,
            }
            let passed = result.claims_passed();
            summary.claims_total += result.claims.len();
            summary.claims_passed += passed;
            summary.claims_failed += result.claims.len() - passed;
        }
        summary
    }

    /// Nothing failed or errored.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} steps: {} passed, {} failed, {} errored, {} skipped | claims {}/{} passed",
            self.total,
            self.passed,
            self.failed,
            self.errored,
            self.skipped,
            self.claims_passed,
            self.claims_total
        )
    }
}

/// Aggregated output of one session, in declared step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub fast_mode: bool,
    pub frequency_source: FrequencySourceRecord,
    pub config: SessionConfig,
    pub steps: Vec<ValidationResult>,
    pub summary: ReportSummary,
}

impl SessionReport {
    pub fn step(&self, name: &str) -> Option<&ValidationResult> {
        self.steps.iter().find(|s| s.step_name == name)
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.step_name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with(status: StepStatus, claims: Vec<bool>) -> ValidationResult {
        let mut result = ValidationResult::skipped("step", Vec::new());
        result.status = status;
        result.claims = claims
            .into_iter()
            .map(|passed| ClaimResult {
                name: "c".into(),
                comparator: Comparator::GreaterThan,
                threshold: Numeric::Float(0.0),
                measured: Numeric::Float(1.0),
                passed,
            })
            .collect();
        result
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result_with(StepStatus::Passed, vec![true, true]),
            result_with(StepStatus::Failed, vec![true, false]),
            result_with(StepStatus::Errored, vec![]),
            result_with(StepStatus::Skipped, vec![]),
        ];
        let summary = ReportSummary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(
            (summary.passed, summary.failed, summary.errored, summary.skipped),
            (1, 1, 1, 1)
        );
        assert_eq!(summary.claims_total, 4);
        assert_eq!(summary.claims_passed, 3);
        assert_eq!(summary.claims_failed, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_claim_result_evaluation() {
        let claim = Claim::greater_than("sigma", 1.0);
        assert!(ClaimResult::evaluate(&claim, Numeric::Float(2.0)).passed);
        let failed = ClaimResult::evaluate(&claim, Numeric::Float(f64::NAN));
        assert!(!failed.passed);
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["measured"], "NaN");
    }

    #[test]
    fn test_errored_result_serialization() {
        let err = ResonanceError::instability("order_parameter_bounds", "R = 1.2");
        let result = ValidationResult::errored("phase_lock", Vec::new(), ErrorRecord::from(&err), 1.5);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "errored");
        assert_eq!(json["error"]["kind"], "numeric_instability");
        assert!(json["timestamp"].as_str().is_some());
        assert!(json.get("artifacts").is_none());
    }
}
