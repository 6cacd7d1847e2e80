//! Runtime audit of the metric-space laws and distance-based classification.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::tolerances::METRIC_EPS;

use crate::coordinate::CategoricalCoordinate;

/// Coordinate sets up to this size are checked on every triple.
const EXHAUSTIVE_TRIPLE_LIMIT: usize = 40;

/// First law a coordinate set broke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricViolation {
    pub law: String,
    pub details: String,
}

/// Counts of every metric-law check made over a coordinate set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricReport {
    pub points: usize,
    pub pairs_checked: usize,
    pub triples_checked: usize,
    /// Individual law evaluations: one identity check per point, symmetry
    /// and non-negativity per pair, three triangle orientations per triple.
    pub checks: usize,
    pub violations: usize,
    /// Largest `d(a,c) - d(a,b) - d(b,c)` seen.
    pub worst_triangle_slack: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_violation: Option<MetricViolation>,
}

impl MetricReport {
    /// Fraction of law evaluations that held; 1 when nothing was checked.
    pub fn pass_rate(&self) -> f64 {
        if self.checks == 0 {
            1.0
        } else {
            (self.checks - self.violations) as f64 / self.checks as f64
        }
    }

    /// # Errors
    /// `NumericInstability` naming the first violated law.
    pub fn ensure_holds(&self) -> ResonanceResult<()> {
        match &self.first_violation {
            None => Ok(()),
            Some(v) => Err(ResonanceError::instability(
                v.law.clone(),
                format!(
                    "{} ({} of {} checks failed)",
                    v.details, self.violations, self.checks
                ),
            )),
        }
    }

    fn record(&mut self, holds: bool, law: &str, details: impl FnOnce() -> String) {
        self.checks += 1;
        if holds {
            return;
        }
        self.violations += 1;
        if self.first_violation.is_none() {
            self.first_violation = Some(MetricViolation {
                law: law.to_string(),
                details: details(),
            });
        }
    }
}

/// Check identity, non-negativity, symmetry and the triangle inequality.
///
/// Every point and pair is checked. Triples are checked exhaustively for up
/// to 40 points, otherwise on `sampled_triples` seeded random triples. The
/// audit never stops early; use [`MetricReport::ensure_holds`] to turn a
/// violation into an error.
pub fn audit_metric_laws(
    coordinates: &[CategoricalCoordinate],
    sampled_triples: usize,
    seed: u64,
) -> MetricReport {
    let n = coordinates.len();
    let mut report = MetricReport {
        points: n,
        worst_triangle_slack: f64::NEG_INFINITY,
        ..Default::default()
    };

    for (i, a) in coordinates.iter().enumerate() {
        let self_distance = a.distance(a);
        report.record(self_distance.abs() <= METRIC_EPS, "metric_identity", || {
            format!("d(x{i}, x{i}) = {self_distance}")
        });
        for (j, b) in coordinates.iter().enumerate().skip(i + 1) {
            let ab = a.distance(b);
            let ba = b.distance(a);
            report.record(ab >= 0.0, "metric_non_negativity", || {
                format!("d(x{i}, x{j}) = {ab}")
            });
            report.record((ab - ba).abs() <= METRIC_EPS, "metric_symmetry", || {
                format!("d(x{i}, x{j}) = {ab} but d(x{j}, x{i}) = {ba}")
            });
            report.pairs_checked += 1;
        }
    }

    let mut check = |i: usize, j: usize, k: usize| {
        let (a, b, c) = (&coordinates[i], &coordinates[j], &coordinates[k]);
        for (x, y, z, label) in [(a, b, c, (i, j, k)), (b, c, a, (j, k, i)), (c, a, b, (k, i, j))] {
            let slack = x.distance(z) - x.distance(y) - y.distance(z);
            report.worst_triangle_slack = report.worst_triangle_slack.max(slack);
            report.record(slack <= METRIC_EPS, "metric_triangle_inequality", || {
                format!(
                    "d(x{}, x{}) exceeds d(x{}, x{}) + d(x{}, x{}) by {slack}",
                    label.0, label.2, label.0, label.1, label.1, label.2
                )
            });
        }
        report.triples_checked += 1;
    };

    if n >= 3 {
        if n <= EXHAUSTIVE_TRIPLE_LIMIT {
            for i in 0..n {
                for j in (i + 1)..n {
                    for k in (j + 1)..n {
                        check(i, j, k);
                    }
                }
            }
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..sampled_triples {
                let picked = rand::seq::index::sample(&mut rng, n, 3);
                check(picked.index(0), picked.index(1), picked.index(2));
            }
        }
    }

    if report.triples_checked == 0 {
        report.worst_triangle_slack = 0.0;
    }
    debug!(
        points = n,
        checks = report.checks,
        violations = report.violations,
        "metric laws audited"
    );
    report
}

/// Predicts that two coordinates "match" when their distance is below a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairClassifier {
    pub threshold: f64,
}

impl Default for PairClassifier {
    fn default() -> Self {
        Self { threshold: 5.0 }
    }
}

impl PairClassifier {
    pub fn new(threshold: f64) -> ResonanceResult<Self> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ResonanceError::invalid(
                "match_threshold",
                format!("must be finite and > 0, got {threshold}"),
            ));
        }
        Ok(Self { threshold })
    }

    pub fn predict(&self, a: &CategoricalCoordinate, b: &CategoricalCoordinate) -> bool {
        a.distance(b) < self.threshold
    }

    /// Fraction of `(a, b, expected)` cases predicted correctly; 0 for no cases.
    pub fn accuracy<'a, I>(&self, cases: I) -> f64
    where
        I: IntoIterator<Item = (&'a CategoricalCoordinate, &'a CategoricalCoordinate, bool)>,
    {
        let (correct, total) = cases.into_iter().fold((0usize, 0usize), |(c, t), (a, b, expected)| {
            (c + usize::from(self.predict(a, b) == expected), t + 1)
        });
        if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64
        }
    }
}

/// Draw `count` coordinates uniformly from the box `[lo, hi]` (seeded).
pub fn random_coordinates(count: usize, lo: [f64; 3], hi: [f64; 3], seed: u64) -> Vec<CategoricalCoordinate> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            CategoricalCoordinate::new(
                rng.gen_range(lo[0]..=hi[0]),
                rng.gen_range(lo[1]..=hi[1]),
                rng.gen_range(lo[2]..=hi[2]),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_small_set_exhaustive() {
        let coords = random_coordinates(10, [0.0; 3], [10.0; 3], 7);
        let report = audit_metric_laws(&coords, 100, 1);
        assert_eq!(report.pairs_checked, 45);
        assert_eq!(report.triples_checked, 120);
        assert_eq!(report.checks, 10 + 2 * 45 + 3 * 120);
        assert_eq!(report.violations, 0);
        assert_eq!(report.pass_rate(), 1.0);
        assert!(report.worst_triangle_slack <= METRIC_EPS);
        assert!(report.ensure_holds().is_ok());
    }

    #[test]
    fn test_audit_large_set_sampled() {
        let coords = random_coordinates(200, [-5.0; 3], [5.0; 3], 3);
        let report = audit_metric_laws(&coords, 500, 9);
        assert_eq!(report.triples_checked, 500);
        assert_eq!(report.pairs_checked, 200 * 199 / 2);
    }

    #[test]
    fn test_audit_detects_non_finite() {
        let coords = vec![
            CategoricalCoordinate::new(0.0, 0.0, 0.0),
            CategoricalCoordinate::new(f64::NAN, 0.0, 0.0),
        ];
        let report = audit_metric_laws(&coords, 10, 0);
        // NaN fails identity for x1 plus non-negativity and symmetry of the pair.
        assert_eq!(report.checks, 4);
        assert_eq!(report.violations, 3);
        assert!((report.pass_rate() - 0.25).abs() < 1e-12);
        assert_eq!(report.first_violation.as_ref().unwrap().law, "metric_identity");
        let err = report.ensure_holds().unwrap_err();
        assert_eq!(err.kind(), "numeric_instability");
        assert!(err.to_string().contains("3 of 4 checks failed"));
    }

    #[test]
    fn test_audit_degenerate_sets() {
        let empty = audit_metric_laws(&[], 10, 0);
        assert_eq!(empty.points, 0);
        assert_eq!(empty.pass_rate(), 1.0);
        let one = [CategoricalCoordinate::new(1.0, 2.0, 3.0)];
        let report = audit_metric_laws(&one, 10, 0);
        assert_eq!(report.triples_checked, 0);
        assert_eq!(report.worst_triangle_slack, 0.0);
    }

    #[test]
    fn test_pair_classifier_accuracy() {
        let a = CategoricalCoordinate::new(0.0, 0.0, 0.0);
        let near = CategoricalCoordinate::new(1.0, 0.0, 0.0);
        let far = CategoricalCoordinate::new(10.0, 0.0, 0.0);
        let clf = PairClassifier::default();
        assert!(clf.predict(&a, &near));
        assert!(!clf.predict(&a, &far));
        let cases = vec![(&a, &near, true), (&a, &far, false), (&a, &far, true)];
        assert!((clf.accuracy(cases) - 2.0 / 3.0).abs() < 1e-12);
        let none: Vec<(&CategoricalCoordinate, &CategoricalCoordinate, bool)> = Vec::new();
        assert_eq!(clf.accuracy(none), 0.0);
        assert!(PairClassifier::new(0.0).is_err());
    }
}
