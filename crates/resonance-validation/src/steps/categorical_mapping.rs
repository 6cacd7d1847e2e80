use serde::Serialize;
use tracing::warn;

use resonance_categorical::{
    audit_metric_laws, CategoricalCoordinate, CategoricalMapper, MetricReport, PairClassifier,
};
use resonance_core::error::ResonanceResult;
use resonance_core::Frequency;

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Triples sampled when the coordinate set is too large to check exhaustively.
const SAMPLED_TRIPLES: usize = 10_000;

/// (a Hz, b Hz, expected match)
const LABELED_PAIRS: [(f64, f64, bool); 4] = [
    (5.25e13, 5.25e13, true),
    (3.6e13, 3.6e13, true),
    (4.5e13, 4.5e13, true),
    (1e12, 1e14, false),
];

/// Frequency → categorical coordinate mapping obeys the metric laws and
/// separates matching from non-matching pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalMappingStep;

impl CategoricalMappingStep {
    pub const NAME: &'static str = "categorical_mapping";
}

#[derive(Serialize)]
struct MappedSource {
    label: String,
    frequency_hz: f64,
    coordinate: CategoricalCoordinate,
}

#[derive(Serialize)]
struct Details {
    metric: MetricReport,
    max_knowledge: f64,
    knowledge_range: [f64; 2],
    coordinates: Vec<MappedSource>,
}

impl ValidationStep for CategoricalMappingStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Categorical coordinates of the sources and distance-based matching"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::equals("metric_pass_rate", 1.0),
            Claim::greater_than("knowledge_richness", 0.5),
            Claim::greater_than("pair_accuracy", 0.75),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let mapper = CategoricalMapper::new(ctx.config().mapper.clone())?;
        let coordinates = ctx
            .frequencies()
            .iter()
            .map(|f| mapper.map_frequency(f))
            .collect::<ResonanceResult<Vec<_>>>()?;

        let metric = audit_metric_laws(&coordinates, SAMPLED_TRIPLES, ctx.seed());
        let pass_rate = metric.pass_rate();
        if metric.violations > 0 {
            warn!(
                pass_rate,
                violations = metric.violations,
                checks = metric.checks,
                "categorical coordinates break the metric laws"
            );
        }
        // A broken metric errors the step rather than failing the claim.
        metric.ensure_holds()?;

        let (lo, hi) = coordinates
            .iter()
            .map(|c| c.knowledge)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), k| (lo.min(k), hi.max(k)));
        let knowledge_range = if coordinates.is_empty() { [0.0, 0.0] } else { [lo, hi] };
        let richness = (knowledge_range[1] - knowledge_range[0]) / mapper.max_knowledge();

        let classifier = PairClassifier::default();
        let labeled = LABELED_PAIRS
            .iter()
            .map(|&(a, b, expected)| {
                Ok((
                    mapper.map_frequency(&Frequency::new(a)?)?,
                    mapper.map_frequency(&Frequency::new(b)?)?,
                    expected,
                ))
            })
            .collect::<ResonanceResult<Vec<_>>>()?;
        let accuracy = classifier.accuracy(labeled.iter().map(|(a, b, e)| (a, b, *e)));

        let mapped = ctx
            .frequencies()
            .iter()
            .zip(&coordinates)
            .map(|(f, c)| MappedSource {
                label: f.display_label(),
                frequency_hz: f.hz(),
                coordinate: *c,
            })
            .collect();

        StepOutcome::new()
            .measure("metric_pass_rate", pass_rate)
            .measure("metric_checks", metric.checks)
            .measure("knowledge_richness", richness)
            .measure("pair_accuracy", accuracy)
            .measure("pairs_checked", metric.pairs_checked)
            .measure("triples_checked", metric.triples_checked)
            .with_details(&Details {
                metric,
                max_knowledge: mapper.max_knowledge(),
                knowledge_range,
                coordinates: mapped,
            })
    }
}
