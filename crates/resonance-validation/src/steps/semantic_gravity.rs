use serde::Serialize;
use tracing::debug;

use resonance_categorical::gravity::{random_query, unit_targets};
use resonance_categorical::{
    complexity_reduction, navigate, rank_targets, ComplexityRow, NavigationSummary, TargetRanking,
};
use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Problem size at which the complexity speedup is claimed.
const SPEEDUP_REFERENCE_SIZE: u32 = 20;

/// Langevin navigation in a therapeutic landscape, complexity reduction and
/// zero-training target ranking.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemanticGravityStep;

impl SemanticGravityStep {
    pub const NAME: &'static str = "semantic_gravity";
}

#[derive(Serialize)]
struct Details {
    navigation: NavigationSummary,
    complexity: Vec<ComplexityRow>,
    query: Vec<f64>,
    rankings: Vec<TargetRanking>,
}

impl ValidationStep for SemanticGravityStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Navigation from disease to healthy attractor, O(n!) to O(log n) speedup, target ranking"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::greater_than("navigation_success_rate", 0.7),
            Claim::greater_than("log10_speedup_n20", 10.0),
            Claim::equals("ranked_targets", 3),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let gravity = &ctx.config().gravity;
        let navigation = navigate(gravity)?;

        let mut sizes = gravity.problem_sizes.clone();
        if !sizes.contains(&SPEEDUP_REFERENCE_SIZE) {
            sizes.push(SPEEDUP_REFERENCE_SIZE);
        }
        let complexity = complexity_reduction(&sizes);
        let reference = complexity
            .iter()
            .find(|row| row.problem_size == SPEEDUP_REFERENCE_SIZE)
            .map(|row| row.log10_speedup)
            .ok_or_else(|| {
                ResonanceError::instability("complexity_reduction", "reference size missing")
            })?;

        let query = random_query(gravity.dimensions, gravity.seed);
        let rankings = rank_targets(&query, &unit_targets(gravity.dimensions))?;
        debug!(
            success_rate = navigation.success_rate,
            log10_speedup = reference,
            top = rankings.first().map(|r| r.target.as_str()),
            "semantic gravity"
        );

        StepOutcome::new()
            .measure("navigation_success_rate", navigation.success_rate)
            .measure("navigation_trials", navigation.trials)
            .measure(
                "mean_navigation_time",
                navigation.mean_navigation_time.unwrap_or(f64::NAN),
            )
            .measure("mean_final_distance", navigation.mean_final_distance)
            .measure("log10_speedup_n20", reference)
            .measure("ranked_targets", rankings.len())
            .with_details(&Details {
                navigation,
                complexity,
                query,
                rankings,
            })
    }
}
