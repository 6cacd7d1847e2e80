use serde::Serialize;
use tracing::debug;

use resonance_core::error::ResonanceResult;
use resonance_predict::{
    reference_response_cases, response_accuracy, GearRatioPredictor, GearRatioTable,
    GearStatistics, MultiScaleCascade, ResponseCheck,
};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Relative error below which a predicted response time counts as accurate.
const RESPONSE_TOLERANCE: f64 = 0.3;

/// Source frequency fed into the multi-scale cascade, Hz.
const CASCADE_SOURCE_HZ: f64 = 3.6e13;

/// Gear-ratio table statistics, cascade shape and response-time accuracy.
#[derive(Debug, Clone, Copy, Default)]
pub struct GearRatioStep;

impl GearRatioStep {
    pub const NAME: &'static str = "gear_ratio";
}

#[derive(Serialize)]
struct Details {
    statistics: GearStatistics,
    cascade: MultiScaleCascade,
    response_checks: Vec<ResponseCheck>,
}

impl ValidationStep for GearRatioStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Mean pathway gear ratio, cascade depth and predicted response times"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::within_relative("mean_gear_ratio", 2847.0, 0.5),
            Claim::equals("cascade_levels", 8),
            Claim::within_absolute("response_accuracy", 0.884, 0.15),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let gear = &ctx.config().gear;
        let table = GearRatioTable::from_config(gear)?;
        let statistics = table.statistics();

        let cascade = MultiScaleCascade::propagate(CASCADE_SOURCE_HZ, gear.cascade_level_ratio)?;

        let predictor = GearRatioPredictor::new(table);
        let response_checks =
            predictor.check_response_times(&reference_response_cases(), RESPONSE_TOLERANCE)?;
        let accuracy = response_accuracy(&response_checks);
        debug!(
            mean = statistics.mean,
            levels = cascade.level_count(),
            accuracy,
            "gear ratio analysis"
        );

        StepOutcome::new()
            .measure("mean_gear_ratio", statistics.mean)
            .measure("gear_ratio_std", statistics.std)
            .measure("cascade_levels", cascade.level_count())
            .measure("cascade_total_ratio", cascade.total_ratio())
            .measure("response_accuracy", accuracy)
            .with_details(&Details {
                statistics,
                cascade,
                response_checks,
            })
    }
}
