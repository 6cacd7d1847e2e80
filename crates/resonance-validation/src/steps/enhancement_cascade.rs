use serde::Serialize;

use resonance_core::error::ResonanceResult;
use resonance_predict::{EnhancementCascade, EnhancementReport};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Temporal resolution reached by stacking the graph, channel and cascade
/// enhancement factors.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnhancementCascadeStep;

impl EnhancementCascadeStep {
    pub const NAME: &'static str = "enhancement_cascade";
}

#[derive(Serialize)]
struct Details {
    cascade: EnhancementCascade,
    report: EnhancementReport,
}

impl ValidationStep for EnhancementCascadeStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Combined enhancement factor and resolution below Planck time"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![Claim::greater_than("orders_below_planck", 20.0)]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let graph_factor = ctx.network()?.statistics.enhancement_factor;
        let channel_factor = 3f64.powf(f64::from(ctx.config().decomposition.depth));
        let cascade = EnhancementCascade::new(graph_factor, channel_factor);
        let report = cascade.evaluate()?;

        StepOutcome::new()
            .measure("total_enhancement", report.total_factor)
            .measure("effective_frequency_hz", report.effective_frequency_hz)
            .measure("temporal_resolution_s", report.temporal_resolution_s)
            .measure("orders_below_planck", report.orders_below_planck)
            .with_details(&Details { cascade, report })
    }
}
