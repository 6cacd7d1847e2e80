use serde::Serialize;

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::{FrequencySpan, ScaleCoverage};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// The base frequencies span the biological hierarchy.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencySpanStep;

impl FrequencySpanStep {
    pub const NAME: &'static str = "frequency_span";
}

#[derive(Serialize)]
struct Details<'a> {
    span: &'a FrequencySpan,
    coverage: &'a ScaleCoverage,
}

impl ValidationStep for FrequencySpanStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Frequency range and biological scale coverage of the sources"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::at_least("orders_of_magnitude", 11.0),
            Claim::at_least("scales_covered", 6),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let frequencies = ctx.frequencies();
        let span = FrequencySpan::of(frequencies)
            .ok_or_else(|| ResonanceError::invalid("frequencies", "no base frequencies"))?;
        let coverage = ScaleCoverage::of(frequencies);

        StepOutcome::new()
            .measure("orders_of_magnitude", span.orders_of_magnitude)
            .measure("scales_covered", coverage.scales_covered())
            .measure("source_count", frequencies.len())
            .with_details(&Details {
                span: &span,
                coverage: &coverage,
            })
    }
}
