use resonance_categorical::TernaryDecomposition;
use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Recursive thirding partitions the categorical region completely.
#[derive(Debug, Clone, Copy, Default)]
pub struct TernaryDecompositionStep;

impl TernaryDecompositionStep {
    pub const NAME: &'static str = "ternary_decomposition";
}

impl ValidationStep for TernaryDecompositionStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Channel count, volume reconstruction and orthogonality of the decomposition"
    }

    fn claims(&self, config: &SessionConfig) -> Vec<Claim> {
        let expected = 3u64.saturating_pow(config.decomposition.depth);
        vec![
            Claim::equals("channel_count", expected),
            Claim::less_than("relative_volume_error", 0.01),
            Claim::at_least("orthogonality_rate", 0.99),
            Claim::equals("labels_unique", true),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let config = &ctx.config().decomposition;
        let depth = i32::try_from(config.depth)
            .map_err(|_| ResonanceError::invalid("depth", format!("{} is too large", config.depth)))?;
        let decomposition = TernaryDecomposition::new(config.region()?, depth)?;
        let audit = decomposition.audit(config.orthogonality_samples, config.seed);

        StepOutcome::new()
            .measure("channel_count", audit.channel_count)
            .measure("relative_volume_error", audit.relative_volume_error)
            .measure("orthogonality_rate", audit.orthogonality_rate())
            .measure("labels_unique", audit.labels_unique)
            .measure("mean_information_bits", audit.mean_information_bits)
            .with_details(&audit)
    }
}
