//! Built-in validation steps, in declared order.

mod categorical_mapping;
mod categorical_state;
mod combined_prediction;
mod enhancement_cascade;
mod frequency_span;
mod gear_ratio;
mod harmonic_network;
mod phase_lock;
mod semantic_gravity;
mod ternary_decomposition;

pub use categorical_mapping::CategoricalMappingStep;
pub use categorical_state::CategoricalStateStep;
pub use combined_prediction::CombinedPredictionStep;
pub use enhancement_cascade::EnhancementCascadeStep;
pub use frequency_span::FrequencySpanStep;
pub use gear_ratio::GearRatioStep;
pub use harmonic_network::HarmonicNetworkStep;
pub use phase_lock::PhaseLockStep;
pub use semantic_gravity::SemanticGravityStep;
pub use ternary_decomposition::TernaryDecompositionStep;

use crate::step::ValidationStep;

/// Names of the built-in steps in the order they run and are reported.
pub const DEFAULT_STEP_NAMES: [&str; 10] = [
    FrequencySpanStep::NAME,
    HarmonicNetworkStep::NAME,
    CategoricalMappingStep::NAME,
    TernaryDecompositionStep::NAME,
    PhaseLockStep::NAME,
    GearRatioStep::NAME,
    CombinedPredictionStep::NAME,
    EnhancementCascadeStep::NAME,
    SemanticGravityStep::NAME,
    CategoricalStateStep::NAME,
];

pub fn default_steps() -> Vec<Box<dyn ValidationStep>> {
    vec![
        Box::new(FrequencySpanStep),
        Box::new(HarmonicNetworkStep),
        Box::new(CategoricalMappingStep),
        Box::new(TernaryDecompositionStep),
        Box::new(PhaseLockStep),
        Box::new(GearRatioStep),
        Box::new(CombinedPredictionStep),
        Box::new(EnhancementCascadeStep),
        Box::new(SemanticGravityStep),
        Box::new(CategoricalStateStep),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_steps_match_names() {
        let names: Vec<String> = default_steps().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(names, DEFAULT_STEP_NAMES);
    }
}
