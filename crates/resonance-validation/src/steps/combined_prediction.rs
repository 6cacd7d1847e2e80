use serde::Serialize;
use tracing::debug;

use resonance_categorical::CategoricalMapper;
use resonance_core::error::ResonanceResult;
use resonance_core::Frequency;
use resonance_predict::{reference_compounds, CombinedInput, CombinedPrediction, CombinedPredictor};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Absolute efficacy error below which a prediction counts as correct.
const EFFICACY_TOLERANCE: f64 = 0.3;

/// Combined frequency, coherence and categorical-distance efficacy prediction
/// against compounds of known efficacy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombinedPredictionStep;

impl CombinedPredictionStep {
    pub const NAME: &'static str = "combined_prediction";
}

#[derive(Serialize)]
struct CompoundResult {
    name: String,
    known_efficacy: f64,
    categorical_distance: f64,
    prediction: CombinedPrediction,
    absolute_error: f64,
    correct: bool,
}

impl ValidationStep for CombinedPredictionStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Efficacy predictions for reference compounds"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![Claim::within_absolute("efficacy_accuracy", 0.884, 0.15)]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let config = ctx.config();
        let mapper = CategoricalMapper::new(config.mapper.clone())?;
        let predictor = CombinedPredictor::new(config.combined.clone())?;

        let results = reference_compounds()
            .into_iter()
            .map(|compound| {
                let target = predictor.target(&compound.pathway)?;
                let source = mapper.map_frequency(&Frequency::new(compound.frequency_hz)?)?;
                let reference = mapper.map_frequency(&Frequency::new(target.target_hz)?)?;
                let categorical_distance = source.distance(&reference);

                let prediction = predictor.predict(&CombinedInput {
                    source_hz: compound.frequency_hz,
                    pathway: compound.pathway.clone(),
                    coherence: None,
                    categorical_distance,
                })?;
                let absolute_error = (prediction.efficacy - compound.known_efficacy).abs();
                debug!(
                    compound = %compound.name,
                    predicted = prediction.efficacy,
                    known = compound.known_efficacy,
                    "compound efficacy"
                );
                Ok(CompoundResult {
                    name: compound.name,
                    known_efficacy: compound.known_efficacy,
                    categorical_distance,
                    prediction,
                    absolute_error,
                    correct: absolute_error < EFFICACY_TOLERANCE,
                })
            })
            .collect::<ResonanceResult<Vec<_>>>()?;

        let correct = results.iter().filter(|r| r.correct).count();
        let accuracy = if results.is_empty() {
            0.0
        } else {
            correct as f64 / results.len() as f64
        };
        let mean_error = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.absolute_error).sum::<f64>() / results.len() as f64
        };

        StepOutcome::new()
            .measure("efficacy_accuracy", accuracy)
            .measure("mean_absolute_error", mean_error)
            .measure("compounds", results.len())
            .with_details(&results)
    }
}
