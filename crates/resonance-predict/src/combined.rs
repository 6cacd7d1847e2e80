//! Combined efficacy prediction.
//!
//! efficacy = match × R × exp(−d / d₀), clamped to [0, 1], where
//! `match = exp(−Δf² / 2σ²)` compares the source frequency with the pathway
//! target, R is a phase coherence and d a categorical distance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::config::{CombinedConfig, PathwayTarget};
use crate::gear::GearPrediction;

/// Inputs of one combined prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedInput {
    pub source_hz: f64,
    pub pathway: String,
    /// Phase coherence R in [0, 1]; `None` uses the configured assumption.
    pub coherence: Option<f64>,
    /// Categorical distance between source and target coordinates.
    pub categorical_distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedPrediction {
    pub pathway: String,
    pub target_hz: f64,
    pub frequency_match: f64,
    pub coherence: f64,
    pub distance_factor: f64,
    pub efficacy: f64,
    pub gear: GearPrediction,
}

#[derive(Debug, Clone)]
pub struct CombinedPredictor {
    config: CombinedConfig,
}

impl CombinedPredictor {
    pub fn new(config: CombinedConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CombinedConfig {
        &self.config
    }

    /// # Errors
    /// `UnknownPathway` when the pathway has no configured target.
    pub fn target(&self, pathway: &str) -> ResonanceResult<PathwayTarget> {
        self.config
            .targets
            .get(pathway)
            .copied()
            .ok_or_else(|| ResonanceError::UnknownPathway(pathway.to_string()))
    }

    /// Gaussian match of `source_hz` against `target_hz`.
    pub fn frequency_match(&self, source_hz: f64, target_hz: f64) -> f64 {
        let sigma = self.config.resonance_width_hz;
        let delta = source_hz - target_hz;
        (-(delta * delta) / (2.0 * sigma * sigma)).exp()
    }

    pub fn predict(&self, input: &CombinedInput) -> ResonanceResult<CombinedPrediction> {
        let target = self.target(&input.pathway)?;
        let coherence = input.coherence.unwrap_or(self.config.assumed_coherence);
        if !(0.0..=1.0).contains(&coherence) {
            return Err(ResonanceError::invalid(
                "coherence",
                format!("must lie in [0, 1], got {coherence}"),
            ));
        }
        if !input.categorical_distance.is_finite() || input.categorical_distance < 0.0 {
            return Err(ResonanceError::invalid(
                "categorical_distance",
                format!("must be finite and >= 0, got {}", input.categorical_distance),
            ));
        }

        let gear = GearPrediction::compute(&input.pathway, target.gear_ratio, input.source_hz)?;
        let frequency_match = self.frequency_match(input.source_hz, target.target_hz);
        let distance_factor = (-input.categorical_distance / self.config.distance_scale).exp();
        let efficacy = (frequency_match * coherence * distance_factor).clamp(0.0, 1.0);

        debug!(
            pathway = %input.pathway,
            frequency_match,
            distance_factor,
            efficacy,
            "combined prediction"
        );

        Ok(CombinedPrediction {
            pathway: input.pathway.clone(),
            target_hz: target.target_hz,
            frequency_match,
            coherence,
            distance_factor,
            efficacy,
            gear,
        })
    }
}

/// A compound with a known efficacy in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCompound {
    pub name: String,
    pub frequency_hz: f64,
    pub pathway: String,
    pub known_efficacy: f64,
}

/// The ten reference compounds, keyed to the default pathway targets.
pub fn reference_compounds() -> Vec<ReferenceCompound> {
    [
        ("Aspirin", 5.25e13, "COX", 0.95),
        ("Ibuprofen", 5.15e13, "COX", 0.90),
        ("Fluoxetine", 3.6e13, "Serotonin", 0.80),
        ("Sertraline", 3.65e13, "Serotonin", 0.75),
        ("Dopamine_Agonist", 4.5e13, "Dopamine", 0.85),
        ("Benzodiazepine", 3.2e13, "GABA", 0.88),
        ("Acetylcholine_Agonist", 3.8e13, "Acetylcholine", 0.70),
        ("Lithium", 3.0e13, "Multiple", 0.65),
        ("Antipsychotic", 4.0e13, "Dopamine", 0.72),
        ("Non_therapeutic_control", 1e14, "None", 0.05),
    ]
    .into_iter()
    .map(|(name, frequency_hz, pathway, known_efficacy)| ReferenceCompound {
        name: name.to_string(),
        frequency_hz,
        pathway: pathway.to_string(),
        known_efficacy,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> CombinedPredictor {
        CombinedPredictor::new(CombinedConfig::default()).unwrap()
    }

    fn input(source_hz: f64, pathway: &str, distance: f64) -> CombinedInput {
        CombinedInput {
            source_hz,
            pathway: pathway.to_string(),
            coherence: None,
            categorical_distance: distance,
        }
    }

    #[test]
    fn test_exact_match_scales_by_coherence() {
        let p = predictor().predict(&input(5.25e13, "COX", 0.0)).unwrap();
        assert_eq!(p.frequency_match, 1.0);
        assert!((p.efficacy - 0.9).abs() < 1e-12);
        assert_eq!(p.gear.predicted_hz, 892.0 * 5.25e13);
    }

    #[test]
    fn test_one_sigma_mismatch() {
        let p = predictor().predict(&input(5.15e13, "COX", 0.0)).unwrap();
        assert!((p.frequency_match - (-0.5f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn test_distance_penalty() {
        let near = predictor().predict(&input(3.6e13, "Serotonin", 0.0)).unwrap();
        let far = predictor().predict(&input(3.6e13, "Serotonin", 5.0)).unwrap();
        assert!((far.efficacy - near.efficacy * (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_efficacy_in_unit_interval() {
        let predictor = predictor();
        for c in reference_compounds() {
            let p = predictor.predict(&input(c.frequency_hz, &c.pathway, 0.1)).unwrap();
            assert!((0.0..=1.0).contains(&p.efficacy), "{}: {}", c.name, p.efficacy);
        }
    }

    #[test]
    fn test_errors() {
        let p = predictor();
        assert_eq!(
            p.predict(&input(1.0, "Unknown", 0.0)).unwrap_err().kind(),
            "unknown_pathway"
        );
        let mut bad = input(1.0, "COX", 0.0);
        bad.coherence = Some(1.5);
        assert_eq!(p.predict(&bad).unwrap_err().kind(), "invalid_parameter");
        assert!(p.predict(&input(1.0, "COX", -1.0)).is_err());
    }
}
