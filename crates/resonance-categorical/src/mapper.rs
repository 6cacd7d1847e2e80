//! Frequency → categorical coordinate mapping.
//!
//! - **knowledge**: log2 of the thermally accessible share of the reference
//!   states, `log2(p · N)` with `p = 1 / (1 + exp(ħω / k_B T))`, clamped to
//!   `[0, log2 N]`.
//! - **time**: `log10(τ)` of the equilibration time τ (defaults to `1/f`).
//! - **entropy**: Shannon entropy in bits of the normalized phase
//!   distribution (defaults to a wrapped Gaussian whose spread grows with
//!   frequency up to the coherence scale).
//!
//! The mapping is a pure function of its inputs.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::Frequency;

use crate::config::MapperConfig;
use crate::coordinate::CategoricalCoordinate;

/// Reduced Planck constant, J·s.
pub const HBAR: f64 = 1.054_571_817e-34;
/// Boltzmann constant, J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Minimum spread of the default phase distribution, radians.
const MIN_PHASE_SPREAD: f64 = 1e-3;

/// Contextual inputs of one mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingContext {
    /// Equilibration time estimate in seconds; `None` means `1/f`.
    pub equilibration_time_s: Option<f64>,
    /// Non-negative weights of a reference phase distribution; `None` means
    /// the default wrapped Gaussian. Normalized before use.
    pub phase_distribution: Option<Vec<f64>>,
}

impl MappingContext {
    pub fn with_equilibration_time(mut self, seconds: f64) -> Self {
        self.equilibration_time_s = Some(seconds);
        self
    }

    pub fn with_phase_distribution(mut self, weights: Vec<f64>) -> Self {
        self.phase_distribution = Some(weights);
        self
    }
}

/// Deterministic frequency → coordinate mapper.
#[derive(Debug, Clone)]
pub struct CategoricalMapper {
    config: MapperConfig,
}

impl CategoricalMapper {
    pub fn new(config: MapperConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Upper bound of the knowledge axis, `log2 N`.
    pub fn max_knowledge(&self) -> f64 {
        f64::from(self.config.reference_states).log2()
    }

    /// Map with the default context.
    pub fn map_frequency(&self, frequency: &Frequency) -> ResonanceResult<CategoricalCoordinate> {
        self.map(frequency, &MappingContext::default())
    }

    pub fn map(
        &self,
        frequency: &Frequency,
        context: &MappingContext,
    ) -> ResonanceResult<CategoricalCoordinate> {
        let knowledge = self.knowledge(frequency);

        let tau = match context.equilibration_time_s {
            Some(t) if t.is_finite() && t > 0.0 => t,
            Some(t) => {
                return Err(ResonanceError::invalid(
                    "equilibration_time_s",
                    format!("must be finite and > 0, got {t}"),
                ))
            }
            None => frequency.period(),
        };

        let distribution = match &context.phase_distribution {
            Some(weights) => normalize(weights)?,
            None => self.default_phase_distribution(frequency),
        };

        let coordinate =
            CategoricalCoordinate::new(knowledge, tau.log10(), shannon_entropy_bits(&distribution));
        if !coordinate.is_finite() {
            return Err(ResonanceError::instability(
                "categorical_mapping",
                format!("non-finite coordinate {coordinate:?} for {} Hz", frequency.hz()),
            ));
        }
        Ok(coordinate)
    }

    /// Bounded information score in `[0, log2 N]`.
    pub fn knowledge(&self, frequency: &Frequency) -> f64 {
        let kt = BOLTZMANN * self.config.temperature_kelvin;
        let x = HBAR * frequency.angular() / kt;
        let accessible = logistic_complement(x) * f64::from(self.config.reference_states);
        if accessible > 1.0 {
            accessible.log2().min(self.max_knowledge())
        } else {
            0.0
        }
    }

    /// Wrapped Gaussian phase histogram centred on zero.
    pub fn default_phase_distribution(&self, frequency: &Frequency) -> Vec<f64> {
        let bins = self.config.phase_bins;
        let spread = PI * (frequency.hz() / self.config.coherence_scale_hz).min(1.0) + MIN_PHASE_SPREAD;
        let width = 2.0 * PI / bins as f64;
        let centres: Vec<f64> = (0..bins).map(|b| -PI + (b as f64 + 0.5) * width).collect();
        // Work relative to the closest centre so narrow spreads do not underflow.
        let nearest = centres.iter().map(|c| c * c).fold(f64::INFINITY, f64::min);
        let weights: Vec<f64> = centres
            .iter()
            .map(|c| (-(c * c - nearest) / (2.0 * spread * spread)).exp())
            .collect();
        let total: f64 = weights.iter().sum();
        weights.into_iter().map(|w| w / total).collect()
    }
}

/// 1 / (1 + e^x), stable for large |x|.
fn logistic_complement(x: f64) -> f64 {
    if x >= 0.0 {
        let e = (-x).exp();
        e / (1.0 + e)
    } else {
        1.0 / (1.0 + x.exp())
    }
}

fn normalize(weights: &[f64]) -> ResonanceResult<Vec<f64>> {
    if weights.is_empty() {
        return Err(ResonanceError::invalid("phase_distribution", "must not be empty"));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(ResonanceError::invalid(
            "phase_distribution",
            format!("weights must be finite and >= 0, found {bad}"),
        ));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ResonanceError::invalid("phase_distribution", "weights sum to zero"));
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

/// Shannon entropy in bits of a normalized distribution.
pub fn shannon_entropy_bits(p: &[f64]) -> f64 {
    p.iter()
        .filter(|&&x| x > 0.0)
        .map(|&x| -x * x.log2())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CategoricalMapper {
        CategoricalMapper::new(MapperConfig::default()).unwrap()
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let f = Frequency::new(3.5e9).unwrap();
        let a = mapper().map_frequency(&f).unwrap();
        let b = mapper().map_frequency(&f).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_knowledge_bounds() {
        let m = mapper();
        for hz in [1e-4, 1.0, 3.5e9, 1e12, 6.4e14, 1e20] {
            let k = m.knowledge(&Frequency::new(hz).unwrap());
            assert!((0.0..=m.max_knowledge()).contains(&k), "{hz} Hz -> {k}");
        }
        // Low frequencies keep about half the reference states accessible.
        let low = m.knowledge(&Frequency::new(1.0).unwrap());
        assert!((low - (25110.0f64 / 2.0).log2()).abs() < 1e-6);
        // Optical frequencies are thermally frozen out.
        assert_eq!(m.knowledge(&Frequency::new(6.4e14).unwrap()), 0.0);
    }

    #[test]
    fn test_time_axis_defaults_to_period() {
        let c = mapper().map_frequency(&Frequency::new(1e3).unwrap()).unwrap();
        assert!((c.time + 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_axis_uses_context() {
        let ctx = MappingContext::default().with_equilibration_time(100.0);
        let c = mapper().map(&Frequency::new(1e3).unwrap(), &ctx).unwrap();
        assert!((c.time - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_entropy_of_uniform_context() {
        let ctx = MappingContext::default().with_phase_distribution(vec![2.0; 8]);
        let c = mapper().map(&Frequency::new(1.0).unwrap(), &ctx).unwrap();
        assert!((c.entropy - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_distribution_normalized_and_widening() {
        let m = mapper();
        let narrow = m.default_phase_distribution(&Frequency::new(1.0).unwrap());
        let wide = m.default_phase_distribution(&Frequency::new(1e13).unwrap());
        assert!((narrow.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((wide.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(shannon_entropy_bits(&wide) > shannon_entropy_bits(&narrow));
        assert!(narrow.iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_invalid_context_rejected() {
        let f = Frequency::new(10.0).unwrap();
        let m = mapper();
        let bad_time = MappingContext::default().with_equilibration_time(0.0);
        assert!(matches!(
            m.map(&f, &bad_time),
            Err(ResonanceError::InvalidParameter { .. })
        ));
        let negative = MappingContext::default().with_phase_distribution(vec![1.0, -1.0]);
        assert!(m.map(&f, &negative).is_err());
        let zero = MappingContext::default().with_phase_distribution(vec![0.0, 0.0]);
        assert!(m.map(&f, &zero).is_err());
        let empty = MappingContext::default().with_phase_distribution(vec![]);
        assert!(m.map(&f, &empty).is_err());
    }

    #[test]
    fn test_logistic_complement_extremes() {
        assert_eq!(logistic_complement(0.0), 0.5);
        assert!(logistic_complement(1000.0) >= 0.0);
        assert!((logistic_complement(-1000.0) - 1.0).abs() < 1e-12);
    }
}
