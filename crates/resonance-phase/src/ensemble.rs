//! Seeded oscillator populations.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Initial phases and natural frequencies of N oscillators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OscillatorEnsemble {
    pub initial_phases: Vec<f64>,
    pub natural_frequencies: Vec<f64>,
}

impl OscillatorEnsemble {
    pub fn new(initial_phases: Vec<f64>, natural_frequencies: Vec<f64>) -> ResonanceResult<Self> {
        if initial_phases.len() != natural_frequencies.len() {
            return Err(ResonanceError::invalid(
                "natural_frequencies",
                format!(
                    "expected {} entries, got {}",
                    initial_phases.len(),
                    natural_frequencies.len()
                ),
            ));
        }
        Ok(Self {
            initial_phases,
            natural_frequencies,
        })
    }

    /// ω ~ Normal(mean, std), θ ~ U(−π, π), reproducible from `seed`.
    pub fn random(n: usize, mean: f64, std: f64, seed: u64) -> ResonanceResult<Self> {
        if n == 0 {
            return Err(ResonanceError::invalid("oscillators", "N must be >= 1"));
        }
        let normal = Normal::new(mean, std).map_err(|e| {
            ResonanceError::invalid("frequency_distribution", format!("{e} (mean {mean}, std {std})"))
        })?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let natural_frequencies = (0..n).map(|_| normal.sample(&mut rng)).collect();
        let initial_phases = (0..n).map(|_| rng.gen_range(-PI..PI)).collect();
        Ok(Self {
            initial_phases,
            natural_frequencies,
        })
    }

    pub fn len(&self) -> usize {
        self.initial_phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.initial_phases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_reproducible() {
        let a = OscillatorEnsemble::random(50, 10.0, 2.0, 42).unwrap();
        let b = OscillatorEnsemble::random(50, 10.0, 2.0, 42).unwrap();
        let c = OscillatorEnsemble::random(50, 10.0, 2.0, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 50);
        assert!(a.initial_phases.iter().all(|p| (-PI..PI).contains(p)));
    }

    #[test]
    fn test_random_frequency_moments() {
        let e = OscillatorEnsemble::random(5000, 10.0, 2.0, 1).unwrap();
        let mean = e.natural_frequencies.iter().sum::<f64>() / 5000.0;
        assert!((mean - 10.0).abs() < 0.2, "mean {mean}");
    }

    #[test]
    fn test_invalid_ensembles() {
        assert!(OscillatorEnsemble::random(0, 10.0, 2.0, 1).is_err());
        assert!(OscillatorEnsemble::random(5, 10.0, -1.0, 1).is_err());
        assert!(OscillatorEnsemble::new(vec![0.0], vec![]).is_err());
    }
}
