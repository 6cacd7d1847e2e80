//! Configuration for coordinate mapping and decomposition.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::region::Region;

/// Coordinate mapper configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Number of distinguishable reference states (default: 25110)
    pub reference_states: u32,
    /// Bath temperature in kelvin (default: 298.0)
    pub temperature_kelvin: f64,
    /// Bins of the default phase histogram (default: 32)
    pub phase_bins: usize,
    /// Frequency at which the default phase spread saturates (default: 1e12 Hz)
    pub coherence_scale_hz: f64,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            reference_states: 25110,
            temperature_kelvin: 298.0,
            phase_bins: 32,
            coherence_scale_hz: 1e12,
        }
    }
}

impl MapperConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.reference_states < 2 {
            return Err(ResonanceError::invalid(
                "reference_states",
                format!("must be >= 2, got {}", self.reference_states),
            ));
        }
        if !self.temperature_kelvin.is_finite() || self.temperature_kelvin <= 0.0 {
            return Err(ResonanceError::invalid(
                "temperature_kelvin",
                format!("must be finite and > 0, got {}", self.temperature_kelvin),
            ));
        }
        if self.phase_bins < 2 {
            return Err(ResonanceError::invalid("phase_bins", "must be >= 2"));
        }
        if !self.coherence_scale_hz.is_finite() || self.coherence_scale_hz <= 0.0 {
            return Err(ResonanceError::invalid(
                "coherence_scale_hz",
                format!("must be finite and > 0, got {}", self.coherence_scale_hz),
            ));
        }
        Ok(())
    }
}

/// Ternary decomposition configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompositionConfig {
    /// Target depth d; yields 3^d channels (default: 10)
    pub depth: u32,
    /// Lower corner (knowledge, time, entropy) (default: [0, -15, 0])
    pub lower: [f64; 3],
    /// Upper corner (default: [15, 3, 10])
    pub upper: [f64; 3],
    /// Channel pairs sampled for the overlap check above 729 channels (default: 1000)
    pub orthogonality_samples: usize,
    /// Seed for sampled checks (default: 42)
    pub seed: u64,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            depth: 10,
            lower: [0.0, -15.0, 0.0],
            upper: [15.0, 3.0, 10.0],
            orthogonality_samples: 1000,
            seed: 42,
        }
    }
}

impl DecompositionConfig {
    /// The bounding region described by `lower`/`upper`.
    pub fn region(&self) -> ResonanceResult<Region> {
        Region::new(self.lower, self.upper)
    }

    pub fn validate(&self) -> ResonanceResult<()> {
        self.region()?;
        if self.depth > crate::decomposition::MAX_DECOMPOSITION_DEPTH {
            return Err(ResonanceError::invalid(
                "depth",
                format!(
                    "must be <= {}, got {}",
                    crate::decomposition::MAX_DECOMPOSITION_DEPTH,
                    self.depth
                ),
            ));
        }
        if self.orthogonality_samples == 0 {
            return Err(ResonanceError::invalid("orthogonality_samples", "must be > 0"));
        }
        Ok(())
    }
}
