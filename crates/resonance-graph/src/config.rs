//! Configuration for harmonic network construction and analysis.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Harmonic network configuration.
///
/// # Defaults
/// - 150 harmonics per base frequency
/// - Δf = 1 GHz coincidence threshold
/// - exact clustering up to 1000 nodes, sampled above
/// - 100 BFS sources for average path length
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicConfig {
    /// Highest harmonic index N; harmonics run over n ∈ [1, N] (default: 150)
    pub max_harmonic: u32,
    /// Two harmonics coincide when |f_i - f_j| < threshold (default: 1e9 Hz)
    pub coincidence_threshold_hz: f64,
    /// Node count above which clustering is estimated on a sample (default: 1000)
    pub clustering_sample_size: usize,
    /// BFS sources used to estimate average path length (default: 100)
    pub path_length_sources: usize,
    /// Seed for every sampled estimate (default: 42)
    pub seed: u64,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            max_harmonic: 150,
            coincidence_threshold_hz: 1e9,
            clustering_sample_size: 1000,
            path_length_sources: 100,
            seed: 42,
        }
    }
}

impl HarmonicConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    /// `InvalidParameter` when N < 1, Δf ≤ 0 (or non-finite), or a sample
    /// size is zero.
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.max_harmonic < 1 {
            return Err(ResonanceError::invalid(
                "max_harmonic",
                format!("must be >= 1, got {}", self.max_harmonic),
            ));
        }
        if !self.coincidence_threshold_hz.is_finite() || self.coincidence_threshold_hz <= 0.0 {
            return Err(ResonanceError::invalid(
                "coincidence_threshold_hz",
                format!("must be finite and > 0, got {}", self.coincidence_threshold_hz),
            ));
        }
        if self.clustering_sample_size == 0 {
            return Err(ResonanceError::invalid(
                "clustering_sample_size",
                "must be > 0",
            ));
        }
        if self.path_length_sources == 0 {
            return Err(ResonanceError::invalid("path_length_sources", "must be > 0"));
        }
        Ok(())
    }
}
