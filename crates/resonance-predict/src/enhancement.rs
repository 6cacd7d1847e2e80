//! Multiplicative enhancement and the implied temporal resolution.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use resonance_core::error::{require_positive, ResonanceError, ResonanceResult};

/// Planck time, seconds.
pub const PLANCK_TIME_S: f64 = 5.39e-44;

/// Enhancement factors applied to a base frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementCascade {
    /// Harmonic network enhancement ⟨k⟩²/(1+ρ).
    pub graph_factor: f64,
    /// Number of decomposition channels, 3^d.
    pub channel_factor: f64,
    pub cascade_factor: f64,
    pub base_frequency_hz: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementReport {
    pub total_factor: f64,
    pub effective_frequency_hz: f64,
    /// δt = 1 / (2π f_eff).
    pub temporal_resolution_s: f64,
    /// `−log10(δt / t_P)`; positive when δt is below the Planck time.
    pub orders_below_planck: f64,
}

impl EnhancementCascade {
    pub const DEFAULT_CASCADE_FACTOR: f64 = 126.0;
    pub const DEFAULT_BASE_FREQUENCY_HZ: f64 = 3.5e9;

    pub fn new(graph_factor: f64, channel_factor: f64) -> Self {
        Self {
            graph_factor,
            channel_factor,
            cascade_factor: Self::DEFAULT_CASCADE_FACTOR,
            base_frequency_hz: Self::DEFAULT_BASE_FREQUENCY_HZ,
        }
    }

    /// Stack the factors.
    ///
    /// A graph factor of 0 (a network without edges) is a measurement, not
    /// a malformed input: the total is 0, δt is +∞ and the resolution lies
    /// −∞ orders below Planck time.
    ///
    /// # Errors
    /// `InvalidParameter` for a negative or non-finite graph factor, or a
    /// non-positive channel, cascade or base value.
    pub fn evaluate(&self) -> ResonanceResult<EnhancementReport> {
        if !self.graph_factor.is_finite() || self.graph_factor < 0.0 {
            return Err(ResonanceError::invalid(
                "graph_factor",
                format!("must be finite and >= 0, got {}", self.graph_factor),
            ));
        }
        require_positive("channel_factor", self.channel_factor)?;
        require_positive("cascade_factor", self.cascade_factor)?;
        require_positive("base_frequency_hz", self.base_frequency_hz)?;

        let total_factor = self.graph_factor * self.channel_factor * self.cascade_factor;
        let effective_frequency_hz = self.base_frequency_hz * total_factor;
        let temporal_resolution_s = 1.0 / (TAU * effective_frequency_hz);
        Ok(EnhancementReport {
            total_factor,
            effective_frequency_hz,
            temporal_resolution_s,
            orders_below_planck: -(temporal_resolution_s / PLANCK_TIME_S).log10(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_of_factors() {
        let report = EnhancementCascade::new(59_428.0, 59_049.0).evaluate().unwrap();
        assert!((report.total_factor - 59_428.0 * 59_049.0 * 126.0).abs() < 1.0);
        assert!((report.effective_frequency_hz - 3.5e9 * report.total_factor).abs() < 1e6);
        let expected_dt = 1.0 / (TAU * report.effective_frequency_hz);
        assert!((report.temporal_resolution_s - expected_dt).abs() < 1e-40);
    }

    #[test]
    fn test_orders_below_planck_sign() {
        let below = EnhancementCascade {
            graph_factor: 1.0,
            channel_factor: 1.0,
            cascade_factor: 1.0,
            base_frequency_hz: 1.0 / (TAU * PLANCK_TIME_S * 1e-3),
        };
        assert!((below.evaluate().unwrap().orders_below_planck - 3.0).abs() < 1e-9);
        let report = EnhancementCascade::new(100.0, 9.0).evaluate().unwrap();
        assert!(report.orders_below_planck < 0.0);
    }

    #[test]
    fn test_edgeless_network_is_a_measurement() {
        let report = EnhancementCascade::new(0.0, 9.0).evaluate().unwrap();
        assert_eq!(report.total_factor, 0.0);
        assert_eq!(report.effective_frequency_hz, 0.0);
        assert_eq!(report.temporal_resolution_s, f64::INFINITY);
        assert_eq!(report.orders_below_planck, f64::NEG_INFINITY);
    }

    #[test]
    fn test_invalid_factors_rejected() {
        assert!(EnhancementCascade::new(-1.0, 9.0).evaluate().is_err());
        assert!(EnhancementCascade::new(f64::NAN, 9.0).evaluate().is_err());
        assert!(EnhancementCascade::new(4.0, 0.0).evaluate().is_err());
    }
}
