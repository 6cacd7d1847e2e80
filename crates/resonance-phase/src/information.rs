//! Information-transfer estimate from phase coherence.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

/// `I = R · B · log2(SNR)` in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InformationTransfer {
    pub order_parameter: f64,
    pub bandwidth_hz: f64,
    pub signal_to_noise: f64,
    pub bits_per_second: f64,
}

impl InformationTransfer {
    pub fn from_order_parameter(
        order_parameter: f64,
        bandwidth_hz: f64,
        signal_to_noise: f64,
    ) -> ResonanceResult<Self> {
        if !(0.0..=1.0).contains(&order_parameter) {
            return Err(ResonanceError::invalid(
                "order_parameter",
                format!("must lie in [0, 1], got {order_parameter}"),
            ));
        }
        if !signal_to_noise.is_finite() || signal_to_noise < 1.0 {
            return Err(ResonanceError::invalid(
                "signal_to_noise",
                format!("must be finite and >= 1, got {signal_to_noise}"),
            ));
        }
        if !bandwidth_hz.is_finite() || bandwidth_hz <= 0.0 {
            return Err(ResonanceError::invalid(
                "bandwidth_hz",
                format!("must be finite and > 0, got {bandwidth_hz}"),
            ));
        }
        Ok(Self {
            order_parameter,
            bandwidth_hz,
            signal_to_noise,
            bits_per_second: order_parameter * bandwidth_hz * signal_to_noise.log2(),
        })
    }
}
