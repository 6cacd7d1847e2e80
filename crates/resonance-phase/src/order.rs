//! Kuramoto order parameter and phase wrapping.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::tolerances::ORDER_PARAMETER_EPS;

/// `R·e^{iψ} = mean(e^{iθ_j})`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderParameter {
    /// Coherence R in [0, 1].
    pub r: f64,
    /// Mean phase ψ in (−π, π].
    pub psi: f64,
}

/// Wrap a phase to [−π, π).
#[inline]
pub fn wrap_phase(theta: f64) -> f64 {
    (theta + PI).rem_euclid(TAU) - PI
}

/// Compute the order parameter of `phases`.
///
/// # Errors
/// `InvalidParameter` for an empty slice; `NumericInstability` when R is
/// not finite or leaves [0, 1] by more than the tolerance. Excursions within
/// tolerance are clamped.
pub fn order_parameter(phases: &[f64]) -> ResonanceResult<OrderParameter> {
    if phases.is_empty() {
        return Err(ResonanceError::invalid("phases", "need at least one oscillator"));
    }
    let (re, im) = phases
        .iter()
        .fold((0.0, 0.0), |(re, im), &t| (re + t.cos(), im + t.sin()));
    let n = phases.len() as f64;
    let (re, im) = (re / n, im / n);
    let r = re.hypot(im);
    if !r.is_finite() || r > 1.0 + ORDER_PARAMETER_EPS {
        return Err(ResonanceError::instability(
            "order_parameter_bounds",
            format!("R = {r} outside [0, 1]"),
        ));
    }
    Ok(OrderParameter {
        r: r.min(1.0),
        psi: im.atan2(re),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_phase_range() {
        for theta in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 3.5 * PI, 1e6] {
            let w = wrap_phase(theta);
            assert!((-PI..PI).contains(&w), "{theta} -> {w}");
            assert!(((theta - w) / TAU - ((theta - w) / TAU).round()).abs() < 1e-6);
        }
        assert_eq!(wrap_phase(PI), -PI);
    }

    #[test]
    fn test_order_parameter_extremes() {
        let aligned = order_parameter(&[0.3; 10]).unwrap();
        assert!((aligned.r - 1.0).abs() < 1e-12);
        assert!((aligned.psi - 0.3).abs() < 1e-12);

        let opposed = order_parameter(&[0.0, PI]).unwrap();
        assert!(opposed.r < 1e-12);

        let spread: Vec<f64> = (0..4).map(|k| k as f64 * PI / 2.0).collect();
        assert!(order_parameter(&spread).unwrap().r < 1e-12);
    }

    #[test]
    fn test_order_parameter_failures() {
        assert_eq!(order_parameter(&[]).unwrap_err().kind(), "invalid_parameter");
        assert_eq!(
            order_parameter(&[0.0, f64::NAN]).unwrap_err().kind(),
            "numeric_instability"
        );
    }
}
