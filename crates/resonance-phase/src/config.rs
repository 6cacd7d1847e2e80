//! Configuration for phase-lock simulation.

use serde::{Deserialize, Serialize};

use resonance_core::error::{require_positive, ResonanceError, ResonanceResult};

/// Time-stepping scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Classic fixed-step fourth-order Runge–Kutta.
    #[default]
    RungeKutta4,
}

impl Integrator {
    pub fn name(self) -> &'static str {
        match self {
            Integrator::RungeKutta4 => "rk4",
        }
    }
}

/// Largest number of integration steps a single run may take.
pub const MAX_STEPS: usize = 100_000_000;

/// Phase-lock simulation configuration.
///
/// # Defaults
/// - dt = 0.1, t = 100 (1000 RK4 steps)
/// - R sampled every step
/// - 1 kHz bandwidth at SNR 10 for information transfer
/// - R_final over the trailing 100 samples, locked above 0.7
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseLockConfig {
    /// Integration step dt (default: 0.1)
    pub step_size: f64,
    /// Simulated time span (default: 100.0)
    pub duration: f64,
    /// Record R every this many steps (default: 1)
    pub sample_interval: usize,
    /// Integration scheme (default: RungeKutta4)
    pub integrator: Integrator,
    /// Assumed channel bandwidth in Hz (default: 1000)
    pub bandwidth_hz: f64,
    /// Assumed signal-to-noise ratio, linear (default: 10)
    pub signal_to_noise: f64,
    /// Keep the phase vector at each sample (default: false)
    pub retain_trajectory: bool,
    /// R_final above this counts as phase-locked (default: 0.7)
    pub lock_threshold: f64,
    /// Trailing samples averaged into R_final (default: 100)
    pub steady_state_window: usize,
}

impl Default for PhaseLockConfig {
    fn default() -> Self {
        Self {
            step_size: 0.1,
            duration: 100.0,
            sample_interval: 1,
            integrator: Integrator::RungeKutta4,
            bandwidth_hz: 1000.0,
            signal_to_noise: 10.0,
            retain_trajectory: false,
            lock_threshold: 0.7,
            steady_state_window: 100,
        }
    }
}

impl PhaseLockConfig {
    /// Number of integration steps, `round(duration / dt)`.
    pub fn step_count(&self) -> usize {
        (self.duration / self.step_size).round() as usize
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// `InvalidParameter` for a non-positive step, negative duration, zero
    /// sample interval, SNR < 1 or a lock threshold outside [0, 1].
    pub fn validate(&self) -> ResonanceResult<()> {
        require_positive("step_size", self.step_size)?;
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(ResonanceError::invalid(
                "duration",
                format!("must be finite and >= 0, got {}", self.duration),
            ));
        }
        let steps = (self.duration / self.step_size).round();
        if steps > MAX_STEPS as f64 {
            return Err(ResonanceError::invalid(
                "duration",
                format!(
                    "duration / step_size = {steps:e} steps exceeds the limit of {MAX_STEPS}"
                ),
            ));
        }
        if self.sample_interval == 0 {
            return Err(ResonanceError::invalid("sample_interval", "must be > 0"));
        }
        require_positive("bandwidth_hz", self.bandwidth_hz)?;
        if !self.signal_to_noise.is_finite() || self.signal_to_noise < 1.0 {
            return Err(ResonanceError::invalid(
                "signal_to_noise",
                format!("must be finite and >= 1, got {}", self.signal_to_noise),
            ));
        }
        if !(0.0..=1.0).contains(&self.lock_threshold) {
            return Err(ResonanceError::invalid(
                "lock_threshold",
                format!("must lie in [0, 1], got {}", self.lock_threshold),
            ));
        }
        if self.steady_state_window == 0 {
            return Err(ResonanceError::invalid("steady_state_window", "must be > 0"));
        }
        Ok(())
    }
}
