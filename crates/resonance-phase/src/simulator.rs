//! Fixed-step integration of the coupled-oscillator system.

use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::config::{Integrator, PhaseLockConfig};
use crate::coupling::CouplingMatrix;
use crate::information::InformationTransfer;
use crate::order::{order_parameter, wrap_phase};

/// Upper bound on the sample buffer reserved before a run starts.
const PREALLOCATED_SAMPLES: usize = 1 << 20;

/// One sample of the order parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderSample {
    pub time: f64,
    pub r: f64,
    pub psi: f64,
}

/// Result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    pub integrator: Integrator,
    pub steps: usize,
    /// The `1 + m` factor applied to every coupling entry.
    pub coupling_scale: f64,
    /// Phases after the last step, wrapped to [−π, π).
    pub final_phases: Vec<f64>,
    /// R(t) at t = 0, every `sample_interval` steps, and the final step.
    pub samples: Vec<OrderSample>,
    /// Phase vectors aligned with `samples` when trajectories are retained.
    pub trajectory: Option<Vec<Vec<f64>>>,
    /// Estimate from the final R sample.
    pub information_transfer: InformationTransfer,
}

impl SimulationRun {
    pub fn final_order_parameter(&self) -> f64 {
        self.samples.last().map_or(0.0, |s| s.r)
    }

    /// Mean R over the trailing `window` samples (all samples if fewer).
    pub fn steady_state_order_parameter(&self, window: usize) -> f64 {
        let take = window.min(self.samples.len());
        if take == 0 {
            return 0.0;
        }
        let tail = &self.samples[self.samples.len() - take..];
        tail.iter().map(|s| s.r).sum::<f64>() / take as f64
    }

    pub fn r_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.r).collect()
    }
}

/// Integrates `dθ_i/dt = ω_i + (s/N) Σ_j K_ij sin(θ_j − θ_i)` with `s = 1 + m`.
///
/// The time loop is sequential; independent runs may execute concurrently
/// since the simulator holds no per-run state.
#[derive(Debug, Clone)]
pub struct PhaseLockSimulator {
    config: PhaseLockConfig,
}

impl PhaseLockSimulator {
    pub fn new(config: PhaseLockConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PhaseLockConfig {
        &self.config
    }

    /// Run one simulation.
    ///
    /// # Errors
    /// - `InvalidParameter` when N = 0, the input lengths or the matrix size
    ///   disagree, or any input is non-finite
    /// - `NumericInstability` when a phase becomes non-finite or R leaves
    ///   [0, 1]
    pub fn simulate(
        &self,
        initial_phases: &[f64],
        natural_frequencies: &[f64],
        coupling: &CouplingMatrix,
        modulation: f64,
    ) -> ResonanceResult<SimulationRun> {
        let n = initial_phases.len();
        if n == 0 {
            return Err(ResonanceError::invalid("oscillators", "N must be >= 1"));
        }
        if natural_frequencies.len() != n {
            return Err(ResonanceError::invalid(
                "natural_frequencies",
                format!("expected {n} entries, got {}", natural_frequencies.len()),
            ));
        }
        if coupling.size() != n {
            return Err(ResonanceError::invalid(
                "coupling",
                format!("matrix is {0}x{0}, expected {n}x{n}", coupling.size()),
            ));
        }
        if initial_phases.iter().chain(natural_frequencies).any(|v| !v.is_finite()) {
            return Err(ResonanceError::invalid(
                "oscillators",
                "phases and natural frequencies must be finite",
            ));
        }
        let coupling_scale = 1.0 + modulation;
        if !coupling_scale.is_finite() {
            return Err(ResonanceError::invalid(
                "modulation",
                format!("must be finite, got {modulation}"),
            ));
        }

        let dt = self.config.step_size;
        let steps = self.config.step_count();
        let interval = self.config.sample_interval;
        let retain = self.config.retain_trajectory;

        let system = KuramotoSystem {
            omega: natural_frequencies,
            coupling,
            gain: coupling_scale / n as f64,
        };
        let mut workspace = Rk4Workspace::new(n);
        let mut theta: Vec<f64> = initial_phases.iter().copied().map(wrap_phase).collect();

        let mut samples =
            Vec::with_capacity((steps / interval).saturating_add(2).min(PREALLOCATED_SAMPLES));
        let mut trajectory = retain.then(Vec::new);
        record(&theta, 0.0, &mut samples, trajectory.as_mut())?;

        for step in 1..=steps {
            match self.config.integrator {
                Integrator::RungeKutta4 => workspace.step(&system, &mut theta, dt),
            }
            for (i, t) in theta.iter_mut().enumerate() {
                if !t.is_finite() {
                    return Err(ResonanceError::instability(
                        "finite_phase",
                        format!("oscillator {i} diverged at step {step}"),
                    ));
                }
                *t = wrap_phase(*t);
            }
            if step % interval == 0 || step == steps {
                record(&theta, step as f64 * dt, &mut samples, trajectory.as_mut())?;
            }
        }

        let final_r = samples.last().map_or(0.0, |s: &OrderSample| s.r);
        let information_transfer = InformationTransfer::from_order_parameter(
            final_r,
            self.config.bandwidth_hz,
            self.config.signal_to_noise,
        )?;

        debug!(
            oscillators = n,
            steps,
            coupling_scale,
            final_r,
            "phase-lock simulation finished"
        );

        Ok(SimulationRun {
            integrator: self.config.integrator,
            steps,
            coupling_scale,
            final_phases: theta,
            samples,
            trajectory,
            information_transfer,
        })
    }
}

fn record(
    theta: &[f64],
    time: f64,
    samples: &mut Vec<OrderSample>,
    trajectory: Option<&mut Vec<Vec<f64>>>,
) -> ResonanceResult<()> {
    let op = order_parameter(theta)?;
    samples.push(OrderSample {
        time,
        r: op.r,
        psi: op.psi,
    });
    if let Some(trajectory) = trajectory {
        trajectory.push(theta.to_vec());
    }
    Ok(())
}

struct KuramotoSystem<'a> {
    omega: &'a [f64],
    coupling: &'a CouplingMatrix,
    gain: f64,
}

impl KuramotoSystem<'_> {
    /// Writes dθ/dt into `out`, using
    /// `sin(θ_j − θ_i) = sin θ_j cos θ_i − cos θ_j sin θ_i`
    /// so only N sin/cos pairs are evaluated per call.
    fn derivative(&self, theta: &[f64], sin: &mut [f64], cos: &mut [f64], out: &mut [f64]) {
        for (j, &t) in theta.iter().enumerate() {
            let (s, c) = t.sin_cos();
            sin[j] = s;
            cos[j] = c;
        }
        for (i, d) in out.iter_mut().enumerate() {
            let row = self.coupling.row(i);
            let (ks, kc) = row
                .iter()
                .zip(sin.iter().zip(cos.iter()))
                .fold((0.0, 0.0), |(ks, kc), (&k, (&s, &c))| (ks + k * s, kc + k * c));
            *d = self.omega[i] + self.gain * (cos[i] * ks - sin[i] * kc);
        }
    }
}

struct Rk4Workspace {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    stage: Vec<f64>,
    sin: Vec<f64>,
    cos: Vec<f64>,
}

impl Rk4Workspace {
    fn new(n: usize) -> Self {
        Self {
            k1: vec![0.0; n],
            k2: vec![0.0; n],
            k3: vec![0.0; n],
            k4: vec![0.0; n],
            stage: vec![0.0; n],
            sin: vec![0.0; n],
            cos: vec![0.0; n],
        }
    }

    fn step(&mut self, system: &KuramotoSystem<'_>, theta: &mut [f64], dt: f64) {
        let half = 0.5 * dt;

        system.derivative(theta, &mut self.sin, &mut self.cos, &mut self.k1);
        for ((s, &t), &k) in self.stage.iter_mut().zip(theta.iter()).zip(&self.k1) {
            *s = t + half * k;
        }
        system.derivative(&self.stage, &mut self.sin, &mut self.cos, &mut self.k2);
        for ((s, &t), &k) in self.stage.iter_mut().zip(theta.iter()).zip(&self.k2) {
            *s = t + half * k;
        }
        system.derivative(&self.stage, &mut self.sin, &mut self.cos, &mut self.k3);
        for ((s, &t), &k) in self.stage.iter_mut().zip(theta.iter()).zip(&self.k3) {
            *s = t + dt * k;
        }
        system.derivative(&self.stage, &mut self.sin, &mut self.cos, &mut self.k4);

        let sixth = dt / 6.0;
        for (i, t) in theta.iter_mut().enumerate() {
            *t += sixth * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
        }
    }
}
