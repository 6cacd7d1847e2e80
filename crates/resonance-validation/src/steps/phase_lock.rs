use serde::Serialize;
use tracing::debug;

use resonance_core::error::ResonanceResult;
use resonance_phase::coupling::modulated_strength;
use resonance_phase::{
    CouplingMatrix, CouplingSweep, InformationTransfer, OscillatorEnsemble, PhaseLockSimulator,
    SweepPoint,
};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{Artifact, StepContext, StepOutcome, ValidationStep};

/// Information-transfer window in bits per second.
const INFORMATION_RANGE: (f64, f64) = (500.0, 610.0);

/// Phase locking under a coupling sweep and modulated coupling strengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhaseLockStep;

impl PhaseLockStep {
    pub const NAME: &'static str = "phase_lock";
}

#[derive(Serialize)]
struct SweepSummary {
    coupling: f64,
    r_final: f64,
    locked: bool,
    information_transfer: InformationTransfer,
}

#[derive(Serialize)]
struct ModulationResult {
    name: String,
    modulation: f64,
    coupling: f64,
    expected: f64,
    relative_error: f64,
    within_tolerance: bool,
    r_final: f64,
}

#[derive(Serialize)]
struct Details {
    oscillators: usize,
    steps: usize,
    sweep: Vec<SweepSummary>,
    modulation: Vec<ModulationResult>,
}

/// Phase vectors at every sample time of one modulated run.
#[derive(Serialize)]
struct TrajectoryArtifact {
    case: String,
    phases: Vec<Vec<f64>>,
}

#[derive(Serialize)]
struct SeriesArtifact<'a> {
    step_size: f64,
    sample_interval: usize,
    points: &'a [SweepPoint],
}

/// Extremes of every sampled R(t) across the sweep and modulated runs.
#[derive(Debug, Clone, Copy)]
struct RBounds {
    min: f64,
    max: f64,
    count: usize,
}

impl Default for RBounds {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        }
    }
}

impl RBounds {
    fn observe(mut self, r: f64) -> Self {
        // NaN must not vanish into min/max.
        if r.is_nan() {
            self.min = f64::NAN;
            self.max = f64::NAN;
        } else if !self.min.is_nan() {
            self.min = self.min.min(r);
            self.max = self.max.max(r);
        }
        self.count += 1;
        self
    }

    fn merge(mut self, other: Self) -> Self {
        if self.min.is_nan() || other.min.is_nan() {
            self.min = f64::NAN;
            self.max = f64::NAN;
        } else {
            self.min = self.min.min(other.min);
            self.max = self.max.max(other.max);
        }
        self.count += other.count;
        self
    }

    fn within_unit_interval(&self) -> bool {
        self.count > 0 && 0.0 <= self.min && self.max <= 1.0
    }
}

impl ValidationStep for PhaseLockStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Kuramoto coupling sweep, modulated coupling and information transfer"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::in_range("order_parameter_min", 0.0, 1.0),
            Claim::in_range("order_parameter_max", 0.0, 1.0),
            Claim::at_least("locked_couplings", 1),
            Claim::equals("modulation_within_tolerance", 1.0),
            Claim::at_least("information_in_range", 1),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let config = ctx.config();
        let osc = &config.oscillators;
        let simulator = PhaseLockSimulator::new(config.phase_lock.clone())?;
        let window = config.phase_lock.steady_state_window;
        let ensemble =
            OscillatorEnsemble::random(osc.count, osc.frequency_mean, osc.frequency_std, ctx.seed())?;

        // order_parameter() rejects R outside [0, 1] with NumericInstability.
        let points = CouplingSweep::new(simulator.clone(), osc.couplings.clone()).run(&ensemble)?;

        let locked = points.iter().filter(|p| p.locked).count();
        let in_range = points
            .iter()
            .filter(|p| {
                let bits = p.information_transfer.bits_per_second;
                INFORMATION_RANGE.0 <= bits && bits <= INFORMATION_RANGE.1
            })
            .count();
        let max_r = points.iter().map(|p| p.r_final).fold(0.0, f64::max);
        let mut r_bounds = points
            .iter()
            .flat_map(|p| p.r_series.iter().copied())
            .fold(RBounds::default(), RBounds::observe);

        let base = CouplingMatrix::uniform(ensemble.len(), osc.base_coupling)?;
        let (modulation, trajectories): (Vec<_>, Vec<_>) = osc
            .modulation_cases
            .iter()
            .map(|case| {
                let run = simulator.simulate(
                    &ensemble.initial_phases,
                    &ensemble.natural_frequencies,
                    &base,
                    case.modulation(),
                )?;
                let coupling = modulated_strength(osc.base_coupling, case.modulation());
                let relative_error =
                    (coupling - case.expected_coupling).abs() / case.expected_coupling;
                debug!(case = %case.name, coupling, relative_error, "modulated coupling");
                let result = ModulationResult {
                    name: case.name.clone(),
                    modulation: case.modulation(),
                    coupling,
                    expected: case.expected_coupling,
                    relative_error,
                    within_tolerance: relative_error < osc.modulation_tolerance,
                    r_final: run.steady_state_order_parameter(window),
                };
                let bounds = run
                    .samples
                    .iter()
                    .map(|sample| sample.r)
                    .fold(RBounds::default(), RBounds::observe);
                let trajectory = run.trajectory.map(|phases| TrajectoryArtifact {
                    case: case.name.clone(),
                    phases,
                });
                Ok(((result, bounds), trajectory))
            })
            .collect::<ResonanceResult<Vec<_>>>()?
            .into_iter()
            .unzip();
        let modulation: Vec<ModulationResult> = modulation
            .into_iter()
            .map(|(result, bounds)| {
                r_bounds = r_bounds.merge(bounds);
                result
            })
            .collect();
        let modulation_rate = if modulation.is_empty() {
            1.0
        } else {
            modulation.iter().filter(|m| m.within_tolerance).count() as f64
                / modulation.len() as f64
        };

        let details = Details {
            oscillators: ensemble.len(),
            steps: config.phase_lock.step_count(),
            sweep: points
                .iter()
                .map(|p| SweepSummary {
                    coupling: p.coupling,
                    r_final: p.r_final,
                    locked: p.locked,
                    information_transfer: p.information_transfer,
                })
                .collect(),
            modulation,
        };

        let mut outcome = StepOutcome::new()
            .measure("order_parameter_min", r_bounds.min)
            .measure("order_parameter_max", r_bounds.max)
            .measure("order_parameter_bounded", r_bounds.within_unit_interval())
            .measure("order_parameter_samples", r_bounds.count)
            .measure("locked_couplings", locked)
            .measure("max_r_final", max_r)
            .measure("modulation_within_tolerance", modulation_rate)
            .measure("information_in_range", in_range)
            .with_details(&details)?;

        if ctx.retain_artifacts() {
            outcome = outcome.with_artifact(Artifact::json(
                "order_parameter_series",
                &SeriesArtifact {
                    step_size: config.phase_lock.step_size,
                    sample_interval: config.phase_lock.sample_interval,
                    points: &points,
                },
            )?);
            let trajectories: Vec<TrajectoryArtifact> = trajectories.into_iter().flatten().collect();
            if !trajectories.is_empty() {
                outcome = outcome.with_artifact(Artifact::json("phase_trajectories", &trajectories)?);
            }
        }
        Ok(outcome)
    }
}
