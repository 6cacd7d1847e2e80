//! Semantic gravity: navigation through a potential landscape.
//!
//! A [`PotentialField`] over `D`-dimensional semantic space sums inverse-square
//! wells: attractors contribute `-k / (r + ε)²`, repellers `+k / (r + ε)²`.
//! Trajectories follow overdamped Langevin dynamics
//!
//! ```text
//! x ← x + dt · (−μ ∇U(x) + √(2kT) ξ),   ξ ~ N(0, I)
//! ```
//!
//! and a trial succeeds when it ends within the success radius of the
//! healthy attractor. The gradient is analytic.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Softening added to every well distance.
const WELL_SOFTENING: f64 = 1e-10;

/// Offset in the zero-training target score `1 / (d + offset)`.
const TARGET_SCORE_OFFSET: f64 = 0.1;

/// Largest problem size whose factorial is reported exactly.
pub const MAX_EXHAUSTIVE_SIZE: u32 = 20;

/// Landscape and sampler setup for the navigation experiment.
///
/// # Defaults
/// - 8 dimensions, healthy attractor at the origin (k = 10)
/// - disease repeller at 5·(1, …, 1) (k = 5)
/// - 50 trials of 2000 steps, dt = 0.01, μ = 1, kT = 0.5
/// - starts drawn around the repeller with σ = 0.5, success within r = 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticGravityConfig {
    pub dimensions: usize,
    pub attractor_strength: f64,
    pub repeller_strength: f64,
    /// Every coordinate of the repeller centre
    pub repeller_offset: f64,
    pub trials: usize,
    pub steps: usize,
    pub dt: f64,
    pub mobility: f64,
    pub temperature: f64,
    /// Standard deviation of the start point around the repeller
    pub start_noise: f64,
    pub success_radius: f64,
    /// Problem sizes for the complexity comparison
    pub problem_sizes: Vec<u32>,
    /// Seed for start points, noise and the zero-training query (default: 42)
    pub seed: u64,
}

impl Default for SemanticGravityConfig {
    fn default() -> Self {
        Self {
            dimensions: 8,
            attractor_strength: 10.0,
            repeller_strength: 5.0,
            repeller_offset: 5.0,
            trials: 50,
            steps: 2000,
            dt: 0.01,
            mobility: 1.0,
            temperature: 0.5,
            start_noise: 0.5,
            success_radius: 2.0,
            problem_sizes: vec![5, 10, 15, 20, 25, 30],
            seed: 42,
        }
    }
}

impl SemanticGravityConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.dimensions == 0 {
            return Err(ResonanceError::invalid("gravity.dimensions", "must be >= 1"));
        }
        if self.trials == 0 || self.steps == 0 {
            return Err(ResonanceError::invalid(
                "gravity.trials",
                "trials and steps must both be >= 1",
            ));
        }
        for (name, value) in [
            ("gravity.attractor_strength", self.attractor_strength),
            ("gravity.repeller_strength", self.repeller_strength),
            ("gravity.temperature", self.temperature),
            ("gravity.start_noise", self.start_noise),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ResonanceError::invalid(
                    name,
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }
        for (name, value) in [
            ("gravity.dt", self.dt),
            ("gravity.mobility", self.mobility),
            ("gravity.success_radius", self.success_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ResonanceError::invalid(
                    name,
                    format!("must be finite and > 0, got {value}"),
                ));
            }
        }
        if !self.repeller_offset.is_finite() {
            return Err(ResonanceError::invalid(
                "gravity.repeller_offset",
                format!("must be finite, got {}", self.repeller_offset),
            ));
        }
        if self.problem_sizes.iter().any(|&n| n < 2) {
            return Err(ResonanceError::invalid(
                "gravity.problem_sizes",
                "every size must be >= 2",
            ));
        }
        Ok(())
    }

    pub fn healthy_state(&self) -> Vec<f64> {
        vec![0.0; self.dimensions]
    }

    pub fn disease_state(&self) -> Vec<f64> {
        vec![self.repeller_offset; self.dimensions]
    }

    /// Attractor at the healthy state, repeller at the disease state.
    pub fn field(&self) -> ResonanceResult<PotentialField> {
        PotentialField::new(self.dimensions)
            .with_attractor(self.healthy_state(), self.attractor_strength)?
            .with_repeller(self.disease_state(), self.repeller_strength)
    }
}

/// An inverse-square well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Well {
    pub centre: Vec<f64>,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PotentialField {
    dimensions: usize,
    attractors: Vec<Well>,
    repellers: Vec<Well>,
}

impl PotentialField {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            attractors: Vec::new(),
            repellers: Vec::new(),
        }
    }

    pub fn with_attractor(mut self, centre: Vec<f64>, strength: f64) -> ResonanceResult<Self> {
        let well = self.well(centre, strength)?;
        self.attractors.push(well);
        Ok(self)
    }

    pub fn with_repeller(mut self, centre: Vec<f64>, strength: f64) -> ResonanceResult<Self> {
        let well = self.well(centre, strength)?;
        self.repellers.push(well);
        Ok(self)
    }

    fn well(&self, centre: Vec<f64>, strength: f64) -> ResonanceResult<Well> {
        if centre.len() != self.dimensions {
            return Err(ResonanceError::invalid(
                "centre",
                format!("expected {} coordinates, got {}", self.dimensions, centre.len()),
            ));
        }
        if !strength.is_finite() || strength < 0.0 || centre.iter().any(|c| !c.is_finite()) {
            return Err(ResonanceError::invalid(
                "strength",
                format!("needs a finite centre and strength >= 0, got {strength}"),
            ));
        }
        Ok(Well { centre, strength })
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// U(x)
    pub fn potential(&self, x: &[f64]) -> f64 {
        let term = |well: &Well| {
            let r = distance(x, &well.centre) + WELL_SOFTENING;
            well.strength / (r * r)
        };
        self.repellers.iter().map(term).sum::<f64>() - self.attractors.iter().map(term).sum::<f64>()
    }

    /// ∇U(x). Exactly at a well centre that well contributes nothing.
    pub fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let mut grad = vec![0.0; x.len()];
        // d/dx of ±k/(r+ε)² is ∓2k/(r+ε)³ · (x - c)/r
        let mut accumulate = |well: &Well, sign: f64| {
            let r = distance(x, &well.centre);
            if r == 0.0 {
                return;
            }
            let soft = r + WELL_SOFTENING;
            let scale = sign * 2.0 * well.strength / (soft * soft * soft * r);
            for (g, (xi, ci)) in grad.iter_mut().zip(x.iter().zip(&well.centre)) {
                *g += scale * (xi - ci);
            }
        };
        for well in &self.attractors {
            accumulate(well, 1.0);
        }
        for well in &self.repellers {
            accumulate(well, -1.0);
        }
        grad
    }
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Overdamped Langevin integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LangevinSampler {
    pub steps: usize,
    pub dt: f64,
    pub mobility: f64,
    pub temperature: f64,
}

/// Where one trajectory ended and when it first entered the target region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub final_position: Vec<f64>,
    pub final_distance: f64,
    /// Time of first entry into the target radius, if any
    pub entry_time: Option<f64>,
}

impl LangevinSampler {
    pub fn from_config(config: &SemanticGravityConfig) -> Self {
        Self {
            steps: config.steps,
            dt: config.dt,
            mobility: config.mobility,
            temperature: config.temperature,
        }
    }

    /// Integrate from `start`, tracking distance to `target`.
    ///
    /// A position that stops being finite ends the trajectory early with a
    /// NaN final distance.
    pub fn run<R: rand::Rng + ?Sized>(
        &self,
        field: &PotentialField,
        start: &[f64],
        target: &[f64],
        radius: f64,
        rng: &mut R,
    ) -> Trajectory {
        let diffusion = (2.0 * self.temperature).sqrt();
        let mut x = start.to_vec();
        let mut entry_time = (distance(&x, target) < radius).then_some(0.0);

        for step in 1..self.steps {
            let grad = field.gradient(&x);
            for (xi, gi) in x.iter_mut().zip(&grad) {
                let noise: f64 = StandardNormal.sample(rng);
                *xi += self.dt * (-self.mobility * gi + diffusion * noise);
            }
            if x.iter().any(|v| !v.is_finite()) {
                return Trajectory {
                    final_position: x,
                    final_distance: f64::NAN,
                    entry_time,
                };
            }
            if entry_time.is_none() && distance(&x, target) < radius {
                entry_time = Some(step as f64 * self.dt);
            }
        }

        Trajectory {
            final_distance: distance(&x, target),
            final_position: x,
            entry_time,
        }
    }
}

/// Outcome of the therapeutic navigation trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationSummary {
    pub trials: usize,
    pub successes: usize,
    pub success_rate: f64,
    /// Mean first-entry time over successful trials; `None` without successes
    pub mean_navigation_time: Option<f64>,
    pub mean_final_distance: f64,
}

/// Run every trial from a noisy start around the disease state.
pub fn navigate(config: &SemanticGravityConfig) -> ResonanceResult<NavigationSummary> {
    config.validate()?;
    let field = config.field()?;
    let sampler = LangevinSampler::from_config(config);
    let healthy = config.healthy_state();
    let disease = config.disease_state();
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut successes = 0usize;
    let mut entry_times = Vec::new();
    let mut final_distances = 0.0;
    for _ in 0..config.trials {
        let start: Vec<f64> = disease
            .iter()
            .map(|c| {
                let noise: f64 = StandardNormal.sample(&mut rng);
                c + config.start_noise * noise
            })
            .collect();
        let trajectory = sampler.run(&field, &start, &healthy, config.success_radius, &mut rng);
        final_distances += trajectory.final_distance;
        if trajectory.final_distance < config.success_radius {
            successes += 1;
            if let Some(t) = trajectory.entry_time {
                entry_times.push(t);
            }
        }
    }

    let summary = NavigationSummary {
        trials: config.trials,
        successes,
        success_rate: successes as f64 / config.trials as f64,
        mean_navigation_time: (!entry_times.is_empty())
            .then(|| entry_times.iter().sum::<f64>() / entry_times.len() as f64),
        mean_final_distance: final_distances / config.trials as f64,
    };
    debug!(
        trials = summary.trials,
        successes = summary.successes,
        "semantic gravity navigation"
    );
    Ok(summary)
}

/// Exhaustive n! search against log2(n) navigation for one problem size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityRow {
    pub problem_size: u32,
    /// n!, reported up to n = 20
    pub exhaustive_ops: Option<f64>,
    pub navigation_ops: f64,
    pub speedup: Option<f64>,
    /// log10(n! / log2 n), finite for every size
    pub log10_speedup: f64,
}

pub fn complexity_reduction(sizes: &[u32]) -> Vec<ComplexityRow> {
    sizes
        .iter()
        .map(|&n| {
            let navigation_ops = f64::from(n).log2();
            let log10_factorial: f64 = (2..=n).map(|k| f64::from(k).log10()).sum();
            let exhaustive_ops = (n <= MAX_EXHAUSTIVE_SIZE)
                .then(|| (2..=n).map(f64::from).product::<f64>());
            ComplexityRow {
                problem_size: n,
                exhaustive_ops,
                navigation_ops,
                speedup: exhaustive_ops.map(|ops| ops / navigation_ops),
                log10_speedup: log10_factorial - navigation_ops.log10(),
            }
        })
        .collect()
}

/// A target scored without any training data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRanking {
    pub target: String,
    pub semantic_distance: f64,
    pub score: f64,
}

/// Rank targets by `1 / (d + 0.1)`, best first.
///
/// # Errors
/// `InvalidParameter` when a target's dimension differs from the query's.
pub fn rank_targets(
    query: &[f64],
    targets: &[(String, Vec<f64>)],
) -> ResonanceResult<Vec<TargetRanking>> {
    let mut ranked = targets
        .iter()
        .map(|(name, position)| {
            if position.len() != query.len() {
                return Err(ResonanceError::invalid(
                    "targets",
                    format!("{name}: expected {} coordinates, got {}", query.len(), position.len()),
                ));
            }
            let semantic_distance = distance(query, position);
            Ok(TargetRanking {
                target: name.clone(),
                semantic_distance,
                score: 1.0 / (semantic_distance + TARGET_SCORE_OFFSET),
            })
        })
        .collect::<ResonanceResult<Vec<_>>>()?;
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}

/// Unit vectors along the first three axes, named `target_a` … `target_c`.
pub fn unit_targets(dimensions: usize) -> Vec<(String, Vec<f64>)> {
    ["target_a", "target_b", "target_c"]
        .iter()
        .enumerate()
        .take(dimensions)
        .map(|(axis, name)| {
            let mut position = vec![0.0; dimensions];
            position[axis] = 1.0;
            (name.to_string(), position)
        })
        .collect()
}

/// A standard-normal query point reproducible from `seed`.
pub fn random_query(dimensions: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..dimensions).map(|_| StandardNormal.sample(&mut rng)).collect()
}
