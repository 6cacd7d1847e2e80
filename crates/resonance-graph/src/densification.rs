//! Phase-lock network densification under perturbation cycles.
//!
//! A [`PhaseLockGraph`] holds one phase per oscillator and an undirected edge
//! set. A perturbation shifts every phase by `strength · N(0, 1)` and then
//! makes a fixed number of attempts to join a random pair; the pair locks
//! when its circular phase difference is below π/2. Clearance removes a few
//! random edges. Topological entropy is `S = k_B ln |E|`, or 0 for `|E| ≤ 1`.

use std::collections::BTreeSet;
use std::f64::consts::{FRAC_PI_2, TAU};

use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Boltzmann constant, J/K.
pub const BOLTZMANN: f64 = 1.380_649e-23;

/// Cycle and network setup for the densification experiments.
///
/// # Defaults
/// - 100 nodes, edge probability 0.05
/// - one drug cycle of strength 0.2 with 8 lock attempts, then 2 edges cleared
/// - memory run: 50 nodes, 10 cycles of strength 0.15, no clearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensificationConfig {
    pub nodes: usize,
    pub edge_probability: f64,
    pub drug_strength: f64,
    pub attempts_per_cycle: usize,
    pub clearance_edges: usize,
    pub memory_nodes: usize,
    pub memory_cycles: usize,
    pub memory_strength: f64,
    /// Edges expected per cycle, and the tolerance on the net change
    pub expected_edges_per_cycle: f64,
    pub edge_tolerance: f64,
    /// Seed for graphs, phases and pair choices (default: 42)
    pub seed: u64,
}

impl Default for DensificationConfig {
    fn default() -> Self {
        Self {
            nodes: 100,
            edge_probability: 0.05,
            drug_strength: 0.2,
            attempts_per_cycle: 8,
            clearance_edges: 2,
            memory_nodes: 50,
            memory_cycles: 10,
            memory_strength: 0.15,
            expected_edges_per_cycle: 8.0,
            edge_tolerance: 5.0,
            seed: 42,
        }
    }
}

impl DensificationConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.nodes < 2 || self.memory_nodes < 2 {
            return Err(ResonanceError::invalid(
                "densification.nodes",
                format!(
                    "need at least 2 nodes, got {} and {}",
                    self.nodes, self.memory_nodes
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.edge_probability) {
            return Err(ResonanceError::invalid(
                "densification.edge_probability",
                format!("must lie in [0, 1], got {}", self.edge_probability),
            ));
        }
        for (name, value) in [
            ("densification.drug_strength", self.drug_strength),
            ("densification.memory_strength", self.memory_strength),
            ("densification.edge_tolerance", self.edge_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ResonanceError::invalid(
                    name,
                    format!("must be finite and >= 0, got {value}"),
                ));
            }
        }
        if !self.expected_edges_per_cycle.is_finite() {
            return Err(ResonanceError::invalid(
                "densification.expected_edges_per_cycle",
                "must be finite",
            ));
        }
        Ok(())
    }
}

/// Oscillator phases plus the locked pairs between them.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseLockGraph {
    phases: Vec<f64>,
    /// Pairs stored as (low, high)
    edges: BTreeSet<(usize, usize)>,
}

impl PhaseLockGraph {
    /// Erdős–Rényi G(n, p) with phases drawn from U(0, 2π).
    pub fn random<R: Rng + ?Sized>(n: usize, p: f64, rng: &mut R) -> ResonanceResult<Self> {
        if !(0.0..=1.0).contains(&p) {
            return Err(ResonanceError::invalid(
                "edge_probability",
                format!("must lie in [0, 1], got {p}"),
            ));
        }
        let mut edges = BTreeSet::new();
        for i in 0..n {
            for j in i + 1..n {
                if rng.gen_bool(p) {
                    edges.insert((i, j));
                }
            }
        }
        let phases = (0..n).map(|_| rng.gen_range(0.0..TAU)).collect();
        Ok(Self { phases, edges })
    }

    pub fn node_count(&self) -> usize {
        self.phases.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// k_B ln |E|, zero for one edge or none.
    pub fn entropy(&self) -> f64 {
        if self.edges.len() > 1 {
            BOLTZMANN * (self.edges.len() as f64).ln()
        } else {
            0.0
        }
    }

    /// Shift every phase, then attempt `attempts` random locks.
    /// Returns the number of edges added.
    pub fn perturb<R: Rng + ?Sized>(&mut self, strength: f64, attempts: usize, rng: &mut R) -> usize {
        for phase in &mut self.phases {
            let kick: f64 = StandardNormal.sample(rng);
            *phase = (*phase + strength * kick).rem_euclid(TAU);
        }
        let n = self.phases.len();
        if n < 2 {
            return 0;
        }
        let mut added = 0;
        for _ in 0..attempts {
            let pair = sample(rng, n, 2);
            let (a, b) = (pair.index(0), pair.index(1));
            let key = (a.min(b), a.max(b));
            if self.edges.contains(&key) {
                continue;
            }
            if circular_difference(self.phases[a], self.phases[b]) < FRAC_PI_2 {
                self.edges.insert(key);
                added += 1;
            }
        }
        added
    }

    /// Remove up to `count` distinct random edges. Returns how many went.
    pub fn clear<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> usize {
        let total = self.edges.len();
        let count = count.min(total);
        if count == 0 {
            return 0;
        }
        let picked: BTreeSet<usize> = sample(rng, total, count).into_iter().collect();
        let doomed: Vec<(usize, usize)> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(i, _)| picked.contains(i))
            .map(|(_, &edge)| edge)
            .collect();
        for edge in &doomed {
            self.edges.remove(edge);
        }
        doomed.len()
    }
}

/// Distance between two angles on the circle, in [0, π].
pub fn circular_difference(a: f64, b: f64) -> f64 {
    let d = (a - b).rem_euclid(TAU);
    d.min(TAU - d)
}

/// Edge count and entropy at one point of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub edge_count: usize,
    pub entropy: f64,
}

impl StateSnapshot {
    pub fn of(graph: &PhaseLockGraph) -> Self {
        Self {
            edge_count: graph.edge_count(),
            entropy: graph.entropy(),
        }
    }
}

/// Initial, mixed and cleared states of one drug cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrreversibilityCycle {
    pub initial: StateSnapshot,
    pub mixed: StateSnapshot,
    pub cleared: StateSnapshot,
    pub added_during_mixing: usize,
    pub removed_during_clearing: usize,
    pub net_change: i64,
    pub entropy_change: f64,
    /// The cleared state keeps more edges than the initial one
    pub irreversible: bool,
}

/// Many cycles without clearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryTrace {
    pub cycles: usize,
    pub baseline_edges: usize,
    pub final_edges: usize,
    pub net_change: i64,
    /// Edge count before the first cycle and after each one
    pub edge_history: Vec<usize>,
}

fn net(after: usize, before: usize) -> i64 {
    after as i64 - before as i64
}

/// Perturb once, clear, and compare against the initial network.
pub fn irreversibility_cycle(config: &DensificationConfig) -> ResonanceResult<IrreversibilityCycle> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut graph = PhaseLockGraph::random(config.nodes, config.edge_probability, &mut rng)?;
    let initial = StateSnapshot::of(&graph);

    let added_during_mixing =
        graph.perturb(config.drug_strength, config.attempts_per_cycle, &mut rng);
    let mixed = StateSnapshot::of(&graph);

    let removed_during_clearing = graph.clear(config.clearance_edges, &mut rng);
    let cleared = StateSnapshot::of(&graph);

    let cycle = IrreversibilityCycle {
        initial,
        mixed,
        cleared,
        added_during_mixing,
        removed_during_clearing,
        net_change: net(cleared.edge_count, initial.edge_count),
        entropy_change: cleared.entropy - initial.entropy,
        irreversible: cleared.edge_count > initial.edge_count,
    };
    debug!(
        initial = initial.edge_count,
        mixed = mixed.edge_count,
        cleared = cleared.edge_count,
        "drug cycle"
    );
    Ok(cycle)
}

/// Repeated perturbation of a smaller network.
pub fn memory_trace(config: &DensificationConfig) -> ResonanceResult<MemoryTrace> {
    config.validate()?;
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
    let mut graph =
        PhaseLockGraph::random(config.memory_nodes, config.edge_probability, &mut rng)?;
    let baseline_edges = graph.edge_count();
    let mut edge_history = Vec::with_capacity(config.memory_cycles + 1);
    edge_history.push(baseline_edges);
    for _ in 0..config.memory_cycles {
        graph.perturb(config.memory_strength, config.attempts_per_cycle, &mut rng);
        edge_history.push(graph.edge_count());
    }
    let final_edges = graph.edge_count();
    Ok(MemoryTrace {
        cycles: config.memory_cycles,
        baseline_edges,
        final_edges,
        net_change: net(final_edges, baseline_edges),
        edge_history,
    })
}
