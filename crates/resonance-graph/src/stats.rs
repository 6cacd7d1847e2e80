//! Topology statistics of a harmonic network.
//!
//! [`NetworkStatistics::compute`] is a pure function of the node and edge
//! sets (plus the seed used for sampled estimates). An empty network yields
//! all-zero statistics, never NaN.

use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HarmonicConfig;
use crate::network::{HarmonicNetwork, NodeId};
use crate::traversal::connected_components;

/// Summary of the degree distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DegreeSummary {
    pub min: usize,
    pub max: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
}

impl DegreeSummary {
    fn of(mut degrees: Vec<usize>) -> Self {
        if degrees.is_empty() {
            return Self::default();
        }
        degrees.sort_unstable();
        let n = degrees.len();
        let mean = degrees.iter().sum::<usize>() as f64 / n as f64;
        let var = degrees
            .iter()
            .map(|&d| (d as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let median = if n % 2 == 1 {
            degrees[n / 2] as f64
        } else {
            (degrees[n / 2 - 1] + degrees[n / 2]) as f64 / 2.0
        };
        Self {
            min: degrees[0],
            max: degrees[n - 1],
            mean,
            median,
            std: var.sqrt(),
        }
    }
}

/// Statistics derived from a [`HarmonicNetwork`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    /// ⟨k⟩ = 2E / V
    pub average_degree: f64,
    pub degree: DegreeSummary,
    /// 2E / (V (V - 1))
    pub density: f64,
    /// Mean local clustering coefficient ρ.
    pub clustering_coefficient: f64,
    /// Nodes the clustering estimate was computed over.
    pub clustering_nodes: usize,
    pub component_count: usize,
    pub largest_component_size: usize,
    /// F = ⟨k⟩² / (1 + ρ)
    pub enhancement_factor: f64,
}

impl NetworkStatistics {
    /// Compute statistics; clustering is exact up to
    /// `config.clustering_sample_size` nodes and sampled (seeded) above.
    pub fn compute(network: &HarmonicNetwork, config: &HarmonicConfig) -> Self {
        let node_count = network.node_count();
        if node_count == 0 {
            return Self::default();
        }
        let edge_count = network.edge_count();
        let average_degree = network.average_degree();
        let degree = DegreeSummary::of(network.node_ids().map(|id| network.degree(id)).collect());
        let density = if node_count > 1 {
            2.0 * edge_count as f64 / (node_count as f64 * (node_count as f64 - 1.0))
        } else {
            0.0
        };

        let (clustering_coefficient, clustering_nodes) =
            if node_count > config.clustering_sample_size {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
                let picked = sample(&mut rng, node_count, config.clustering_sample_size);
                let ids: Vec<NodeId> = picked.into_iter().map(|i| NodeId(i as u32)).collect();
                (network.mean_clustering(ids.iter().copied()), ids.len())
            } else {
                (network.mean_clustering(network.node_ids()), node_count)
            };

        let components = connected_components(network);
        let largest_component_size = components.iter().map(Vec::len).max().unwrap_or(0);

        let stats = Self {
            node_count,
            edge_count,
            average_degree,
            degree,
            density,
            clustering_coefficient,
            clustering_nodes,
            component_count: components.len(),
            largest_component_size,
            enhancement_factor: enhancement_factor(average_degree, clustering_coefficient),
        };
        debug!(
            nodes = node_count,
            edges = edge_count,
            avg_degree = average_degree,
            clustering = clustering_coefficient,
            "computed network statistics"
        );
        stats
    }

    /// ⟨k⟩ recomputed from Σ degree / V.
    pub fn average_degree_from_degree_sum(network: &HarmonicNetwork) -> f64 {
        if network.is_empty() {
            return 0.0;
        }
        network.degree_sum() as f64 / network.node_count() as f64
    }
}

/// F = ⟨k⟩² / (1 + ρ).
pub fn enhancement_factor(average_degree: f64, clustering: f64) -> f64 {
    average_degree * average_degree / (1.0 + clustering)
}
