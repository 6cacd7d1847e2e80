//! Small-world analysis against an Erdős–Rényi reference.
//!
//! σ = (C / C_random) / (L / L_random) with C_random = ⟨k⟩ / V and
//! L_random = ln V / ln ⟨k⟩. σ > 1 indicates small-world structure.

use rand::seq::index::sample;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HarmonicConfig;
use crate::network::{HarmonicNetwork, NodeId};
use crate::stats::NetworkStatistics;
use crate::traversal::{bfs_distances, connected_components};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmallWorldAnalysis {
    pub clustering: f64,
    pub clustering_random: f64,
    /// Mean shortest path length inside the largest component.
    pub average_path_length: f64,
    pub path_length_random: f64,
    /// BFS sources used for the path length estimate.
    pub path_sources: usize,
    /// `None` when the reference quantities are undefined (⟨k⟩ ≤ 1, L = 0).
    pub sigma: Option<f64>,
}

impl SmallWorldAnalysis {
    pub fn analyze(
        network: &HarmonicNetwork,
        stats: &NetworkStatistics,
        config: &HarmonicConfig,
    ) -> Self {
        let n = stats.node_count as f64;
        let k = stats.average_degree;
        let clustering = stats.clustering_coefficient;
        let clustering_random = if n > 0.0 { k / n } else { 0.0 };

        let (average_path_length, path_sources) = average_path_length(network, config);
        let path_length_random = if k > 1.0 && n > 1.0 { n.ln() / k.ln() } else { 0.0 };

        let sigma = if clustering_random > 0.0 && average_path_length > 0.0 && path_length_random > 0.0
        {
            Some((clustering / clustering_random) / (average_path_length / path_length_random))
        } else {
            None
        };
        debug!(?sigma, l = average_path_length, "small-world analysis");

        Self {
            clustering,
            clustering_random,
            average_path_length,
            path_length_random,
            path_sources,
            sigma,
        }
    }

    pub fn is_small_world(&self) -> bool {
        self.sigma.is_some_and(|s| s > 1.0)
    }
}

/// Mean hop distance over ordered pairs in the largest component, from a
/// seeded sample of at most `config.path_length_sources` sources.
fn average_path_length(network: &HarmonicNetwork, config: &HarmonicConfig) -> (f64, usize) {
    let largest = connected_components(network)
        .into_iter()
        .max_by_key(Vec::len)
        .unwrap_or_default();
    if largest.len() < 2 {
        return (0.0, 0);
    }

    let sources: Vec<NodeId> = if largest.len() > config.path_length_sources {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(1));
        sample(&mut rng, largest.len(), config.path_length_sources)
            .into_iter()
            .map(|i| largest[i])
            .collect()
    } else {
        largest.clone()
    };

    let mut total = 0u64;
    let mut pairs = 0u64;
    for &source in &sources {
        for d in bfs_distances(network, source).into_iter().flatten() {
            if d > 0 {
                total += u64::from(d);
                pairs += 1;
            }
        }
    }
    if pairs == 0 {
        return (0.0, sources.len());
    }
    (total as f64 / pairs as f64, sources.len())
}
