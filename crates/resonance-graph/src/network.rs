//! Harmonic network arena and builder.
//!
//! Nodes are stored once in a `Vec` and addressed by a dense [`NodeId`].
//! Edges are kept as a sorted list of `(low, high)` id pairs, plus a CSR
//! adjacency (offsets + neighbor ids) for degree and neighborhood queries.
//! Every statistic is derived from these two sets; nothing is cached.

use std::cmp::Ordering;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::Frequency;

use crate::config::HarmonicConfig;

/// Dense node identifier, local to one network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// One harmonic `harmonic_index · base` of a base frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicNode {
    pub id: NodeId,
    /// Index of the base frequency in [`HarmonicNetwork::sources`].
    pub source_id: usize,
    /// n ∈ [1, N]
    pub harmonic_index: u32,
    pub frequency_hz: f64,
}

/// Unordered coincidence between two distinct nodes, stored with `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoincidenceEdge {
    pub low: NodeId,
    pub high: NodeId,
}

impl CoincidenceEdge {
    /// Normalize a pair into `low < high`. Returns `None` for self-loops.
    pub fn new(a: NodeId, b: NodeId) -> Option<Self> {
        match a.cmp(&b) {
            Ordering::Less => Some(Self { low: a, high: b }),
            Ordering::Greater => Some(Self { low: b, high: a }),
            Ordering::Equal => None,
        }
    }
}

/// Harmonic coincidence graph.
#[derive(Debug, Clone, Default)]
pub struct HarmonicNetwork {
    sources: Vec<Frequency>,
    nodes: Vec<HarmonicNode>,
    edges: Vec<CoincidenceEdge>,
    offsets: Vec<usize>,
    neighbors: Vec<NodeId>,
    threshold_hz: f64,
}

impl HarmonicNetwork {
    /// The network with no nodes and no edges.
    pub fn empty() -> Self {
        Self {
            offsets: vec![0],
            ..Self::default()
        }
    }

    /// Assemble a network from nodes and edges, building the adjacency.
    fn assemble(
        sources: Vec<Frequency>,
        nodes: Vec<HarmonicNode>,
        mut edges: Vec<CoincidenceEdge>,
        threshold_hz: f64,
    ) -> Self {
        edges.sort_unstable();
        edges.dedup();

        let mut degree = vec![0usize; nodes.len()];
        for edge in &edges {
            degree[edge.low.index()] += 1;
            degree[edge.high.index()] += 1;
        }
        let mut offsets = Vec::with_capacity(nodes.len() + 1);
        offsets.push(0);
        for d in &degree {
            let last = offsets[offsets.len() - 1];
            offsets.push(last + d);
        }
        let mut cursor: Vec<usize> = offsets[..nodes.len()].to_vec();
        let mut neighbors = vec![NodeId(0); edges.len() * 2];
        for edge in &edges {
            neighbors[cursor[edge.low.index()]] = edge.high;
            cursor[edge.low.index()] += 1;
            neighbors[cursor[edge.high.index()]] = edge.low;
            cursor[edge.high.index()] += 1;
        }
        for i in 0..nodes.len() {
            neighbors[offsets[i]..offsets[i + 1]].sort_unstable();
        }

        Self {
            sources,
            nodes,
            edges,
            offsets,
            neighbors,
            threshold_hz,
        }
    }

    pub fn sources(&self) -> &[Frequency] {
        &self.sources
    }

    pub fn nodes(&self) -> &[HarmonicNode] {
        &self.nodes
    }

    /// Edges sorted by `(low, high)`.
    pub fn edges(&self) -> &[CoincidenceEdge] {
        &self.edges
    }

    pub fn node(&self, id: NodeId) -> Option<&HarmonicNode> {
        self.nodes.get(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn threshold_hz(&self) -> f64 {
        self.threshold_hz
    }

    /// Sorted neighbor ids of `id`; empty for unknown ids.
    pub fn neighbors(&self, id: NodeId) -> &[NodeId] {
        let i = id.index();
        if i >= self.nodes.len() {
            return &[];
        }
        &self.neighbors[self.offsets[i]..self.offsets[i + 1]]
    }

    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors(id).len()
    }

    /// Σ degree over all nodes, counted directly from the adjacency.
    pub fn degree_sum(&self) -> usize {
        (0..self.nodes.len())
            .map(|i| self.offsets[i + 1] - self.offsets[i])
            .sum()
    }

    /// ⟨k⟩ = 2E / V; 0 for an empty network.
    pub fn average_degree(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        2.0 * self.edges.len() as f64 / self.nodes.len() as f64
    }

    /// Whether `a` and `b` share an edge.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Local clustering coefficient of one node; 0 when its degree is below 2.
    pub fn local_clustering(&self, id: NodeId) -> f64 {
        let mut marks = vec![false; self.nodes.len()];
        self.local_clustering_marked(id, &mut marks)
    }

    /// Mean local clustering over the given nodes; 0 for an empty selection.
    pub fn mean_clustering<I: IntoIterator<Item = NodeId>>(&self, ids: I) -> f64 {
        let mut marks = vec![false; self.nodes.len()];
        let (sum, count) = ids.into_iter().fold((0.0, 0usize), |(s, c), id| {
            (s + self.local_clustering_marked(id, &mut marks), c + 1)
        });
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }

    /// Counts links among the neighbors of `id` using `marks` as scratch.
    /// `marks` is all-false on entry and on return.
    fn local_clustering_marked(&self, id: NodeId, marks: &mut [bool]) -> f64 {
        let own = self.neighbors(id);
        let k = own.len();
        if k < 2 {
            return 0.0;
        }
        for &u in own {
            marks[u.index()] = true;
        }
        let mut triangles = 0usize;
        for &u in own {
            let adjacent = self.neighbors(u);
            // Only w > u, so each neighbor-neighbor link is counted once.
            let from = adjacent.partition_point(|&w| w <= u);
            triangles += adjacent[from..].iter().filter(|w| marks[w.index()]).count();
        }
        for &u in own {
            marks[u.index()] = false;
        }
        let possible = k * (k - 1) / 2;
        triangles as f64 / possible as f64
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

/// Builds [`HarmonicNetwork`]s from base frequencies.
#[derive(Debug, Clone)]
pub struct HarmonicNetworkBuilder {
    config: HarmonicConfig,
}

impl HarmonicNetworkBuilder {
    /// Create a builder after validating `config`.
    ///
    /// # Errors
    /// `InvalidParameter` when Δf ≤ 0 or N < 1.
    pub fn new(config: HarmonicConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarmonicConfig {
        &self.config
    }

    /// Expand `bases` into harmonics and connect coincident pairs.
    ///
    /// Empty input yields [`HarmonicNetwork::empty`]. The result depends
    /// only on `bases` and the configuration.
    pub fn build(&self, bases: &[Frequency]) -> ResonanceResult<HarmonicNetwork> {
        let started = Instant::now();
        let threshold = self.config.coincidence_threshold_hz;
        if bases.is_empty() {
            debug!("no base frequencies, returning empty network");
            return Ok(HarmonicNetwork {
                threshold_hz: threshold,
                ..HarmonicNetwork::empty()
            });
        }

        let n_max = self.config.max_harmonic;
        let total = bases.len() as u64 * u64::from(n_max);
        if total > u64::from(u32::MAX) {
            return Err(ResonanceError::invalid(
                "max_harmonic",
                format!("{} bases x {} harmonics exceeds the node id space", bases.len(), n_max),
            ));
        }

        let mut nodes = Vec::with_capacity(total as usize);
        for (source_id, base) in bases.iter().enumerate() {
            for n in 1..=n_max {
                let frequency_hz = f64::from(n) * base.hz();
                if !frequency_hz.is_finite() {
                    return Err(ResonanceError::invalid(
                        "max_harmonic",
                        format!("harmonic {n} of base {} Hz overflows to {frequency_hz}", base.hz()),
                    ));
                }
                nodes.push(HarmonicNode {
                    id: NodeId(nodes.len() as u32),
                    source_id,
                    harmonic_index: n,
                    frequency_hz,
                });
            }
        }

        // Sort by frequency, ties by id, then slide a window of width Δf.
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_unstable_by(|&a, &b| {
            nodes[a]
                .frequency_hz
                .total_cmp(&nodes[b].frequency_hz)
                .then(a.cmp(&b))
        });

        let mut edges = Vec::new();
        for (pos, &a) in order.iter().enumerate() {
            let fa = nodes[a].frequency_hz;
            for &b in &order[pos + 1..] {
                let gap = nodes[b].frequency_hz - fa;
                if gap.is_nan() || gap >= threshold {
                    break;
                }
                if let Some(edge) = CoincidenceEdge::new(nodes[a].id, nodes[b].id) {
                    edges.push(edge);
                }
            }
        }

        let network = HarmonicNetwork::assemble(bases.to_vec(), nodes, edges, threshold);
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built harmonic network"
        );
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(n: u32, threshold: f64) -> HarmonicNetworkBuilder {
        HarmonicNetworkBuilder::new(HarmonicConfig {
            max_harmonic: n,
            coincidence_threshold_hz: threshold,
            ..Default::default()
        })
        .unwrap()
    }

    fn bases(values: &[f64]) -> Vec<Frequency> {
        values.iter().map(|&hz| Frequency::new(hz).unwrap()).collect()
    }

    #[test]
    fn test_empty_input_yields_empty_network() {
        let network = builder(10, 1.0).build(&[]).unwrap();
        assert!(network.is_empty());
        assert_eq!(network.edge_count(), 0);
        assert_eq!(network.average_degree(), 0.0);
        assert_eq!(network.degree_sum(), 0);
    }

    #[test]
    fn test_invalid_config_rejected_by_builder() {
        let zero_n = HarmonicNetworkBuilder::new(HarmonicConfig {
            max_harmonic: 0,
            ..Default::default()
        });
        assert!(matches!(zero_n, Err(ResonanceError::InvalidParameter { .. })));
        let bad_threshold = HarmonicNetworkBuilder::new(HarmonicConfig {
            coincidence_threshold_hz: 0.0,
            ..Default::default()
        });
        assert!(matches!(bad_threshold, Err(ResonanceError::InvalidParameter { .. })));
    }

    #[test]
    fn test_harmonic_frequencies() {
        let network = builder(3, 0.5).build(&bases(&[10.0])).unwrap();
        let freqs: Vec<f64> = network.nodes().iter().map(|n| n.frequency_hz).collect();
        assert_eq!(freqs, vec![10.0, 20.0, 30.0]);
        assert_eq!(network.nodes()[2].harmonic_index, 3);
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 10 and 20 differ by exactly 10: not coincident at Δf = 10.
        let network = builder(2, 10.0).build(&bases(&[10.0])).unwrap();
        assert_eq!(network.edge_count(), 0);
        let network = builder(2, 10.5).build(&bases(&[10.0])).unwrap();
        assert_eq!(network.edge_count(), 1);
    }

    #[test]
    fn test_identical_frequencies_from_distinct_sources_connect() {
        // 2·10 == 1·20: distinct nodes, zero difference.
        let network = builder(2, 1.0).build(&bases(&[10.0, 20.0])).unwrap();
        assert_eq!(network.node_count(), 4);
        assert_eq!(network.edge_count(), 1);
        let edge = network.edges()[0];
        assert_eq!(edge, CoincidenceEdge::new(NodeId(1), NodeId(2)).unwrap());
    }

    #[test]
    fn test_window_matches_brute_force() {
        let b = bases(&[1.0, 1.3, 2.9, 7.1, 0.45]);
        let network = builder(12, 1.1).build(&b).unwrap();
        let mut expected = Vec::new();
        let nodes = network.nodes();
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                if (nodes[i].frequency_hz - nodes[j].frequency_hz).abs() < 1.1 {
                    expected.push(CoincidenceEdge::new(nodes[i].id, nodes[j].id).unwrap());
                }
            }
        }
        expected.sort_unstable();
        assert_eq!(network.edges(), expected.as_slice());
    }

    #[test]
    fn test_adjacency_symmetric_and_sorted() {
        let network = builder(20, 2.5).build(&bases(&[1.0, 1.7, 3.2])).unwrap();
        for id in network.node_ids() {
            let ns = network.neighbors(id);
            assert!(ns.windows(2).all(|w| w[0] < w[1]));
            for &n in ns {
                assert_ne!(n, id);
                assert!(network.has_edge(n, id));
            }
        }
        assert_eq!(network.degree_sum(), 2 * network.edge_count());
    }

    #[test]
    fn test_local_clustering_of_clique() {
        // All five harmonics of 1 Hz are within Δf = 10: a 5-clique.
        let network = builder(5, 10.0).build(&bases(&[1.0])).unwrap();
        assert_eq!(network.edge_count(), 10);
        for id in network.node_ids() {
            assert!((network.local_clustering(id) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_local_clustering_of_path() {
        // Path 1-2-3: middle node has two unlinked neighbors.
        let network = builder(3, 1.5).build(&bases(&[1.0])).unwrap();
        assert_eq!(network.edge_count(), 2);
        assert_eq!(network.local_clustering(NodeId(1)), 0.0);
        assert_eq!(network.local_clustering(NodeId(0)), 0.0);
        assert_eq!(network.mean_clustering(std::iter::empty()), 0.0);
    }

    #[test]
    fn test_overflowing_harmonics_rejected() {
        // 2·1e308 and 3·1e308 are +inf; inf - inf must not become an edge.
        let err = builder(3, 1.0).build(&bases(&[1e308])).unwrap_err();
        assert!(matches!(
            err,
            ResonanceError::InvalidParameter { ref parameter, .. } if parameter == "max_harmonic"
        ));

        let network = builder(1, 1.0).build(&bases(&[1e308])).unwrap();
        assert_eq!(network.node_count(), 1);
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn test_unknown_node_has_no_neighbors() {
        let network = builder(2, 1.0).build(&bases(&[5.0])).unwrap();
        assert!(network.neighbors(NodeId(99)).is_empty());
        assert!(network.node(NodeId(99)).is_none());
    }
}
