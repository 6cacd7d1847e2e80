//! Harmonic network construction and topology analysis.
//!
//! Base frequencies are expanded into harmonics `n·f` for `n ∈ [1, N]`, and
//! two harmonics are joined by a coincidence edge when their frequencies
//! differ by less than the threshold Δf. Edges are found with a sorted
//! sliding window, so a build costs O(V log V + E) rather than O(V²).
//!
//! # Architecture
//!
//! - **config**: `HarmonicConfig` with validation
//! - **network**: `HarmonicNetwork` arena (nodes, edges, CSR adjacency) and builder
//! - **stats**: `NetworkStatistics` derived purely from the node and edge sets
//! - **traversal**: BFS distances and connected components
//! - **small_world**: small-world coefficient σ against a random reference
//! - **export**: JSON and GEXF interchange files
//! - **densification**: phase-lock graphs under perturbation and clearance cycles
//!
//! # Example
//!
//! ```
//! use resonance_core::Frequency;
//! use resonance_graph::{HarmonicConfig, HarmonicNetworkBuilder};
//!
//! let bases = vec![Frequency::new(1e9).unwrap(), Frequency::new(5e14).unwrap()];
//! let config = HarmonicConfig { max_harmonic: 10, coincidence_threshold_hz: 1e9, ..Default::default() };
//! let network = HarmonicNetworkBuilder::new(config).unwrap().build(&bases).unwrap();
//! assert_eq!(network.node_count(), 20);
//! ```

pub mod config;
pub mod densification;
pub mod export;
pub mod network;
pub mod small_world;
pub mod stats;
pub mod traversal;

pub use config::HarmonicConfig;
pub use densification::{
    irreversibility_cycle, memory_trace, DensificationConfig, IrreversibilityCycle, MemoryTrace,
    PhaseLockGraph, StateSnapshot,
};
pub use network::{CoincidenceEdge, HarmonicNetwork, HarmonicNetworkBuilder, HarmonicNode, NodeId};
pub use small_world::SmallWorldAnalysis;
pub use stats::{DegreeSummary, NetworkStatistics};
