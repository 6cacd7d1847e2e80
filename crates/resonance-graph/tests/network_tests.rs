//! Integration tests for harmonic network construction and statistics.
//!
//! Builds real networks from the representative frequency table as well as
//! small hand-checked inputs.

use std::time::Instant;

use resonance_core::source::{FrequencySource, StaticFrequencySource};
use resonance_core::Frequency;
use resonance_graph::export::GraphExport;
use resonance_graph::{
    HarmonicConfig, HarmonicNetwork, HarmonicNetworkBuilder, NetworkStatistics, SmallWorldAnalysis,
};

fn build(bases: &[f64], n: u32, threshold: f64) -> HarmonicNetwork {
    let freqs: Vec<Frequency> = bases.iter().map(|&hz| Frequency::new(hz).unwrap()).collect();
    HarmonicNetworkBuilder::new(HarmonicConfig {
        max_harmonic: n,
        coincidence_threshold_hz: threshold,
        ..Default::default()
    })
    .unwrap()
    .build(&freqs)
    .unwrap()
}

// ========== Scenario Tests ==========

#[test]
fn test_two_bases_ten_harmonics() {
    let network = build(&[1e9, 5e14], 10, 1e9);
    let stats = NetworkStatistics::compute(&network, &HarmonicConfig::default());
    assert_eq!(stats.node_count, 20);
    assert_eq!(network.node_count(), 20);
    assert!(stats.average_degree >= 0.0);
    assert!(stats.enhancement_factor >= 0.0);
    println!(
        "[VERIFIED] 20 nodes, {} edges, <k> = {}",
        stats.edge_count, stats.average_degree
    );
}

#[test]
fn test_representative_table_scale() {
    let bases = StaticFrequencySource::representative().frequencies().unwrap();
    let config = HarmonicConfig::default();
    let network = HarmonicNetworkBuilder::new(config.clone())
        .unwrap()
        .build(&bases)
        .unwrap();
    assert_eq!(network.node_count(), 1950);
    assert!(network.edge_count() > 100_000, "edges = {}", network.edge_count());

    let stats = NetworkStatistics::compute(&network, &config);
    assert_eq!(stats.clustering_nodes, config.clustering_sample_size);
    assert!((0.0..=1.0).contains(&stats.clustering_coefficient));
    assert!(stats.largest_component_size <= stats.node_count);
}

// ========== Performance Tests ==========

#[test]
fn test_two_thousand_nodes_build_quickly() {
    let bases: Vec<f64> = (0..20).map(|i| 1.0e9 + i as f64 * 7.3e7).collect();
    let started = Instant::now();
    let network = build(&bases, 100, 5e8);
    let elapsed = started.elapsed();
    assert_eq!(network.node_count(), 2000);
    assert!(elapsed.as_secs_f64() < 1.0, "build took {elapsed:?}");
}

// ========== Invariant Tests ==========

#[test]
fn test_builds_are_deterministic() {
    let bases = [3.5e9, 2.0e9, 1.6e9, 2.4e9, 60.0, 1.0];
    let a = build(&bases, 80, 1e9);
    let b = build(&bases, 80, 1e9);
    assert_eq!(a.nodes(), b.nodes());
    assert_eq!(a.edges(), b.edges());
}

#[test]
fn test_average_degree_consistency_across_inputs() {
    let cases: [(&[f64], u32, f64); 4] = [
        (&[1.0], 1, 1.0),
        (&[1.0, 1.1, 1.21], 50, 0.4),
        (&[3.5e9, 2.4e9, 60.0], 150, 1e9),
        (&[7.0, 11.0, 13.0, 17.0], 64, 3.0),
    ];
    for (bases, n, threshold) in cases {
        let network = build(bases, n, threshold);
        let from_edges = network.average_degree();
        let from_degrees = NetworkStatistics::average_degree_from_degree_sum(&network);
        assert!(
            (from_edges - from_degrees).abs() < resonance_core::tolerances::DEGREE_CONSISTENCY_EPS,
            "{from_edges} != {from_degrees}"
        );
    }
}

#[test]
fn test_no_self_loops_or_duplicates() {
    let network = build(&[1.0, 2.0, 3.0], 30, 1.5);
    let mut seen = std::collections::HashSet::new();
    for edge in network.edges() {
        assert!(edge.low < edge.high);
        assert!(seen.insert((edge.low, edge.high)));
        let fl = network.node(edge.low).unwrap().frequency_hz;
        let fh = network.node(edge.high).unwrap().frequency_hz;
        assert!((fl - fh).abs() < 1.5);
    }
}

#[test]
fn test_small_world_and_export_on_real_network() {
    let network = build(&[1.0, 1.37, 2.11], 120, 2.0);
    let config = HarmonicConfig::default();
    let stats = NetworkStatistics::compute(&network, &config);
    let analysis = SmallWorldAnalysis::analyze(&network, &stats, &config);
    assert!(analysis.average_path_length > 1.0);
    let export = GraphExport::from_network(&network);
    assert_eq!(export.nodes.len(), stats.node_count);
    assert_eq!(export.edges.len(), stats.edge_count);
}
