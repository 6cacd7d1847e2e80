//! Breadth-first traversal over a harmonic network.
//!
//! Uses a `VecDeque` frontier and a dense visited vector indexed by node id.

use std::collections::VecDeque;

use crate::network::{HarmonicNetwork, NodeId};

/// Hop distance from `start` to every node; `None` for unreachable nodes.
pub fn bfs_distances(network: &HarmonicNetwork, start: NodeId) -> Vec<Option<u32>> {
    let mut distances = vec![None; network.node_count()];
    if start.index() >= distances.len() {
        return distances;
    }
    let mut frontier: VecDeque<NodeId> = VecDeque::with_capacity(network.node_count().min(1024));
    distances[start.index()] = Some(0);
    frontier.push_back(start);

    while let Some(current) = frontier.pop_front() {
        let next = distances[current.index()].map_or(0, |d| d + 1);
        for &neighbor in network.neighbors(current) {
            if distances[neighbor.index()].is_none() {
                distances[neighbor.index()] = Some(next);
                frontier.push_back(neighbor);
            }
        }
    }
    distances
}

/// Connected components, each listed in ascending id order.
/// Components are ordered by their smallest member.
pub fn connected_components(network: &HarmonicNetwork) -> Vec<Vec<NodeId>> {
    let mut visited = vec![false; network.node_count()];
    let mut components = Vec::new();
    let mut frontier: VecDeque<NodeId> = VecDeque::new();

    for root in network.node_ids() {
        if visited[root.index()] {
            continue;
        }
        visited[root.index()] = true;
        frontier.push_back(root);
        let mut members = Vec::new();
        while let Some(current) = frontier.pop_front() {
            members.push(current);
            for &neighbor in network.neighbors(current) {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    frontier.push_back(neighbor);
                }
            }
        }
        members.sort_unstable();
        components.push(members);
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HarmonicConfig;
    use crate::network::HarmonicNetworkBuilder;
    use resonance_core::Frequency;

    fn path_network(len: u32) -> HarmonicNetwork {
        HarmonicNetworkBuilder::new(HarmonicConfig {
            max_harmonic: len,
            coincidence_threshold_hz: 1.5,
            ..Default::default()
        })
        .unwrap()
        .build(&[Frequency::new(1.0).unwrap()])
        .unwrap()
    }

    #[test]
    fn test_bfs_distances_on_path() {
        let net = path_network(5);
        let d = bfs_distances(&net, NodeId(0));
        assert_eq!(d, vec![Some(0), Some(1), Some(2), Some(3), Some(4)]);
    }

    #[test]
    fn test_bfs_unknown_start() {
        let net = path_network(3);
        assert!(bfs_distances(&net, NodeId(10)).iter().all(Option::is_none));
    }

    #[test]
    fn test_components_split_by_gap() {
        let net = HarmonicNetworkBuilder::new(HarmonicConfig {
            max_harmonic: 2,
            coincidence_threshold_hz: 1.5,
            ..Default::default()
        })
        .unwrap()
        .build(&[Frequency::new(1.0).unwrap(), Frequency::new(100.0).unwrap()])
        .unwrap();
        // {1, 2} and {100} and {200}
        let components = connected_components(&net);
        assert_eq!(components.len(), 3);
        assert_eq!(components[0], vec![NodeId(0), NodeId(1)]);
    }
}
