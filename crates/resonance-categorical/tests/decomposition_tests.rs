//! Integration tests for the ternary decomposition engine.
//!
//! Covers completeness (volume, disjointness, unique labels) for every depth
//! from 0 to 10 and the equal-range-thirds splitting policy.

use std::collections::HashSet;

use resonance_categorical::{
    CategoricalCoordinate, DecompositionConfig, Region, TernaryDecomposition,
};
use resonance_core::tolerances::VOLUME_RELATIVE_EPS;

fn default_region() -> Region {
    DecompositionConfig::default().region().unwrap()
}

// ========== Completeness Tests ==========

#[test]
fn test_volume_reconstruction_all_depths() {
    let root = default_region();
    for depth in 0..=10 {
        let d = TernaryDecomposition::new(root, depth).unwrap();
        let audit = d.audit(1000, 42);
        assert_eq!(audit.channel_count, 3u64.pow(depth as u32));
        assert!(
            audit.relative_volume_error < VOLUME_RELATIVE_EPS,
            "depth {depth}: rel err {}",
            audit.relative_volume_error
        );
        assert!(audit.labels_unique, "depth {depth}: duplicate labels");
        assert_eq!(audit.overlapping_pairs, 0, "depth {depth}: overlap");
        println!("[VERIFIED] depth {depth}: {} channels", audit.channel_count);
    }
}

#[test]
fn test_no_overlap_exhaustive_depth_five() {
    let d = TernaryDecomposition::new(Region::unit(), 5).unwrap();
    let channels: Vec<_> = d.channels().collect();
    for (i, a) in channels.iter().enumerate() {
        for b in &channels[i + 1..] {
            assert!(!a.region.overlaps(&b.region), "{} overlaps {}", a.path, b.path);
        }
    }
}

#[test]
fn test_labels_unique_depth_ten() {
    let d = TernaryDecomposition::new(default_region(), 10).unwrap();
    let mut seen = HashSet::with_capacity(59_049);
    for channel in d.channels() {
        assert_eq!(channel.path.depth(), 10);
        assert!(seen.insert(channel.path.to_string()));
    }
    assert_eq!(seen.len(), 59_049);
}

#[test]
fn test_every_centre_lies_in_exactly_its_channel() {
    let d = TernaryDecomposition::new(Region::unit(), 4).unwrap();
    let channels: Vec<_> = d.channels().collect();
    for channel in &channels {
        let centre = channel.region.centre();
        let holders = channels.iter().filter(|c| c.region.contains(&centre)).count();
        assert_eq!(holders, 1);
    }
}

#[test]
fn test_labels_match_geometric_descent() {
    let d = TernaryDecomposition::new(default_region(), 6).unwrap();
    for channel in d.channels() {
        assert!(d.label_matches(&channel), "{} mislabelled", channel.path);
        let corner = CategoricalCoordinate::from(channel.region.upper());
        assert!(d.locate(&corner).is_some());
    }
    let outside = CategoricalCoordinate::new(-1.0, 0.0, 5.0);
    assert!(d.locate(&outside).is_none());
    println!("[VERIFIED] 729 labels agree with root-to-leaf descent");
}

// ========== Splitting Policy Tests ==========

#[test]
fn test_unit_cube_depth_two() {
    let d = TernaryDecomposition::new(Region::unit(), 2).unwrap();
    let channels: Vec<_> = d.channels().collect();
    assert_eq!(channels.len(), 9);
    for channel in &channels {
        let r = channel.region;
        // Knowledge and time split once each; entropy untouched.
        assert!((r.upper()[0] - r.lower()[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((r.upper()[1] - r.lower()[1] - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(r.lower()[2], 0.0);
        assert_eq!(r.upper()[2], 1.0);
        assert!((r.volume() - 1.0 / 9.0).abs() < 1e-12);
    }
    let labels: Vec<String> = channels.iter().map(|c| c.path.to_string()).collect();
    assert_eq!(labels[0], "LL");
    assert_eq!(labels[4], "MM");
    assert_eq!(labels[8], "HH");
}

#[test]
fn test_negative_depth_is_invalid_parameter() {
    let err = TernaryDecomposition::new(Region::unit(), -3).unwrap_err();
    assert_eq!(err.kind(), "invalid_parameter");
}
