//! Recursive ternary decomposition into channels.
//!
//! Level `l` (0-based) splits every region of level `l` into low/mid/high
//! equal-range thirds along axis `l mod 3`. A depth-d decomposition has 3^d
//! leaf channels. Channel `i` is the one whose base-3 digits (most
//! significant first) are its low/mid/high choices, so a leaf can be
//! computed directly from its index without touching its siblings.
//!
//! # Memory budget
//!
//! [`ChannelIter`] holds a borrowed decomposition and two counters; each
//! yielded [`Channel`] owns one region and a `d`-element path. Nothing
//! proportional to 3^d is allocated, including by [`TernaryDecomposition::audit`].
//!
//! Leaf bounds along an axis split `n` times are computed as
//! `lo + (hi - lo) · k / 3^n` for integer `k`, so neighbouring leaves share
//! bit-identical faces and the tiling has no floating-point gaps.

use std::fmt;
use std::iter::FusedIterator;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::coordinate::CategoricalCoordinate;
use crate::region::{Axis, Region};

/// Deepest supported decomposition (3^20 ≈ 3.5·10⁹ channels).
pub const MAX_DECOMPOSITION_DEPTH: u32 = 20;

/// Channel counts up to this size get an exhaustive pairwise overlap check.
const EXHAUSTIVE_OVERLAP_LIMIT: u64 = 729;

/// One low/mid/high choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Third {
    Low,
    Mid,
    High,
}

impl Third {
    fn from_digit(d: u64) -> Third {
        match d {
            0 => Third::Low,
            1 => Third::Mid,
            _ => Third::High,
        }
    }

    pub fn digit(self) -> u64 {
        match self {
            Third::Low => 0,
            Third::Mid => 1,
            Third::High => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Third::Low => 'L',
            Third::Mid => 'M',
            Third::High => 'H',
        }
    }
}

/// Sequence of choices from the root to a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelPath(Vec<Third>);

impl ChannelPath {
    pub fn choices(&self) -> &[Third] {
        &self.0
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Channel index encoded by this path.
    pub fn to_index(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, t| acc * 3 + t.digit())
    }
}

impl fmt::Display for ChannelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for t in &self.0 {
            write!(f, "{}", t.symbol())?;
        }
        Ok(())
    }
}

/// A leaf region of a decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub index: u64,
    pub path: ChannelPath,
    pub region: Region,
}

impl Channel {
    /// Bits gained by locating a point in this channel: log2(parent / channel volume).
    pub fn information_bits(&self, parent_volume: f64) -> f64 {
        (parent_volume / self.region.volume()).log2()
    }
}

/// A depth-d ternary decomposition of a region.
#[derive(Debug, Clone)]
pub struct TernaryDecomposition {
    root: Region,
    depth: u32,
    /// 3^(number of levels splitting each axis)
    cells_per_axis: [u64; 3],
}

impl TernaryDecomposition {
    /// # Errors
    /// `InvalidParameter` when `depth < 0` or `depth > MAX_DECOMPOSITION_DEPTH`.
    pub fn new(root: Region, depth: i32) -> ResonanceResult<Self> {
        if depth < 0 {
            return Err(ResonanceError::invalid(
                "depth",
                format!("must be >= 0, got {depth}"),
            ));
        }
        let depth = depth.unsigned_abs();
        if depth > MAX_DECOMPOSITION_DEPTH {
            return Err(ResonanceError::invalid(
                "depth",
                format!("must be <= {MAX_DECOMPOSITION_DEPTH}, got {depth}"),
            ));
        }
        let mut cells_per_axis = [1u64; 3];
        for level in 0..depth {
            cells_per_axis[Axis::for_level(level).index()] *= 3;
        }
        Ok(Self {
            root,
            depth,
            cells_per_axis,
        })
    }

    pub fn root(&self) -> &Region {
        &self.root
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// 3^d
    pub fn channel_count(&self) -> u64 {
        3u64.pow(self.depth)
    }

    /// Number of levels that split each axis.
    pub fn splits_per_axis(&self) -> [u32; 3] {
        let mut splits = [0u32; 3];
        for level in 0..self.depth {
            splits[Axis::for_level(level).index()] += 1;
        }
        splits
    }

    /// Lazily yield all channels in index order.
    pub fn channels(&self) -> ChannelIter<'_> {
        ChannelIter {
            decomposition: self,
            next: 0,
            end: self.channel_count(),
        }
    }

    /// The channel with the given index, or `None` past the end.
    pub fn channel(&self, index: u64) -> Option<Channel> {
        if index >= self.channel_count() {
            return None;
        }
        let mut choices = Vec::with_capacity(self.depth as usize);
        let mut cell = [0u64; 3];
        let mut remaining = index;
        let mut weight = self.channel_count() / 3;
        for level in 0..self.depth {
            let digit = remaining / weight;
            remaining %= weight;
            weight = (weight / 3).max(1);
            choices.push(Third::from_digit(digit));
            let axis = Axis::for_level(level).index();
            cell[axis] = cell[axis] * 3 + digit;
        }

        let lo = self.root.lower();
        let hi = self.root.upper();
        let mut lower = [0.0; 3];
        let mut upper = [0.0; 3];
        for axis in 0..3 {
            let cells = self.cells_per_axis[axis];
            let span = hi[axis] - lo[axis];
            lower[axis] = lo[axis] + span * (cell[axis] as f64 / cells as f64);
            upper[axis] = if cell[axis] + 1 == cells {
                hi[axis]
            } else {
                lo[axis] + span * ((cell[axis] + 1) as f64 / cells as f64)
            };
        }

        Some(Channel {
            index,
            path: ChannelPath(choices),
            region: Region::from_bounds(lower, upper),
        })
    }

    /// Path of the leaf holding `point`, found by descending the thirds from
    /// the root. A point on a shared face resolves to the lower third.
    /// `None` outside the root region.
    pub fn locate(&self, point: &CategoricalCoordinate) -> Option<ChannelPath> {
        if !self.root.contains(point) {
            return None;
        }
        let mut region = self.root;
        let mut choices = Vec::with_capacity(self.depth as usize);
        for level in 0..self.depth {
            let thirds = region.thirds(Axis::for_level(level));
            let digit = thirds.iter().position(|t| t.contains(point))?;
            region = thirds[digit];
            choices.push(Third::from_digit(digit as u64));
        }
        Some(ChannelPath(choices))
    }

    /// True when descending from the root to the channel's centre yields the
    /// channel's own path.
    pub fn label_matches(&self, channel: &Channel) -> bool {
        self.locate(&channel.region.centre()).as_ref() == Some(&channel.path)
    }

    /// Verify completeness: count, volume reconstruction, unique labels and
    /// pairwise disjointness (exhaustive up to 729 channels, otherwise on
    /// `overlap_samples` seeded pairs).
    pub fn audit(&self, overlap_samples: usize, seed: u64) -> DecompositionAudit {
        let parent_volume = self.root.volume();
        let mut volume = NeumaierSum::default();
        let mut information = NeumaierSum::default();
        let mut count = 0u64;
        let mut labels_unique = true;

        for channel in self.channels() {
            volume.add(channel.region.volume());
            information.add(channel.information_bits(parent_volume));
            // Two channels sharing a region cannot both pass.
            if !self.label_matches(&channel) {
                labels_unique = false;
            }
            count += 1;
        }

        let (pairs_checked, overlapping_pairs) = self.check_overlaps(overlap_samples, seed);
        let volume_sum = volume.total();
        let audit = DecompositionAudit {
            depth: self.depth,
            channel_count: count,
            expected_count: self.channel_count(),
            parent_volume,
            volume_sum,
            relative_volume_error: (volume_sum - parent_volume).abs() / parent_volume,
            labels_unique,
            pairs_checked,
            overlapping_pairs,
            mean_information_bits: if count > 0 {
                information.total() / count as f64
            } else {
                0.0
            },
        };
        debug!(
            depth = self.depth,
            channels = count,
            rel_err = audit.relative_volume_error,
            "decomposition audited"
        );
        audit
    }

    fn check_overlaps(&self, samples: usize, seed: u64) -> (u64, u64) {
        let n = self.channel_count();
        if n < 2 {
            return (0, 0);
        }
        let mut checked = 0u64;
        let mut overlapping = 0u64;
        if n <= EXHAUSTIVE_OVERLAP_LIMIT {
            let channels: Vec<Channel> = self.channels().collect();
            for (i, a) in channels.iter().enumerate() {
                for b in &channels[i + 1..] {
                    checked += 1;
                    overlapping += u64::from(a.region.overlaps(&b.region));
                }
            }
        } else {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..samples {
                let i = rng.gen_range(0..n);
                let mut j = rng.gen_range(0..n - 1);
                if j >= i {
                    j += 1;
                }
                if let (Some(a), Some(b)) = (self.channel(i), self.channel(j)) {
                    checked += 1;
                    overlapping += u64::from(a.region.overlaps(&b.region));
                }
            }
        }
        (checked, overlapping)
    }
}

/// Lazy iterator over the channels of a [`TernaryDecomposition`].
#[derive(Debug, Clone)]
pub struct ChannelIter<'a> {
    decomposition: &'a TernaryDecomposition,
    next: u64,
    end: u64,
}

impl Iterator for ChannelIter<'_> {
    type Item = Channel;

    fn next(&mut self) -> Option<Channel> {
        if self.next >= self.end {
            return None;
        }
        let channel = self.decomposition.channel(self.next);
        self.next += 1;
        channel
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.end - self.next).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Channel> {
        self.next = self.next.saturating_add(n as u64).min(self.end);
        self.next()
    }
}

impl ExactSizeIterator for ChannelIter<'_> {}

impl FusedIterator for ChannelIter<'_> {}

/// Result of [`TernaryDecomposition::audit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecompositionAudit {
    pub depth: u32,
    pub channel_count: u64,
    pub expected_count: u64,
    pub parent_volume: f64,
    pub volume_sum: f64,
    pub relative_volume_error: f64,
    pub labels_unique: bool,
    pub pairs_checked: u64,
    pub overlapping_pairs: u64,
    pub mean_information_bits: f64,
}

impl DecompositionAudit {
    /// Fraction of checked pairs that are disjoint; 1 when nothing was checked.
    pub fn orthogonality_rate(&self) -> f64 {
        if self.pairs_checked == 0 {
            1.0
        } else {
            1.0 - self.overlapping_pairs as f64 / self.pairs_checked as f64
        }
    }

    pub fn is_complete(&self, volume_tolerance: f64) -> bool {
        self.channel_count == self.expected_count
            && self.relative_volume_error <= volume_tolerance
            && self.labels_unique
            && self.overlapping_pairs == 0
    }
}

/// Compensated summation.
#[derive(Debug, Default)]
struct NeumaierSum {
    sum: f64,
    compensation: f64,
}

impl NeumaierSum {
    fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    fn total(&self) -> f64 {
        self.sum + self.compensation
    }
}
