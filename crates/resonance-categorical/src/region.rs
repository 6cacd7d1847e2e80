//! Axis-aligned regions of categorical space.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::coordinate::CategoricalCoordinate;

/// Coordinate axes in split order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Knowledge,
    Time,
    Entropy,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Knowledge, Axis::Time, Axis::Entropy];

    /// Axis split at recursion level `level`: `level mod 3`.
    pub fn for_level(level: u32) -> Axis {
        Self::ALL[(level % 3) as usize]
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::Knowledge => 0,
            Axis::Time => 1,
            Axis::Entropy => 2,
        }
    }
}

/// Closed box `[lower, upper]` with `lower < upper` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    lower: [f64; 3],
    upper: [f64; 3],
}

impl Region {
    pub fn new(lower: [f64; 3], upper: [f64; 3]) -> ResonanceResult<Self> {
        for axis in Axis::ALL {
            let (lo, hi) = (lower[axis.index()], upper[axis.index()]);
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(ResonanceError::invalid(
                    "region",
                    format!("{axis:?} bounds must be finite with lower < upper, got [{lo}, {hi}]"),
                ));
            }
        }
        Ok(Self { lower, upper })
    }

    /// The unit cube `[0, 1]³`.
    pub fn unit() -> Self {
        Self {
            lower: [0.0; 3],
            upper: [1.0; 3],
        }
    }

    /// Build from bounds already known to be ordered.
    pub(crate) fn from_bounds(lower: [f64; 3], upper: [f64; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn lower(&self) -> [f64; 3] {
        self.lower
    }

    pub fn upper(&self) -> [f64; 3] {
        self.upper
    }

    pub fn extent(&self, axis: Axis) -> f64 {
        self.upper[axis.index()] - self.lower[axis.index()]
    }

    pub fn volume(&self) -> f64 {
        Axis::ALL.iter().map(|&a| self.extent(a)).product()
    }

    pub fn centre(&self) -> CategoricalCoordinate {
        CategoricalCoordinate::new(
            0.5 * (self.lower[0] + self.upper[0]),
            0.5 * (self.lower[1] + self.upper[1]),
            0.5 * (self.lower[2] + self.upper[2]),
        )
    }

    pub fn contains(&self, point: &CategoricalCoordinate) -> bool {
        point
            .as_array()
            .iter()
            .enumerate()
            .all(|(i, &x)| self.lower[i] <= x && x <= self.upper[i])
    }

    /// True when the interiors intersect; shared faces do not count.
    pub fn overlaps(&self, other: &Region) -> bool {
        (0..3).all(|i| self.lower[i] < other.upper[i] && other.lower[i] < self.upper[i])
    }

    /// Split into low/mid/high equal-range thirds along `axis`.
    pub fn thirds(&self, axis: Axis) -> [Region; 3] {
        let i = axis.index();
        let lo = self.lower[i];
        let hi = self.upper[i];
        let step = (hi - lo) / 3.0;
        let cuts = [lo, lo + step, lo + 2.0 * step, hi];
        std::array::from_fn(|k| {
            let mut lower = self.lower;
            let mut upper = self.upper;
            lower[i] = cuts[k];
            upper[i] = cuts[k + 1];
            Region { lower, upper }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_round_robin() {
        assert_eq!(Axis::for_level(0), Axis::Knowledge);
        assert_eq!(Axis::for_level(1), Axis::Time);
        assert_eq!(Axis::for_level(2), Axis::Entropy);
        assert_eq!(Axis::for_level(3), Axis::Knowledge);
    }

    #[test]
    fn test_region_validation() {
        assert!(Region::new([0.0; 3], [1.0; 3]).is_ok());
        assert!(Region::new([0.0; 3], [1.0, 0.0, 1.0]).is_err());
        assert!(Region::new([0.0, f64::NAN, 0.0], [1.0; 3]).is_err());
    }

    #[test]
    fn test_thirds_tile_parent() {
        let parent = Region::new([0.0, -15.0, 0.0], [15.0, 3.0, 10.0]).unwrap();
        let parts = parent.thirds(Axis::Time);
        let total: f64 = parts.iter().map(Region::volume).sum();
        assert!((total - parent.volume()).abs() < 1e-9);
        assert_eq!(parts[0].lower()[1], -15.0);
        assert_eq!(parts[2].upper()[1], 3.0);
        assert_eq!(parts[0].upper()[1], parts[1].lower()[1]);
        assert!(!parts[0].overlaps(&parts[1]));
        assert!(parent.overlaps(&parts[1]));
    }

    #[test]
    fn test_contains_and_centre() {
        let r = Region::unit();
        assert!(r.contains(&r.centre()));
        assert!(r.contains(&CategoricalCoordinate::new(1.0, 0.0, 0.5)));
        assert!(!r.contains(&CategoricalCoordinate::new(1.1, 0.0, 0.5)));
    }
}
