//! Propagation of a source frequency down the biological scale hierarchy.

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::BiologicalScale;

/// Zero-based index of the level where the source enters.
pub const ENTRY_INDEX: usize = 2;

/// One level of a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeLevel {
    /// One-based level number.
    pub level: usize,
    pub scale: BiologicalScale,
    pub frequency_hz: f64,
    pub timescale_s: f64,
    /// False above the entry level, where the characteristic frequency is kept.
    pub influenced: bool,
}

/// A propagated cascade over all eight scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiScaleCascade {
    pub source_hz: f64,
    pub level_ratio: f64,
    pub levels: Vec<CascadeLevel>,
}

impl MultiScaleCascade {
    /// Enter at level 3 with `source_hz`; each later level multiplies the
    /// frequency by `level_ratio`.
    pub fn propagate(source_hz: f64, level_ratio: f64) -> ResonanceResult<Self> {
        if !source_hz.is_finite() || source_hz <= 0.0 {
            return Err(ResonanceError::invalid(
                "source_hz",
                format!("must be finite and > 0, got {source_hz}"),
            ));
        }
        if !level_ratio.is_finite() || level_ratio <= 0.0 {
            return Err(ResonanceError::invalid(
                "cascade_level_ratio",
                format!("must be finite and > 0, got {level_ratio}"),
            ));
        }

        let mut frequency = source_hz;
        let levels = BiologicalScale::ALL
            .iter()
            .enumerate()
            .map(|(i, &scale)| {
                let influenced = i >= ENTRY_INDEX;
                let frequency_hz = match i.cmp(&ENTRY_INDEX) {
                    std::cmp::Ordering::Less => scale.characteristic_hz(),
                    std::cmp::Ordering::Equal => frequency,
                    std::cmp::Ordering::Greater => {
                        frequency *= level_ratio;
                        frequency
                    }
                };
                CascadeLevel {
                    level: i + 1,
                    scale,
                    frequency_hz,
                    timescale_s: 1.0 / frequency_hz,
                    influenced,
                }
            })
            .collect();

        Ok(Self {
            source_hz,
            level_ratio,
            levels,
        })
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Output frequency of the last level over the source frequency.
    pub fn total_ratio(&self) -> f64 {
        self.levels
            .last()
            .map_or(0.0, |l| l.frequency_hz / self.source_hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_levels_enter_at_third() {
        let cascade = MultiScaleCascade::propagate(3.6e13, 1e-2).unwrap();
        assert_eq!(cascade.level_count(), 8);
        assert!(!cascade.levels[1].influenced);
        assert_eq!(cascade.levels[0].frequency_hz, 1e15);
        assert_eq!(cascade.levels[2].frequency_hz, 3.6e13);
        assert_eq!(cascade.levels[2].level, 3);
        assert!((cascade.levels[3].frequency_hz - 3.6e11).abs() < 1.0);
    }

    #[test]
    fn test_total_ratio() {
        let cascade = MultiScaleCascade::propagate(1e9, 1e-2).unwrap();
        // Five multiplications after the entry level.
        assert!((cascade.total_ratio() - 1e-10).abs() < 1e-22);
        for level in &cascade.levels {
            assert!((level.timescale_s * level.frequency_hz - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(MultiScaleCascade::propagate(0.0, 1e-2).is_err());
        assert!(MultiScaleCascade::propagate(1.0, -1.0).is_err());
    }
}
