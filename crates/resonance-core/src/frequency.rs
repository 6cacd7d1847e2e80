//! Validated frequency values and span analysis.

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, ResonanceError, ResonanceResult};

/// An immutable positive frequency in hertz with an optional source label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    hz: f64,
    label: Option<String>,
}

impl Frequency {
    /// Create an unlabeled frequency. Fails for non-finite or non-positive values.
    pub fn new(hz: f64) -> ResonanceResult<Self> {
        require_positive("frequency_hz", hz)?;
        Ok(Self { hz, label: None })
    }

    /// Create a labeled frequency.
    pub fn labeled(label: impl Into<String>, hz: f64) -> ResonanceResult<Self> {
        let label = label.into();
        if !hz.is_finite() || hz <= 0.0 {
            return Err(ResonanceError::invalid(
                "frequency_hz",
                format!("source '{label}' must be finite and > 0, got {hz}"),
            ));
        }
        Ok(Self {
            hz,
            label: Some(label),
        })
    }

    #[inline]
    pub fn hz(&self) -> f64 {
        self.hz
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label, or the formatted value when unlabeled.
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => format!("{:.3e}Hz", self.hz),
        }
    }

    /// Angular frequency ω = 2πf.
    #[inline]
    pub fn angular(&self) -> f64 {
        std::f64::consts::TAU * self.hz
    }

    /// Period 1/f in seconds.
    #[inline]
    pub fn period(&self) -> f64 {
        1.0 / self.hz
    }
}

/// Reference scales of the biological oscillation hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiologicalScale {
    QuantumCoherence,
    ProteinConformational,
    IonChannelGating,
    EnzymeCatalysis,
    SynapticTransmission,
    ActionPotential,
    CircadianRhythm,
    EnvironmentalCoupling,
}

impl BiologicalScale {
    pub const ALL: [BiologicalScale; 8] = [
        BiologicalScale::QuantumCoherence,
        BiologicalScale::ProteinConformational,
        BiologicalScale::IonChannelGating,
        BiologicalScale::EnzymeCatalysis,
        BiologicalScale::SynapticTransmission,
        BiologicalScale::ActionPotential,
        BiologicalScale::CircadianRhythm,
        BiologicalScale::EnvironmentalCoupling,
    ];

    /// Characteristic frequency of the scale in hertz.
    pub fn characteristic_hz(self) -> f64 {
        match self {
            BiologicalScale::QuantumCoherence => 1e15,
            BiologicalScale::ProteinConformational => 1e12,
            BiologicalScale::IonChannelGating => 1e9,
            BiologicalScale::EnzymeCatalysis => 1e6,
            BiologicalScale::SynapticTransmission => 1e3,
            BiologicalScale::ActionPotential => 1e2,
            BiologicalScale::CircadianRhythm => 1e-4,
            BiologicalScale::EnvironmentalCoupling => 1e-5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BiologicalScale::QuantumCoherence => "quantum_coherence",
            BiologicalScale::ProteinConformational => "protein_conformational",
            BiologicalScale::IonChannelGating => "ion_channel_gating",
            BiologicalScale::EnzymeCatalysis => "enzyme_catalysis",
            BiologicalScale::SynapticTransmission => "synaptic_transmission",
            BiologicalScale::ActionPotential => "action_potential",
            BiologicalScale::CircadianRhythm => "circadian_rhythm",
            BiologicalScale::EnvironmentalCoupling => "environmental_coupling",
        }
    }

    /// Scale whose characteristic frequency is nearest in ratio, `max(f/s, s/f)`.
    /// Ties resolve to the earlier (faster) scale.
    pub fn nearest(frequency: &Frequency) -> BiologicalScale {
        let f = frequency.hz();
        let mut best = BiologicalScale::QuantumCoherence;
        let mut best_ratio = f64::INFINITY;
        for scale in Self::ALL {
            let s = scale.characteristic_hz();
            let ratio = (f / s).max(s / f);
            if ratio < best_ratio {
                best_ratio = ratio;
                best = scale;
            }
        }
        best
    }
}

/// Range spanned by a set of frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencySpan {
    pub min_hz: f64,
    pub max_hz: f64,
    /// log10(max / min)
    pub orders_of_magnitude: f64,
    pub count: usize,
}

impl FrequencySpan {
    /// Span of `frequencies`; `None` when the slice is empty.
    pub fn of(frequencies: &[Frequency]) -> Option<Self> {
        let mut iter = frequencies.iter().map(Frequency::hz);
        let first = iter.next()?;
        let (min_hz, max_hz) = iter.fold((first, first), |(lo, hi), f| (lo.min(f), hi.max(f)));
        Some(Self {
            min_hz,
            max_hz,
            orders_of_magnitude: (max_hz / min_hz).log10(),
            count: frequencies.len(),
        })
    }
}

/// Assignment of frequencies to their nearest biological scale.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScaleCoverage {
    /// (scale, source labels) in scale order, only scales with members.
    pub assignments: Vec<(BiologicalScale, Vec<String>)>,
}

impl ScaleCoverage {
    pub fn of(frequencies: &[Frequency]) -> Self {
        let mut assignments: Vec<(BiologicalScale, Vec<String>)> = Vec::new();
        for frequency in frequencies {
            let scale = BiologicalScale::nearest(frequency);
            match assignments.iter_mut().find(|(s, _)| *s == scale) {
                Some((_, members)) => members.push(frequency.display_label()),
                None => assignments.push((scale, vec![frequency.display_label()])),
            }
        }
        assignments.sort_by_key(|(scale, _)| *scale);
        Self { assignments }
    }

    pub fn scales_covered(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_rejects_non_positive() {
        assert!(Frequency::new(0.0).is_err());
        assert!(Frequency::new(-5.0).is_err());
        assert!(Frequency::new(f64::NAN).is_err());
        assert!(Frequency::labeled("bad", f64::INFINITY).is_err());
    }

    #[test]
    fn test_frequency_accessors() {
        let f = Frequency::labeled("CPU_Core", 3.5e9).unwrap();
        assert_eq!(f.hz(), 3.5e9);
        assert_eq!(f.label(), Some("CPU_Core"));
        assert!((f.angular() - 2.0 * std::f64::consts::PI * 3.5e9).abs() < 1.0);
        assert!((f.period() - 1.0 / 3.5e9).abs() < 1e-24);
    }

    #[test]
    fn test_display_label_unlabeled() {
        let f = Frequency::new(60.0).unwrap();
        assert_eq!(f.display_label(), "6.000e1Hz");
    }

    #[test]
    fn test_span() {
        let freqs = vec![
            Frequency::new(1e3).unwrap(),
            Frequency::new(1e14).unwrap(),
            Frequency::new(5.0).unwrap(),
        ];
        let span = FrequencySpan::of(&freqs).unwrap();
        assert_eq!(span.min_hz, 5.0);
        assert_eq!(span.max_hz, 1e14);
        assert!((span.orders_of_magnitude - (1e14f64 / 5.0).log10()).abs() < 1e-12);
        assert!(FrequencySpan::of(&[]).is_none());
    }

    #[test]
    fn test_nearest_scale() {
        let cpu = Frequency::new(3.5e9).unwrap();
        assert_eq!(BiologicalScale::nearest(&cpu), BiologicalScale::IonChannelGating);
        let led = Frequency::new(4.6e14).unwrap();
        assert_eq!(BiologicalScale::nearest(&led), BiologicalScale::QuantumCoherence);
        let hvac = Frequency::new(1.0 / 3600.0).unwrap();
        assert_eq!(BiologicalScale::nearest(&hvac), BiologicalScale::CircadianRhythm);
    }

    #[test]
    fn test_scale_coverage_groups_members() {
        let freqs = vec![
            Frequency::labeled("a", 3.5e9).unwrap(),
            Frequency::labeled("b", 2.4e9).unwrap(),
            Frequency::labeled("c", 60.0).unwrap(),
        ];
        let coverage = ScaleCoverage::of(&freqs);
        assert_eq!(coverage.scales_covered(), 2);
        assert_eq!(coverage.assignments[0].0, BiologicalScale::IonChannelGating);
        assert_eq!(coverage.assignments[0].1, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(coverage.assignments[1].0, BiologicalScale::ActionPotential);
    }
}
