//! Pluggable frequency sources.
//!
//! The engine never touches hardware. A session asks its [`FrequencySource`]
//! for base frequencies once; the representative table stands in for a
//! live measurement and any other provider (including test mocks) can be
//! swapped in behind the trait.

use tracing::debug;

use crate::error::{ResonanceError, ResonanceResult};
use crate::frequency::Frequency;

/// Speed of light used to convert LED wavelengths into frequencies.
const SPEED_OF_LIGHT_M_PER_S: f64 = 3e8;

/// Provider of labeled base frequencies.
pub trait FrequencySource: Send + Sync {
    /// Human-readable provider name recorded in reports.
    fn name(&self) -> &str;

    /// Enumerate the base frequencies. Called once per session.
    fn frequencies(&self) -> ResonanceResult<Vec<Frequency>>;
}

/// A fixed, in-memory list of frequencies.
#[derive(Debug, Clone)]
pub struct StaticFrequencySource {
    name: String,
    entries: Vec<(String, f64)>,
}

impl StaticFrequencySource {
    /// Build a source from raw `(label, hz)` pairs. Values are validated
    /// lazily in [`FrequencySource::frequencies`].
    pub fn new(name: impl Into<String>, entries: Vec<(String, f64)>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Representative device oscillators: CPU clock domains, display
    /// emission and refresh, thermal cycling and network carriers.
    pub fn representative() -> Self {
        let led = |nm: f64| SPEED_OF_LIGHT_M_PER_S / (nm * 1e-9);
        let entries = vec![
            ("CPU_Core", 3.5e9),
            ("CPU_Uncore", 2.0e9),
            ("Memory_Controller", 1.6e9),
            ("Screen_LED_Red", led(650.0)),
            ("Screen_LED_Green", led(530.0)),
            ("Screen_LED_Blue", led(470.0)),
            ("Screen_Refresh_60Hz", 60.0),
            ("PWM_Backlight", 25e3),
            ("CPU_Thermal", 1.0),
            ("Ambient_HVAC", 1.0 / 3600.0),
            ("WiFi_2.4GHz", 2.4e9),
            ("WiFi_5GHz", 5.0e9),
            ("Ethernet_1Gbps", 1.0e9),
        ];
        Self::new(
            "representative",
            entries
                .into_iter()
                .map(|(label, hz)| (label.to_string(), hz))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StaticFrequencySource {
    fn default() -> Self {
        Self::representative()
    }
}

impl FrequencySource for StaticFrequencySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn frequencies(&self) -> ResonanceResult<Vec<Frequency>> {
        let frequencies = self
            .entries
            .iter()
            .map(|(label, hz)| Frequency::labeled(label.clone(), *hz))
            .collect::<ResonanceResult<Vec<_>>>()?;
        debug!(source = %self.name, count = frequencies.len(), "enumerated base frequencies");
        Ok(frequencies)
    }
}

/// A source that always fails; stands in for unavailable hardware.
#[derive(Debug, Clone, Default)]
pub struct UnavailableSource;

impl FrequencySource for UnavailableSource {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn frequencies(&self) -> ResonanceResult<Vec<Frequency>> {
        Err(ResonanceError::Config(
            "frequency source unavailable".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::{FrequencySpan, ScaleCoverage};

    #[test]
    fn test_representative_table() {
        let source = StaticFrequencySource::representative();
        let freqs = source.frequencies().unwrap();
        assert_eq!(freqs.len(), 13);
        assert_eq!(freqs[0].label(), Some("CPU_Core"));
        assert_eq!(freqs[0].hz(), 3.5e9);
        let red = freqs.iter().find(|f| f.label() == Some("Screen_LED_Red")).unwrap();
        assert!((red.hz() - 4.615e14).abs() / 4.615e14 < 1e-3);
    }

    #[test]
    fn test_representative_span_exceeds_eleven_orders() {
        let freqs = StaticFrequencySource::representative().frequencies().unwrap();
        let span = FrequencySpan::of(&freqs).unwrap();
        assert!(span.orders_of_magnitude >= 11.0, "got {}", span.orders_of_magnitude);
        assert!(ScaleCoverage::of(&freqs).scales_covered() >= 4);
    }

    #[test]
    fn test_invalid_entry_surfaces() {
        let source = StaticFrequencySource::new(
            "mock",
            vec![("ok".to_string(), 1.0), ("broken".to_string(), -2.0)],
        );
        let err = source.frequencies().unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_unavailable_source_errors() {
        assert!(UnavailableSource.frequencies().is_err());
        assert_eq!(UnavailableSource.name(), "unavailable");
    }
}
