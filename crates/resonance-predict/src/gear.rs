//! Gear-ratio lookup and response-time prediction.

use std::collections::BTreeMap;
use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

use crate::config::GearConfig;

/// Pathway → gear ratio, fixed once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearRatioTable {
    ratios: BTreeMap<String, f64>,
}

/// Mean and sample standard deviation of the table's ratios.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample (n − 1) standard deviation; 0 for a single ratio.
    pub std: f64,
}

impl GearRatioTable {
    pub fn from_config(config: &GearConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            ratios: config.pathways.clone(),
        })
    }

    /// # Errors
    /// `UnknownPathway` when `pathway` is not in the table.
    pub fn ratio(&self, pathway: &str) -> ResonanceResult<f64> {
        self.ratios
            .get(pathway)
            .copied()
            .ok_or_else(|| ResonanceError::UnknownPathway(pathway.to_string()))
    }

    pub fn pathways(&self) -> impl Iterator<Item = &str> {
        self.ratios.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn statistics(&self) -> GearStatistics {
        let values: Vec<f64> = self.ratios.values().copied().collect();
        let count = values.len();
        if count == 0 {
            return GearStatistics {
                count,
                mean: 0.0,
                std: 0.0,
            };
        }
        let mean = values.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        GearStatistics { count, mean, std }
    }
}

/// Predicted response time; undefined when the predicted frequency is 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum ResponseTime {
    Seconds(f64),
    Undefined,
}

impl ResponseTime {
    pub fn seconds(self) -> Option<f64> {
        match self {
            ResponseTime::Seconds(s) => Some(s),
            ResponseTime::Undefined => None,
        }
    }

    pub fn hours(self) -> Option<f64> {
        self.seconds().map(|s| s / 3600.0)
    }
}

/// One gear-ratio prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearPrediction {
    pub pathway: String,
    pub gear_ratio: f64,
    pub source_hz: f64,
    pub predicted_hz: f64,
    pub response_time: ResponseTime,
}

impl GearPrediction {
    /// `G·f` and `2π / (G·f)`.
    pub fn compute(pathway: &str, gear_ratio: f64, source_hz: f64) -> ResonanceResult<Self> {
        if !source_hz.is_finite() || source_hz < 0.0 {
            return Err(ResonanceError::invalid(
                "source_hz",
                format!("must be finite and >= 0, got {source_hz}"),
            ));
        }
        let predicted_hz = gear_ratio * source_hz;
        let response_time = if predicted_hz > 0.0 {
            ResponseTime::Seconds(TAU / predicted_hz)
        } else {
            ResponseTime::Undefined
        };
        Ok(Self {
            pathway: pathway.to_string(),
            gear_ratio,
            source_hz,
            predicted_hz,
            response_time,
        })
    }
}

/// O(1) predictor over a [`GearRatioTable`].
#[derive(Debug, Clone)]
pub struct GearRatioPredictor {
    table: GearRatioTable,
}

impl GearRatioPredictor {
    pub fn new(table: GearRatioTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &GearRatioTable {
        &self.table
    }

    /// # Errors
    /// `UnknownPathway` for a lookup miss, `InvalidParameter` for a negative
    /// or non-finite source frequency.
    pub fn predict(&self, source_hz: f64, pathway: &str) -> ResonanceResult<GearPrediction> {
        let ratio = self.table.ratio(pathway)?;
        GearPrediction::compute(pathway, ratio, source_hz)
    }

    /// Compare predicted against measured response times; a case is accurate
    /// when the relative error is below `tolerance`.
    pub fn check_response_times(
        &self,
        cases: &[ResponseCase],
        tolerance: f64,
    ) -> ResonanceResult<Vec<ResponseCheck>> {
        cases
            .iter()
            .map(|case| {
                let prediction = self.predict(case.frequency_hz, &case.pathway)?;
                let relative_error = match prediction.response_time.hours() {
                    Some(hours) if case.measured_hours > 0.0 => {
                        (hours - case.measured_hours).abs() / case.measured_hours
                    }
                    Some(_) => 0.0,
                    None => f64::INFINITY,
                };
                Ok(ResponseCheck {
                    name: case.name.clone(),
                    predicted_hours: prediction.response_time.hours(),
                    measured_hours: case.measured_hours,
                    relative_error,
                    accurate: relative_error < tolerance,
                })
            })
            .collect()
    }
}

/// A compound with a measured therapeutic response time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCase {
    pub name: String,
    pub frequency_hz: f64,
    pub pathway: String,
    pub measured_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseCheck {
    pub name: String,
    pub predicted_hours: Option<f64>,
    pub measured_hours: f64,
    pub relative_error: f64,
    pub accurate: bool,
}

/// Fraction of accurate checks; 0 for none.
pub fn response_accuracy(checks: &[ResponseCheck]) -> f64 {
    if checks.is_empty() {
        return 0.0;
    }
    checks.iter().filter(|c| c.accurate).count() as f64 / checks.len() as f64
}

/// Reference compounds with measured response times, keyed to the default
/// pathway table.
pub fn reference_response_cases() -> Vec<ResponseCase> {
    [
        ("Fluoxetine", 3.6e13, "Serotonin", 2.0 * 168.0),
        ("Dopamine_Agonist", 4.5e13, "Dopamine", 168.0),
        ("Benzodiazepine", 3.2e13, "GABA", 0.5),
        ("Acetylcholine_Agonist", 3.8e13, "Acetylcholine", 4.0 * 168.0),
        ("Aspirin", 5.25e13, "COX_Pathway", 4.0),
    ]
    .into_iter()
    .map(|(name, frequency_hz, pathway, measured_hours)| ResponseCase {
        name: name.to_string(),
        frequency_hz,
        pathway: pathway.to_string(),
        measured_hours,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictor() -> GearRatioPredictor {
        GearRatioPredictor::new(GearRatioTable::from_config(&GearConfig::default()).unwrap())
    }

    #[test]
    fn test_predict_known_pathway() {
        let p = predictor().predict(1.0, "GABA").unwrap();
        assert_eq!(p.predicted_hz, 1540.0);
        assert!((p.response_time.seconds().unwrap() - TAU / 1540.0).abs() < 1e-15);
    }

    #[test]
    fn test_unknown_pathway() {
        let err = predictor().predict(1.0, "Histamine").unwrap_err();
        assert!(matches!(err, ResonanceError::UnknownPathway(ref p) if p == "Histamine"));
        assert_eq!(err.kind(), "unknown_pathway");
    }

    #[test]
    fn test_zero_source_is_undefined() {
        let p = predictor().predict(0.0, "Dopamine").unwrap();
        assert_eq!(p.predicted_hz, 0.0);
        assert_eq!(p.response_time, ResponseTime::Undefined);
        assert_eq!(p.response_time.hours(), None);
    }

    #[test]
    fn test_negative_source_rejected() {
        assert_eq!(
            predictor().predict(-1.0, "GABA").unwrap_err().kind(),
            "invalid_parameter"
        );
    }

    #[test]
    fn test_statistics() {
        let stats = predictor().table().statistics();
        assert_eq!(stats.count, 5);
        let mean = (3221.0 + 2836.0 + 1540.0 + 7615.0 + 892.0) / 5.0;
        assert!((stats.mean - mean).abs() < 1e-9);
        assert!(stats.std > 0.0);
    }

    #[test]
    fn test_response_checks_cover_all_cases() {
        let checks = predictor()
            .check_response_times(&reference_response_cases(), 0.3)
            .unwrap();
        assert_eq!(checks.len(), 5);
        assert!(checks.iter().all(|c| c.relative_error.is_finite()));
        let acc = response_accuracy(&checks);
        assert!((0.0..=1.0).contains(&acc));
    }

    #[test]
    fn test_response_time_serialization() {
        let json = serde_json::to_value(ResponseTime::Undefined).unwrap();
        assert_eq!(json["kind"], "undefined");
        let json = serde_json::to_value(ResponseTime::Seconds(2.0)).unwrap();
        assert_eq!(json["seconds"], 2.0);
    }
}
