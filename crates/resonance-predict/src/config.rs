//! Configuration for prediction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use resonance_core::error::{ResonanceError, ResonanceResult};

/// Gear-ratio configuration.
///
/// # Defaults
/// - Serotonin 3221, Dopamine 2836, GABA 1540, Acetylcholine 7615,
///   COX_Pathway 892
/// - 10⁻² frequency ratio between consecutive cascade levels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GearConfig {
    /// Pathway id → gear ratio G ≥ 0
    pub pathways: BTreeMap<String, f64>,
    /// Frequency multiplier between consecutive cascade levels (default: 1e-2)
    pub cascade_level_ratio: f64,
}

impl Default for GearConfig {
    fn default() -> Self {
        let pathways = [
            ("Serotonin", 3221.0),
            ("Dopamine", 2836.0),
            ("GABA", 1540.0),
            ("Acetylcholine", 7615.0),
            ("COX_Pathway", 892.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Self {
            pathways,
            cascade_level_ratio: 1e-2,
        }
    }
}

impl GearConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.pathways.is_empty() {
            return Err(ResonanceError::invalid("pathways", "at least one pathway is required"));
        }
        for (pathway, &ratio) in &self.pathways {
            validate_ratio(pathway, ratio)?;
        }
        if !self.cascade_level_ratio.is_finite() || self.cascade_level_ratio <= 0.0 {
            return Err(ResonanceError::invalid(
                "cascade_level_ratio",
                format!("must be finite and > 0, got {}", self.cascade_level_ratio),
            ));
        }
        Ok(())
    }
}

/// Target frequency and gear ratio of one therapeutic pathway.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathwayTarget {
    pub target_hz: f64,
    pub gear_ratio: f64,
}

/// Combined-prediction configuration.
///
/// # Defaults
/// - 1 THz resonance width σ
/// - assumed coherence 0.9
/// - categorical distance scale 5.0
/// - seven pathway targets (COX, Serotonin, Dopamine, GABA,
///   Acetylcholine, Multiple, None)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombinedConfig {
    /// Width σ of the Gaussian frequency match (default: 1e12 Hz)
    pub resonance_width_hz: f64,
    /// Coherence R used when no simulation result is supplied (default: 0.9)
    pub assumed_coherence: f64,
    /// Distance d at which the categorical factor falls to 1/e (default: 5.0)
    pub distance_scale: f64,
    pub targets: BTreeMap<String, PathwayTarget>,
}

impl Default for CombinedConfig {
    fn default() -> Self {
        let targets = [
            ("COX", 5.25e13, 892.0),
            ("Serotonin", 3.6e13, 3221.0),
            ("Dopamine", 4.5e13, 2836.0),
            ("GABA", 3.2e13, 1540.0),
            ("Acetylcholine", 3.8e13, 7615.0),
            ("Multiple", 3.5e13, 2000.0),
            ("None", 1e15, 100.0),
        ]
        .into_iter()
        .map(|(name, target_hz, gear_ratio)| {
            (
                name.to_string(),
                PathwayTarget {
                    target_hz,
                    gear_ratio,
                },
            )
        })
        .collect();
        Self {
            resonance_width_hz: 1e12,
            assumed_coherence: 0.9,
            distance_scale: 5.0,
            targets,
        }
    }
}

impl CombinedConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        for (name, value) in [
            ("resonance_width_hz", self.resonance_width_hz),
            ("distance_scale", self.distance_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ResonanceError::invalid(
                    name,
                    format!("must be finite and > 0, got {value}"),
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.assumed_coherence) {
            return Err(ResonanceError::invalid(
                "assumed_coherence",
                format!("must lie in [0, 1], got {}", self.assumed_coherence),
            ));
        }
        for (pathway, target) in &self.targets {
            if !target.target_hz.is_finite() || target.target_hz <= 0.0 {
                return Err(ResonanceError::invalid(
                    "targets",
                    format!("{pathway}: target frequency must be finite and > 0"),
                ));
            }
            validate_ratio(pathway, target.gear_ratio)?;
        }
        Ok(())
    }
}

fn validate_ratio(pathway: &str, ratio: f64) -> ResonanceResult<()> {
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(ResonanceError::invalid(
            "gear_ratio",
            format!("{pathway}: must be finite and >= 0, got {ratio}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs_validate() {
        let gear = GearConfig::default();
        assert!(gear.validate().is_ok());
        assert_eq!(gear.pathways.len(), 5);
        assert_eq!(gear.pathways["Acetylcholine"], 7615.0);

        let combined = CombinedConfig::default();
        assert!(combined.validate().is_ok());
        assert_eq!(combined.targets["None"].target_hz, 1e15);
    }

    #[test]
    fn test_negative_ratio_rejected() {
        let mut gear = GearConfig::default();
        gear.pathways.insert("Broken".into(), -1.0);
        assert_eq!(gear.validate().unwrap_err().kind(), "invalid_parameter");
    }

    #[test]
    fn test_gear_config_from_toml() {
        let config: GearConfig = toml::from_str(
            r#"
            cascade_level_ratio = 0.05
            [pathways]
            Custom = 100.0
            "#,
        )
        .unwrap();
        assert_eq!(config.pathways.len(), 1);
        assert_eq!(config.cascade_level_ratio, 0.05);
    }
}
