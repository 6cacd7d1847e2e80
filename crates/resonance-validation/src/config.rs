//! Session configuration.
//!
//! Loaded from TOML, optionally overridden from `RESONANCE_*` environment
//! variables, validated, then turned into the configuration the steps
//! actually see by [`SessionConfig::effective`].

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use resonance_categorical::{DecompositionConfig, MapperConfig, SemanticGravityConfig};
use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_graph::{DensificationConfig, HarmonicConfig};
use resonance_phase::PhaseLockConfig;
use resonance_predict::{CombinedConfig, GearConfig};

/// Fast-mode ceilings.
pub const FAST_MAX_HARMONIC: u32 = 30;
pub const FAST_DECOMPOSITION_DEPTH: u32 = 6;
pub const FAST_OSCILLATOR_COUNT: usize = 20;
pub const FAST_DURATION: f64 = 20.0;
pub const FAST_CLUSTERING_SAMPLE: usize = 200;
pub const FAST_GRAVITY_TRIALS: usize = 10;
pub const FAST_GRAVITY_STEPS: usize = 500;

/// A coupling modulation with a literature expectation for K_mod.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationCase {
    pub name: String,
    /// Concentration in mol/L.
    pub concentration: f64,
    /// Binding affinity in L/mol.
    pub affinity: f64,
    pub expected_coupling: f64,
}

impl ModulationCase {
    /// Modulation factor m = concentration × affinity.
    pub fn modulation(&self) -> f64 {
        self.concentration * self.affinity
    }
}

/// Oscillator population and sweep setup for the phase-lock step.
///
/// # Defaults
/// - 50 oscillators, ω ~ N(10, 2)
/// - K ∈ {0.1, 0.3, 0.5, 0.7, 0.9}
/// - K₀ = 0.5 for modulation cases, accepted within 30%
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillatorConfig {
    pub count: usize,
    pub frequency_mean: f64,
    pub frequency_std: f64,
    pub base_coupling: f64,
    pub modulation_tolerance: f64,
    pub couplings: Vec<f64>,
    pub modulation_cases: Vec<ModulationCase>,
}

impl Default for OscillatorConfig {
    fn default() -> Self {
        let case = |name: &str, concentration, affinity, expected_coupling| ModulationCase {
            name: name.to_string(),
            concentration,
            affinity,
            expected_coupling,
        };
        Self {
            count: 50,
            frequency_mean: 10.0,
            frequency_std: 2.0,
            base_coupling: 0.5,
            modulation_tolerance: 0.3,
            couplings: vec![0.1, 0.3, 0.5, 0.7, 0.9],
            modulation_cases: vec![
                case("Lithium", 1e-3, 5e3, 0.75),
                case("Dopamine", 1e-4, 2e3, 0.60),
                case("Serotonin", 1e-4, 3e3, 0.65),
            ],
        }
    }
}

impl OscillatorConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        if self.count == 0 {
            return Err(ResonanceError::invalid("oscillators.count", "must be >= 1"));
        }
        if !self.frequency_mean.is_finite() {
            return Err(ResonanceError::invalid(
                "oscillators.frequency_mean",
                format!("must be finite, got {}", self.frequency_mean),
            ));
        }
        if !self.frequency_std.is_finite() || self.frequency_std < 0.0 {
            return Err(ResonanceError::invalid(
                "oscillators.frequency_std",
                format!("must be finite and >= 0, got {}", self.frequency_std),
            ));
        }
        if self.couplings.is_empty() || self.couplings.iter().any(|k| !k.is_finite()) {
            return Err(ResonanceError::invalid(
                "oscillators.couplings",
                "need at least one finite coupling strength",
            ));
        }
        if !self.modulation_tolerance.is_finite() || self.modulation_tolerance <= 0.0 {
            return Err(ResonanceError::invalid(
                "oscillators.modulation_tolerance",
                format!("must be finite and > 0, got {}", self.modulation_tolerance),
            ));
        }
        for case in &self.modulation_cases {
            if !case.modulation().is_finite() || case.expected_coupling <= 0.0 {
                return Err(ResonanceError::invalid(
                    "oscillators.modulation_cases",
                    format!("{}: needs finite modulation and expected K > 0", case.name),
                ));
            }
        }
        Ok(())
    }
}

/// Everything a session needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Shrink expensive parameters (default: false)
    pub fast_mode: bool,
    /// Steps reported as skipped (default: none)
    pub skip_steps: Vec<String>,
    /// When non-empty, only these steps run; the rest are skipped
    pub only_steps: Vec<String>,
    /// Do not produce visualization exports such as GEXF (default: false)
    pub skip_visualization: bool,
    /// Write per-step artifact files (default: false)
    pub retain_artifacts: bool,
    /// Run steps on the rayon pool (default: false)
    pub parallel_steps: bool,
    /// Report directory (default: "results")
    pub output_dir: PathBuf,
    /// Seed for every sampled estimate (default: 42)
    pub seed: u64,

    pub harmonic: HarmonicConfig,
    pub mapper: MapperConfig,
    pub decomposition: DecompositionConfig,
    pub phase_lock: PhaseLockConfig,
    pub oscillators: OscillatorConfig,
    pub gear: GearConfig,
    pub combined: CombinedConfig,
    pub gravity: SemanticGravityConfig,
    pub densification: DensificationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fast_mode: false,
            skip_steps: Vec::new(),
            only_steps: Vec::new(),
            skip_visualization: false,
            retain_artifacts: false,
            parallel_steps: false,
            output_dir: PathBuf::from("results"),
            seed: 42,
            harmonic: HarmonicConfig::default(),
            mapper: MapperConfig::default(),
            decomposition: DecompositionConfig::default(),
            phase_lock: PhaseLockConfig::default(),
            oscillators: OscillatorConfig::default(),
            gear: GearConfig::default(),
            combined: CombinedConfig::default(),
            gravity: SemanticGravityConfig::default(),
            densification: DensificationConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// - `ResonanceError::Config` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> ResonanceResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ResonanceError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        toml::from_str(&contents).map_err(|e| {
            ResonanceError::Config(format!(
                "Failed to parse TOML in '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(toml: &str) -> ResonanceResult<Self> {
        toml::from_str(toml)
            .map_err(|e| ResonanceError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml_string(&self) -> ResonanceResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ResonanceError::Config(format!("Failed to serialize to TOML: {}", e)))
    }

    /// Apply environment variable overrides. Prefix: `RESONANCE_`
    ///
    /// | Variable | Field | Type |
    /// |----------|-------|------|
    /// | `RESONANCE_FAST_MODE` | `fast_mode` | bool |
    /// | `RESONANCE_OUTPUT_DIR` | `output_dir` | path |
    /// | `RESONANCE_SEED` | `seed` | u64 |
    /// | `RESONANCE_SKIP` | `skip_steps` | comma-separated names |
    /// | `RESONANCE_PARALLEL` | `parallel_steps` | bool |
    ///
    /// # Errors
    /// - `ResonanceError::InvalidParameter` naming the variable when a value
    ///   does not parse
    pub fn with_env_overrides(self) -> ResonanceResult<Self> {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from any `RESONANCE_*` lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> ResonanceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("RESONANCE_FAST_MODE") {
            self.fast_mode = parse_override("RESONANCE_FAST_MODE", &val)?;
        }
        if let Some(val) = lookup("RESONANCE_OUTPUT_DIR") {
            if val.is_empty() {
                return Err(ResonanceError::invalid(
                    "RESONANCE_OUTPUT_DIR",
                    "must not be empty",
                ));
            }
            self.output_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("RESONANCE_SEED") {
            self.seed = parse_override("RESONANCE_SEED", &val)?;
        }
        if let Some(val) = lookup("RESONANCE_SKIP") {
            self.skip_steps.extend(
                val.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from),
            );
        }
        if let Some(val) = lookup("RESONANCE_PARALLEL") {
            self.parallel_steps = parse_override("RESONANCE_PARALLEL", &val)?;
        }
        Ok(self)
    }

    /// Validate every component configuration.
    ///
    /// Step names in `skip_steps`/`only_steps` are checked by the session
    /// against its registry.
    pub fn validate(&self) -> ResonanceResult<()> {
        self.harmonic.validate()?;
        self.mapper.validate()?;
        self.decomposition.validate()?;
        self.phase_lock.validate()?;
        self.oscillators.validate()?;
        self.gear.validate()?;
        self.combined.validate()?;
        self.gravity.validate()?;
        self.densification.validate()?;
        if self.output_dir.as_os_str().is_empty() {
            return Err(ResonanceError::invalid("output_dir", "must not be empty"));
        }
        Ok(())
    }

    /// The configuration the steps run with.
    ///
    /// The session seed is copied into every seeded component. In fast mode
    /// the expensive sizes are capped; step names and order never change.
    pub fn effective(&self) -> Self {
        let mut config = self.clone();
        config.harmonic.seed = self.seed;
        config.decomposition.seed = self.seed;
        config.gravity.seed = self.seed;
        config.densification.seed = self.seed;
        if self.fast_mode {
            config.harmonic.max_harmonic = config.harmonic.max_harmonic.min(FAST_MAX_HARMONIC);
            config.harmonic.clustering_sample_size = config
                .harmonic
                .clustering_sample_size
                .min(FAST_CLUSTERING_SAMPLE);
            config.decomposition.depth = config.decomposition.depth.min(FAST_DECOMPOSITION_DEPTH);
            config.oscillators.count = config.oscillators.count.min(FAST_OSCILLATOR_COUNT);
            config.phase_lock.duration = config.phase_lock.duration.min(FAST_DURATION);
            config.gravity.trials = config.gravity.trials.min(FAST_GRAVITY_TRIALS);
            config.gravity.steps = config.gravity.steps.min(FAST_GRAVITY_STEPS);
        }
        config
    }
}

fn parse_override<T>(variable: &str, value: &str) -> ResonanceResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse::<T>().map_err(|e| {
        ResonanceError::invalid(variable, format!("cannot parse '{value}': {e}"))
    })
}
