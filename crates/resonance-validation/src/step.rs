//! The validation step abstraction.

use std::sync::OnceLock;

use serde::Serialize;
use tracing::info;

use resonance_core::error::{ResonanceError, ResonanceResult};
use resonance_core::interchange;
use resonance_core::tolerances::DEGREE_CONSISTENCY_EPS;
use resonance_core::{Frequency, Numeric};
use resonance_graph::{HarmonicNetwork, HarmonicNetworkBuilder, NetworkStatistics, SmallWorldAnalysis};

use crate::claim::Claim;
use crate::config::SessionConfig;

/// One named, self-contained validation.
///
/// Steps share no mutable state: everything they read comes from the
/// [`StepContext`], everything they produce goes into the [`StepOutcome`].
pub trait ValidationStep: Send + Sync {
    /// Stable identifier used in reports, skip lists and the CLI.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Claims evaluated against the step's measurements.
    fn claims(&self, config: &SessionConfig) -> Vec<Claim>;

    /// Run the computation. Returning an error marks the step errored.
    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome>;
}

/// The harmonic network and its derived statistics, built once per session.
#[derive(Debug)]
pub struct NetworkAnalysis {
    pub network: HarmonicNetwork,
    pub statistics: NetworkStatistics,
    pub small_world: SmallWorldAnalysis,
}

impl NetworkAnalysis {
    pub fn build(config: &SessionConfig, frequencies: &[Frequency]) -> ResonanceResult<Self> {
        let builder = HarmonicNetworkBuilder::new(config.harmonic.clone())?;
        let network = builder.build(frequencies)?;
        let statistics = NetworkStatistics::compute(&network, &config.harmonic);

        let from_sum = NetworkStatistics::average_degree_from_degree_sum(&network);
        if (from_sum - statistics.average_degree).abs() > DEGREE_CONSISTENCY_EPS {
            return Err(ResonanceError::instability(
                "degree_consistency",
                format!(
                    "2E/V = {} but Σdeg/V = {from_sum}",
                    statistics.average_degree
                ),
            ));
        }

        let small_world = SmallWorldAnalysis::analyze(&network, &statistics, &config.harmonic);
        Ok(Self {
            network,
            statistics,
            small_world,
        })
    }
}

/// Read-only inputs shared by all steps of one session.
pub struct StepContext<'a> {
    config: &'a SessionConfig,
    frequencies: &'a [Frequency],
    network: OnceLock<ResonanceResult<NetworkAnalysis>>,
}

impl<'a> StepContext<'a> {
    pub fn new(config: &'a SessionConfig, frequencies: &'a [Frequency]) -> Self {
        Self {
            config,
            frequencies,
            network: OnceLock::new(),
        }
    }

    /// The effective session configuration.
    pub fn config(&self) -> &SessionConfig {
        self.config
    }

    pub fn frequencies(&self) -> &[Frequency] {
        self.frequencies
    }

    pub fn seed(&self) -> u64 {
        self.config.seed
    }

    /// The session's harmonic network, built on first use.
    pub fn network(&self) -> ResonanceResult<&NetworkAnalysis> {
        self.network
            .get_or_init(|| {
                info!(bases = self.frequencies.len(), "building harmonic network");
                NetworkAnalysis::build(self.config, self.frequencies)
            })
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Whether artifacts should be produced at all.
    pub fn retain_artifacts(&self) -> bool {
        self.config.retain_artifacts
    }
}

/// Contents of one artifact file.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactBody {
    /// Written as pretty JSON with a `.json` extension.
    Json(serde_json::Value),
    /// Written verbatim with the given extension.
    Text { extension: String, contents: String },
}

/// A raw per-step output persisted under `artifacts/<step>/`.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub body: ArtifactBody,
}

impl Artifact {
    pub fn json<T: Serialize>(name: impl Into<String>, value: &T) -> ResonanceResult<Self> {
        Ok(Self {
            name: name.into(),
            body: ArtifactBody::Json(interchange::to_value(value)?),
        })
    }

    pub fn text(name: impl Into<String>, extension: impl Into<String>, contents: String) -> Self {
        Self {
            name: name.into(),
            body: ArtifactBody::Text {
                extension: extension.into(),
                contents,
            },
        }
    }

    pub fn file_name(&self) -> String {
        match &self.body {
            ArtifactBody::Json(_) => format!("{}.json", self.name),
            ArtifactBody::Text { extension, .. } => format!("{}.{extension}", self.name),
        }
    }
}

/// What a successful step produced.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub measurements: Vec<(String, Numeric)>,
    pub details: serde_json::Value,
    pub artifacts: Vec<Artifact>,
}

impl StepOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn measure(mut self, name: impl Into<String>, value: impl Into<Numeric>) -> Self {
        self.measurements.push((name.into(), value.into()));
        self
    }

    /// Attach a serializable summary. Non-finite floats are kept as their
    /// interchange tokens.
    pub fn with_details<T: Serialize>(mut self, details: &T) -> ResonanceResult<Self> {
        self.details = interchange::to_value(details)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn measurement(&self, name: &str) -> Option<&Numeric> {
        self.measurements
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}
