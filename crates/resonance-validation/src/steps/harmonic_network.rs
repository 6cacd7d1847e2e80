use serde::Serialize;

use resonance_core::error::ResonanceResult;
use resonance_graph::export::GraphExport;
use resonance_graph::{NetworkStatistics, SmallWorldAnalysis};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{Artifact, StepContext, StepOutcome, ValidationStep};

/// Harmonic coincidence network size, density and small-world structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct HarmonicNetworkStep;

impl HarmonicNetworkStep {
    pub const NAME: &'static str = "harmonic_network";
}

#[derive(Serialize)]
struct Details<'a> {
    statistics: &'a NetworkStatistics,
    small_world: &'a SmallWorldAnalysis,
    threshold_hz: f64,
    max_harmonic: u32,
}

impl ValidationStep for HarmonicNetworkStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Harmonic expansion and coincidence graph of the base frequencies"
    }

    fn claims(&self, _config: &SessionConfig) -> Vec<Claim> {
        vec![
            Claim::within_relative("node_count", 1950.0, 0.2),
            Claim::within_relative("edge_count", 253_013.0, 0.5),
            Claim::within_relative("average_degree", 259.5, 0.5),
            Claim::within_relative("enhancement_factor", 59_428.0, 0.5),
            Claim::greater_than("small_world_sigma", 1.0),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let analysis = ctx.network()?;
        let stats = &analysis.statistics;

        let mut outcome = StepOutcome::new()
            .measure("node_count", stats.node_count)
            .measure("edge_count", stats.edge_count)
            .measure("average_degree", stats.average_degree)
            .measure("clustering_coefficient", stats.clustering_coefficient)
            .measure("enhancement_factor", stats.enhancement_factor)
            .measure(
                "small_world_sigma",
                analysis.small_world.sigma.unwrap_or(f64::NAN),
            )
            .with_details(&Details {
                statistics: stats,
                small_world: &analysis.small_world,
                threshold_hz: ctx.config().harmonic.coincidence_threshold_hz,
                max_harmonic: ctx.config().harmonic.max_harmonic,
            })?;

        if ctx.retain_artifacts() {
            let export = GraphExport::from_network(&analysis.network);
            outcome = outcome.with_artifact(Artifact::json("network", &export)?);
            if !ctx.config().skip_visualization {
                outcome = outcome.with_artifact(Artifact::text("network", "gexf", export.to_gexf()));
            }
        }
        Ok(outcome)
    }
}
