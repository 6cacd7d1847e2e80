use serde::Serialize;
use tracing::debug;

use resonance_core::error::ResonanceResult;
use resonance_graph::{irreversibility_cycle, memory_trace, IrreversibilityCycle, MemoryTrace};

use crate::claim::Claim;
use crate::config::SessionConfig;
use crate::step::{StepContext, StepOutcome, ValidationStep};

/// Irreversible phase-lock densification through a drug cycle, and memory
/// that persists over repeated cycles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoricalStateStep;

impl CategoricalStateStep {
    pub const NAME: &'static str = "categorical_state";
}

#[derive(Serialize)]
struct Details {
    cycle: IrreversibilityCycle,
    memory: MemoryTrace,
}

impl ValidationStep for CategoricalStateStep {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Edge densification, entropy increase and categorical memory under drug cycles"
    }

    fn claims(&self, config: &SessionConfig) -> Vec<Claim> {
        let densification = &config.densification;
        vec![
            Claim::equals("irreversible", true),
            Claim::greater_than("entropy_change", 0.0),
            Claim::within_absolute(
                "net_edge_change",
                densification.expected_edges_per_cycle,
                densification.edge_tolerance,
            ),
            Claim::greater_than("memory_net_change", 0),
        ]
    }

    fn run(&self, ctx: &StepContext<'_>) -> ResonanceResult<StepOutcome> {
        let densification = &ctx.config().densification;
        let cycle = irreversibility_cycle(densification)?;
        let memory = memory_trace(densification)?;
        debug!(
            net = cycle.net_change,
            memory_net = memory.net_change,
            "categorical state"
        );

        StepOutcome::new()
            .measure("initial_edges", cycle.initial.edge_count)
            .measure("mixed_edges", cycle.mixed.edge_count)
            .measure("final_edges", cycle.cleared.edge_count)
            .measure("net_edge_change", cycle.net_change)
            .measure("entropy_change", cycle.entropy_change)
            .measure("irreversible", cycle.irreversible)
            .measure("memory_net_change", memory.net_change)
            .with_details(&Details { cycle, memory })
    }
}
