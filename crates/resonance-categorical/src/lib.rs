//! Categorical coordinates and ternary decomposition of coordinate space.
//!
//! A frequency maps deterministically to a [`CategoricalCoordinate`]
//! (knowledge, time, entropy). Coordinates form a Euclidean metric space;
//! [`metric::audit_metric_laws`] counts every law check at runtime, and
//! [`MetricReport::ensure_holds`] turns a violation into `NumericInstability`.
//!
//! A bounded region of that space is split recursively into thirds along
//! axis `level mod 3`. The 3^d leaf [`Channel`]s of a depth-d split are
//! produced lazily by [`TernaryDecomposition::channels`], one at a time.
//!
//! # Architecture
//!
//! - **config**: `MapperConfig` and `DecompositionConfig`
//! - **coordinate**: `CategoricalCoordinate` and distance
//! - **mapper**: frequency → coordinate mapping
//! - **metric**: metric-law audit and pair classification
//! - **region**: axis-aligned boxes and equal-range thirds
//! - **decomposition**: lazy channel iterator and completeness audit
//! - **gravity**: potential landscape, Langevin navigation and target ranking

pub mod config;
pub mod coordinate;
pub mod decomposition;
pub mod gravity;
pub mod mapper;
pub mod metric;
pub mod region;

pub use config::{DecompositionConfig, MapperConfig};
pub use coordinate::CategoricalCoordinate;
pub use decomposition::{
    Channel, ChannelIter, ChannelPath, DecompositionAudit, TernaryDecomposition, Third,
    MAX_DECOMPOSITION_DEPTH,
};
pub use gravity::{
    complexity_reduction, navigate, rank_targets, ComplexityRow, LangevinSampler,
    NavigationSummary, PotentialField, SemanticGravityConfig, TargetRanking, Trajectory,
};
pub use mapper::{CategoricalMapper, MappingContext};
pub use metric::{audit_metric_laws, MetricReport, MetricViolation, PairClassifier};
pub use region::{Axis, Region};
