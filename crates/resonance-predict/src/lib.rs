//! Frequency-ratio prediction.
//!
//! A gear ratio G maps a source frequency f onto a pathway response
//! frequency `G·f` with response time `2π / (G·f)`. Ratios are table
//! lookups fixed at configuration time; nothing is fitted.
//!
//! # Architecture
//!
//! - **config**: `GearConfig` (pathway ratios, cascade ratio) and
//!   `CombinedConfig` (pathway targets, resonance width)
//! - **gear**: `GearRatioTable`, `GearRatioPredictor`, response-time checks
//! - **cascade**: propagation through the eight biological scales
//! - **combined**: efficacy from frequency match, coherence and distance
//! - **enhancement**: multiplicative enhancement and temporal resolution

pub mod cascade;
pub mod combined;
pub mod config;
pub mod enhancement;
pub mod gear;

pub use cascade::{CascadeLevel, MultiScaleCascade};
pub use combined::{
    reference_compounds, CombinedInput, CombinedPrediction, CombinedPredictor, ReferenceCompound,
};
pub use config::{CombinedConfig, GearConfig, PathwayTarget};
pub use enhancement::{EnhancementCascade, EnhancementReport, PLANCK_TIME_S};
pub use gear::{
    reference_response_cases, response_accuracy, GearPrediction, GearRatioPredictor,
    GearRatioTable, GearStatistics, ResponseCase, ResponseCheck, ResponseTime,
};
