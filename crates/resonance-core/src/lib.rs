//! Core types for the resonance validation engine.
//!
//! Everything the numeric components share lives here so that the graph,
//! categorical, phase and prediction crates never depend on each other.
//!
//! # Architecture
//!
//! - **error**: `ResonanceError` taxonomy shared by every crate
//! - **frequency**: validated `Frequency` values, span and scale analysis
//! - **interchange**: JSON trees that keep non-finite floats
//! - **numeric**: tagged `Numeric` value with one total JSON conversion
//! - **source**: pluggable `FrequencySource` trait and the representative table
//! - **tolerances**: named numeric tolerances used by audits and tests
//!
//! # Example
//!
//! ```
//! use resonance_core::source::{FrequencySource, StaticFrequencySource};
//! use resonance_core::error::ResonanceResult;
//!
//! fn example() -> ResonanceResult<()> {
//!     let source = StaticFrequencySource::representative();
//!     let frequencies = source.frequencies()?;
//!     assert_eq!(frequencies.len(), 13);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod frequency;
pub mod interchange;
pub mod numeric;
pub mod source;
pub mod tolerances;

pub use error::{ResonanceError, ResonanceResult};
pub use frequency::{BiologicalScale, Frequency, FrequencySpan, ScaleCoverage};
pub use numeric::Numeric;
pub use source::{FrequencySource, StaticFrequencySource, UnavailableSource};
