//! Validation sessions.
//!
//! A [`ValidationSession`] owns its configuration, frequency source and step
//! registry. Running it executes the declared steps in order (or on the
//! rayon pool), isolates every step failure into an *errored* result, and
//! produces one [`SessionReport`] that can be persisted atomically together
//! with optional per-step artifacts.
//!
//! # Architecture
//!
//! - **config**: `SessionConfig` (TOML, `RESONANCE_*` overrides, fast mode)
//! - **claim**: thresholds and comparators
//! - **step**: the `ValidationStep` trait and its context/outcome types
//! - **steps**: the ten built-in steps
//! - **result**: per-step results and the session report
//! - **session**: orchestration
//! - **report**: JSON persistence and artifact files
//!
//! # Example
//!
//! ```no_run
//! use resonance_validation::{SessionConfig, ValidationSession};
//!
//! let config = SessionConfig { fast_mode: true, ..Default::default() };
//! let session = ValidationSession::with_default_steps(config)?;
//! let (report, path) = session.run_and_persist()?;
//! println!("{} -> {}", report.summary, path.display());
//! # Ok::<(), resonance_core::ResonanceError>(())
//! ```

pub mod claim;
pub mod config;
pub mod report;
pub mod result;
pub mod session;
pub mod step;
pub mod steps;

pub use claim::{Claim, Comparator};
pub use config::{ModulationCase, OscillatorConfig, SessionConfig};
pub use result::{
    ClaimResult, ErrorRecord, FrequencySourceRecord, ReportSummary, SessionReport, StepStatus,
    ValidationResult,
};
pub use session::ValidationSession;
pub use step::{Artifact, ArtifactBody, NetworkAnalysis, StepContext, StepOutcome, ValidationStep};
pub use steps::{default_steps, DEFAULT_STEP_NAMES};
