//! Error taxonomy for the resonance engine.
//!
//! Computation failures travel through `ResonanceError`; unmet claims never
//! do. A validation step that finishes with a number below its threshold has
//! *failed*, while a step that returns one of these errors has *errored*.
//!
//! # Rules
//!
//! - Malformed or out-of-range configuration is `InvalidParameter` and is
//!   always surfaced, never clamped into range.
//! - Table lookups that miss are `UnknownPathway`.
//! - Broken runtime invariants (order parameter outside [0,1], metric laws,
//!   non-finite state) are `NumericInstability`.

use thiserror::Error;

/// Result type alias for resonance operations.
pub type ResonanceResult<T> = Result<T, ResonanceError>;

/// Error type shared by every resonance crate.
#[derive(Error, Debug)]
pub enum ResonanceError {
    // ========== Computation Errors ==========
    /// A parameter is malformed or outside its documented range.
    #[error("Invalid parameter '{parameter}': {reason}")]
    InvalidParameter { parameter: String, reason: String },

    /// A pathway identifier has no configured gear ratio.
    #[error("Unknown pathway: {0}")]
    UnknownPathway(String),

    /// A runtime invariant was violated during a computation.
    #[error("Numeric instability in {invariant}: {details}")]
    NumericInstability { invariant: String, details: String },

    // ========== Plumbing Errors ==========
    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report or artifact serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Filesystem error while persisting results.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResonanceError {
    /// Shorthand for [`ResonanceError::InvalidParameter`].
    pub fn invalid(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ResonanceError::NumericInstability`].
    pub fn instability(invariant: impl Into<String>, details: impl Into<String>) -> Self {
        Self::NumericInstability {
            invariant: invariant.into(),
            details: details.into(),
        }
    }

    /// Stable snake_case discriminator written into reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::UnknownPathway(_) => "unknown_pathway",
            Self::NumericInstability { .. } => "numeric_instability",
            Self::Config(_) => "config",
            Self::Serialization(_) => "serialization",
            Self::Io(_) => "io",
        }
    }

    /// True for errors that must abort a whole session rather than one step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Io(_))
    }
}

/// `std::io::Error` is not `Clone`; the copy keeps its kind and message.
impl Clone for ResonanceError {
    fn clone(&self) -> Self {
        match self {
            Self::InvalidParameter { parameter, reason } => Self::InvalidParameter {
                parameter: parameter.clone(),
                reason: reason.clone(),
            },
            Self::UnknownPathway(p) => Self::UnknownPathway(p.clone()),
            Self::NumericInstability { invariant, details } => Self::NumericInstability {
                invariant: invariant.clone(),
                details: details.clone(),
            },
            Self::Config(m) => Self::Config(m.clone()),
            Self::Serialization(m) => Self::Serialization(m.clone()),
            Self::Io(e) => Self::Io(std::io::Error::new(e.kind(), e.to_string())),
        }
    }
}

impl From<serde_json::Error> for ResonanceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Reject a non-finite or non-positive value for `parameter`.
pub fn require_positive(parameter: &str, value: f64) -> ResonanceResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ResonanceError::invalid(
            parameter,
            format!("must be finite and > 0, got {value}"),
        ));
    }
    Ok(value)
}

/// Reject a non-finite value for `parameter`.
pub fn require_finite(parameter: &str, value: f64) -> ResonanceResult<f64> {
    if !value.is_finite() {
        return Err(ResonanceError::invalid(
            parameter,
            format!("must be finite, got {value}"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_parameter_display() {
        let err = ResonanceError::invalid("coincidence_threshold_hz", "must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("coincidence_threshold_hz"));
        assert!(msg.contains("must be > 0"));
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_unknown_pathway_display() {
        let err = ResonanceError::UnknownPathway("Histamine".to_string());
        assert_eq!(err.to_string(), "Unknown pathway: Histamine");
        assert_eq!(err.kind(), "unknown_pathway");
    }

    #[test]
    fn test_instability_display() {
        let err = ResonanceError::instability("order_parameter_bounds", "R = 1.2 at t = 3.0");
        assert!(err.to_string().contains("order_parameter_bounds"));
        assert!(err.to_string().contains("R = 1.2"));
        assert_eq!(err.kind(), "numeric_instability");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_io_error_conversion_is_fatal() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ResonanceError = io.into();
        assert!(matches!(err, ResonanceError::Io(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_clone_preserves_kind_and_message() {
        let io = ResonanceError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let copy = io.clone();
        assert_eq!(copy.kind(), "io");
        assert_eq!(copy.to_string(), io.to_string());

        let err = ResonanceError::instability("order_parameter_bounds", "R = 1.5");
        assert_eq!(err.clone().to_string(), err.to_string());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let parse = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: ResonanceError = parse.into();
        assert_eq!(err.kind(), "serialization");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("x", 2.5).unwrap(), 2.5);
        assert!(require_positive("x", 0.0).is_err());
        assert!(require_positive("x", -1.0).is_err());
        assert!(require_positive("x", f64::NAN).is_err());
        assert!(require_positive("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_finite() {
        assert_eq!(require_finite("x", -3.0).unwrap(), -3.0);
        assert!(require_finite("x", f64::NEG_INFINITY).is_err());
    }
}
