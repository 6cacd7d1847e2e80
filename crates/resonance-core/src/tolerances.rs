//! Named numeric tolerances.
//!
//! Every audit and every test compares floats against one of these
//! constants instead of an inline literal.

/// Distances and identities that should hold exactly up to rounding.
pub const METRIC_EPS: f64 = 1e-10;

/// Slack allowed on order-parameter bounds before a run is declared unstable.
pub const ORDER_PARAMETER_EPS: f64 = 1e-9;

/// Relative error allowed when leaf volumes are summed back to the parent.
pub const VOLUME_RELATIVE_EPS: f64 = 1e-9;

/// Relative error bound used by the decomposition volume claim.
pub const VOLUME_CLAIM_RELATIVE: f64 = 0.01;

/// Comparison of average-degree formulations on the same network.
pub const DEGREE_CONSISTENCY_EPS: f64 = 1e-12;

/// Tolerance for RK4 against analytic free rotation over short horizons.
pub const INTEGRATOR_EPS: f64 = 1e-9;

