//! Phase-lock simulation of coupled oscillators.
//!
//! Integrates the Kuramoto system
//!
//! ```text
//! dθ_i/dt = ω_i + ((1 + m) / N) · Σ_j K_ij · sin(θ_j − θ_i)
//! ```
//!
//! with a fixed-step fourth-order Runge–Kutta scheme, wrapping phases to
//! [−π, π) after every step and sampling the order parameter
//! R(t) = |mean(e^{iθ})|. With a uniform matrix K_ij = K_base this is the
//! classic mean-field model with K_mod = K_base · (1 + m).
//!
//! # Architecture
//!
//! - **config**: `PhaseLockConfig` and the `Integrator` choice
//! - **coupling**: `CouplingMatrix`
//! - **order**: order parameter and phase wrapping
//! - **simulator**: `PhaseLockSimulator` producing a `SimulationRun`
//! - **information**: information-transfer estimate from R
//! - **ensemble**: seeded oscillator populations
//! - **sweep**: independent runs over coupling strengths, in parallel

pub mod config;
pub mod coupling;
pub mod ensemble;
pub mod information;
pub mod order;
pub mod simulator;
pub mod sweep;

pub use config::{Integrator, PhaseLockConfig, MAX_STEPS};
pub use coupling::CouplingMatrix;
pub use ensemble::OscillatorEnsemble;
pub use information::InformationTransfer;
pub use order::{order_parameter, wrap_phase, OrderParameter};
pub use simulator::{OrderSample, PhaseLockSimulator, SimulationRun};
pub use sweep::{CouplingSweep, SweepPoint};
