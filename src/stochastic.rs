//! # Stochastic
//!
//! $$
//! dS_t=\mu S_t\,dt+\sigma S_t\,dW_t
//! $$
//!
//! | Module     | Description                                                        |
//! |------------|--------------------------------------------------------------------|
//! | [`gbm`]    | Model parameters and the closed-form terminal law.                 |
//! | [`paths`]  | The `(num_steps + 1) × num_paths` price matrix.                    |
//! | [`sde`]    | Exact, Euler–Maruyama and Milstein schemes filling the matrix.     |
//! | [`error`]  | Errors raised while building or reading a simulation.              |
//!
pub mod error;
pub mod gbm;
pub mod paths;
pub mod sde;

pub use self::error::SimulationError;
pub use self::gbm::Parameters;
pub use self::paths::PathMatrix;
pub use self::sde::Scheme;
pub use self::sde::Simulation;

/// Default start time
pub const T0: f64 = 0.0;
/// Default maturity
pub const T: f64 = 1.0;
/// Default spot price
pub const S0: f64 = 100.0;
/// Default volatility
pub const SIGMA: f64 = 0.2;
/// Default drift
pub const MU: f64 = 0.05;
/// Default number of simulated paths
pub const NUM_PATHS: usize = 10_000;
/// Default number of time steps
pub const NUM_STEPS: usize = 10;
