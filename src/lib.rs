//! # Stochastic Schemes
//!
//! $$
//! dS_t=\mu S_t\,dt+\sigma S_t\,dW_t
//! $$
//!
//! Geometric Brownian motion simulated with three discretization schemes that
//! can be driven by one replayable stream of standard normal draws.
//!
//! | Module              | Description                                                    |
//! |---------------------|----------------------------------------------------------------|
//! | [`rng`]             | Mersenne Twister (MT19937-64) and lagged Fibonacci generators. |
//! | [`distributions`]   | Ziggurat normal sampler and the normal quantile.               |
//! | [`variates`]        | Rewindable Gaussian streams with reshuffle on exhaustion.      |
//! | [`stochastic`]      | Exact, Euler–Maruyama and Milstein path generation.            |
//! | [`stats`]           | Sample moments, log-returns and density histograms.            |
//!
pub mod distributions;
pub mod rng;
pub mod stats;
pub mod stochastic;
pub mod variates;
