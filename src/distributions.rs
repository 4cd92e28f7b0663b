//! # Distributions
//!
//! $$
//! Z = \Phi^{-1}(U)\ \text{or}\ Z = \mathrm{zig}(U_1, U_2, \dots),\quad Z\sim\mathcal{N}(0,1)
//! $$
//!
pub mod normal;
