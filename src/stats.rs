//! # Stats
//!
//! $$
//! \hat\mu=\frac1N\sum_i x_i,\quad \hat\sigma^2=\frac1N\sum_i x_i^2-\hat\mu^2
//! $$
//!
pub mod empirical;
