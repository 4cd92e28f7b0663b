//! # Sobol
//!
//! $$
//! x_n = x_{n-1} \oplus v_{c(n)},\quad c(n)=\text{trailing zeros of } n
//! $$
//!
//! One-dimensional Sobol points from the Joe–Kuo direction numbers.
//!
use sobol::params::JoeKuoD6;
use sobol::Sobol;

/// Largest stream the quasi-random source will materialise.
pub const SOBOL_MAX_POINTS: usize = 10_000;

/// First `n` points of the 1-D sequence in `(0, 1)`. The origin is skipped
/// because it maps to `-inf` under the normal quantile.
pub fn unit_points(n: usize) -> Vec<f64> {
  let params = JoeKuoD6::minimal();
  Sobol::<f64>::new(1, &params)
    .skip(1)
    .take(n)
    .map(|point| point[0])
    .collect()
}
