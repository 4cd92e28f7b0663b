//! # GBM
//!
//! $$
//! S_T = S_{t_0}\exp\!\left((\mu-\tfrac12\sigma^2)(T-t_0)+\sigma\sqrt{T-t_0}\,Z\right)
//! $$
//!
use impl_new_derive::ImplNew;
use statrs::distribution::LogNormal;

use super::error::SimulationError;

/// Model parameters shared by every scheme. Plain value, copied into each
/// simulation and never mutated there.
#[derive(ImplNew, Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
  /// Initial time
  pub t0: f64,
  /// Maturity
  pub t: f64,
  /// Initial price
  pub s0: f64,
  /// Volatility
  pub sigma: f64,
  /// Drift
  pub mu: f64,
}

impl Default for Parameters {
  fn default() -> Self {
    Self {
      t0: super::T0,
      t: super::T,
      s0: super::S0,
      sigma: super::SIGMA,
      mu: super::MU,
    }
  }
}

impl Parameters {
  pub fn validate(&self) -> Result<(), SimulationError> {
    let invalid = |msg: String| Err(SimulationError::InvalidParameters(msg));

    if !(self.t0.is_finite() && self.t.is_finite()) {
      return invalid(format!("times must be finite (t0={}, T={})", self.t0, self.t));
    }
    if self.t <= self.t0 {
      return invalid(format!("maturity T={} must exceed t0={}", self.t, self.t0));
    }
    if !(self.s0.is_finite() && self.s0 > 0.0) {
      return invalid(format!("S0={} must be positive", self.s0));
    }
    if !(self.sigma.is_finite() && self.sigma >= 0.0) {
      return invalid(format!("sigma={} must be non-negative", self.sigma));
    }
    if !self.mu.is_finite() {
      return invalid(format!("mu={} must be finite", self.mu));
    }
    Ok(())
  }

  /// Length of the simulated horizon `T - t0`.
  pub fn horizon(&self) -> f64 {
    self.t - self.t0
  }

  /// `E[S_T] = S0·e^{μτ}`
  pub fn terminal_mean(&self) -> f64 {
    self.s0 * (self.mu * self.horizon()).exp()
  }

  /// `Var[S_T] = S0²·e^{2μτ}·(e^{σ²τ} − 1)`
  pub fn terminal_variance(&self) -> f64 {
    let tau = self.horizon();
    self.s0.powi(2) * (2.0 * self.mu * tau).exp() * ((self.sigma.powi(2) * tau).exp() - 1.0)
  }

  /// Exact law of `S_T`. `None` when the law is degenerate (`sigma == 0`) or
  /// the parameters are invalid.
  pub fn terminal_distribution(&self) -> Option<LogNormal> {
    let tau = self.horizon();
    let location = self.s0.ln() + (self.mu - 0.5 * self.sigma.powi(2)) * tau;
    let scale = self.sigma * tau.sqrt();
    LogNormal::new(location, scale).ok()
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use statrs::statistics::Distribution;

  use super::*;

  #[test]
  fn defaults_match_reference_model() {
    let p = Parameters::default();
    assert_eq!(p, Parameters::new(0.0, 1.0, 100.0, 0.2, 0.05));
    assert!(p.validate().is_ok());
  }

  #[test]
  fn validate_rejects_bad_inputs() {
    let base = Parameters::default();
    let cases = [
      Parameters { t: 0.0, ..base },
      Parameters { t: -1.0, ..base },
      Parameters { s0: 0.0, ..base },
      Parameters { s0: f64::NAN, ..base },
      Parameters { sigma: -0.1, ..base },
      Parameters { mu: f64::INFINITY, ..base },
      Parameters {
        t0: f64::NEG_INFINITY,
        ..base
      },
    ];
    for p in cases {
      assert!(
        matches!(p.validate(), Err(SimulationError::InvalidParameters(_))),
        "{p:?} accepted"
      );
    }
  }

  #[test]
  fn zero_volatility_is_valid() {
    let p = Parameters {
      sigma: 0.0,
      ..Parameters::default()
    };
    assert!(p.validate().is_ok());
    assert!(p.terminal_distribution().is_none());
    assert_relative_eq!(p.terminal_variance(), 0.0);
  }

  #[test]
  fn terminal_moments_agree_with_lognormal() {
    let p = Parameters::new(0.5, 2.0, 80.0, 0.3, 0.07);
    let law = p.terminal_distribution().unwrap();
    assert_relative_eq!(law.mean().unwrap(), p.terminal_mean(), max_relative = 1e-12);
    assert_relative_eq!(
      law.variance().unwrap(),
      p.terminal_variance(),
      max_relative = 1e-10
    );
  }
}
