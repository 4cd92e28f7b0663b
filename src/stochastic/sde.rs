//! # SDE schemes
//!
//! $$
//! S_{k+1} = S_k\cdot f(Z_k),\quad
//! f(z)=\begin{cases}
//! e^{(\mu-\frac12\sigma^2)\Delta t+\sigma\sqrt{\Delta t}\,z} & \text{exact}\\
//! 1+\mu\Delta t+\sigma\sqrt{\Delta t}\,z & \text{Euler–Maruyama}\\
//! 1+(\mu-\frac12\sigma^2)\Delta t+\sigma\sqrt{\Delta t}\,z+\frac12\sigma^2\Delta t\,z^2 & \text{Milstein}
//! \end{cases}
//! $$
//!
//! All three schemes read their draws from a borrowed [`VariateSource`]. Rewind
//! the source with `reset_to_start` between schemes to drive them with the same
//! sequence; without the rewind the second scheme continues where the first
//! stopped and the comparison is no longer paired.
//!
use std::fmt;

use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray::Zip;
use tracing::debug;

use super::error::SimulationError;
use super::gbm::Parameters;
use super::paths::PathMatrix;
use crate::variates::VariateSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
  /// Closed-form GBM solution; no discretization error.
  Exact,
  /// First order scheme, drops the Itô correction term.
  EulerMaruyama,
  /// Euler–Maruyama plus the `½σ²Δt(z² − 1)` correction.
  Milstein,
}

/// Per-step constants shared by the recurrences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepCoefficients {
  /// `σ√Δt`
  pub vol: f64,
  /// `½σ²Δt`
  pub half_var: f64,
  /// `μΔt`
  pub drift: f64,
}

impl StepCoefficients {
  pub fn new(params: &Parameters, dt: f64) -> Self {
    Self {
      vol: params.sigma * dt.sqrt(),
      half_var: 0.5 * params.sigma * params.sigma * dt,
      drift: params.mu * dt,
    }
  }
}

impl Scheme {
  pub const ALL: [Scheme; 3] = [Scheme::Exact, Scheme::EulerMaruyama, Scheme::Milstein];

  pub fn name(&self) -> &'static str {
    match self {
      Scheme::Exact => "exact",
      Scheme::EulerMaruyama => "euler-maruyama",
      Scheme::Milstein => "milstein",
    }
  }

  /// Short tag used in output file names.
  pub fn tag(&self) -> &'static str {
    match self {
      Scheme::Exact => "EX",
      Scheme::EulerMaruyama => "EM",
      Scheme::Milstein => "M",
    }
  }

  /// Multiplicative one-step factor for a standard normal draw `z`.
  #[inline]
  pub fn factor(&self, c: &StepCoefficients, z: f64) -> f64 {
    match self {
      Scheme::Exact => (c.drift - c.half_var + c.vol * z).exp(),
      Scheme::EulerMaruyama => 1.0 + c.drift + c.vol * z,
      Scheme::Milstein => c.vol * z + c.half_var * z * z + (1.0 + c.drift - c.half_var),
    }
  }
}

impl fmt::Display for Scheme {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A fully populated set of price paths produced by one scheme.
///
/// Construction either completes every row or returns an error; a partially
/// filled matrix never reaches the caller. The finished matrix is read-only.
#[derive(Debug, Clone)]
pub struct Simulation {
  scheme: Scheme,
  params: Parameters,
  dt: f64,
  paths: PathMatrix,
}

impl Simulation {
  /// Simulate `num_paths` paths over `num_steps` steps, drawing
  /// `num_paths * num_steps` values from `source` in row order.
  pub fn new<S>(
    scheme: Scheme,
    params: Parameters,
    num_paths: usize,
    num_steps: usize,
    source: &mut S,
  ) -> Result<Self, SimulationError>
  where
    S: VariateSource + ?Sized,
  {
    params.validate()?;
    let mut paths = PathMatrix::new(params.s0, num_paths, num_steps)?;

    let dt = params.horizon() / num_steps as f64;
    let coeffs = StepCoefficients::new(&params, dt);

    let mut z = vec![0.0; num_paths];
    let mut next = Array1::<f64>::zeros(num_paths);

    for k in 1..=num_steps {
      source.fill(&mut z);
      let prev = paths.row(k - 1)?;
      Zip::from(&mut next)
        .and(prev)
        .and(ArrayView1::from(z.as_slice()))
        .par_for_each(|s, &prev, &w| *s = prev * scheme.factor(&coeffs, w));
      paths.set_row(k, next.view())?;
    }

    debug!(%scheme, num_paths, num_steps, dt, "simulation complete");

    Ok(Self {
      scheme,
      params,
      dt,
      paths,
    })
  }

  pub fn exact<S>(
    params: Parameters,
    num_paths: usize,
    num_steps: usize,
    source: &mut S,
  ) -> Result<Self, SimulationError>
  where
    S: VariateSource + ?Sized,
  {
    Self::new(Scheme::Exact, params, num_paths, num_steps, source)
  }

  pub fn euler_maruyama<S>(
    params: Parameters,
    num_paths: usize,
    num_steps: usize,
    source: &mut S,
  ) -> Result<Self, SimulationError>
  where
    S: VariateSource + ?Sized,
  {
    Self::new(Scheme::EulerMaruyama, params, num_paths, num_steps, source)
  }

  pub fn milstein<S>(
    params: Parameters,
    num_paths: usize,
    num_steps: usize,
    source: &mut S,
  ) -> Result<Self, SimulationError>
  where
    S: VariateSource + ?Sized,
  {
    Self::new(Scheme::Milstein, params, num_paths, num_steps, source)
  }

  pub fn scheme(&self) -> Scheme {
    self.scheme
  }

  pub fn parameters(&self) -> &Parameters {
    &self.params
  }

  /// Step size `(T - t0) / num_steps`
  pub fn dt(&self) -> f64 {
    self.dt
  }

  pub fn num_paths(&self) -> usize {
    self.paths.num_paths()
  }

  pub fn num_steps(&self) -> usize {
    self.paths.num_steps()
  }

  /// Time of step `k`, `t0 + k·Δt`.
  pub fn time_at(&self, k: usize) -> f64 {
    self.params.t0 + k as f64 * self.dt
  }

  /// Prices of every path at step `k`.
  pub fn row(&self, k: usize) -> Result<ArrayView1<'_, f64>, SimulationError> {
    self.paths.row(k)
  }

  /// Prices of every path at maturity.
  pub fn final_row(&self) -> ArrayView1<'_, f64> {
    self.paths.last_row()
  }

  pub fn paths(&self) -> &PathMatrix {
    &self.paths
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_abs_diff_eq;
  use approx::assert_relative_eq;

  use super::*;
  use crate::variates::Engine;
  use crate::variates::GaussianRns;

  /// Replays a fixed list of draws, cycling.
  struct Scripted {
    values: Vec<f64>,
    cursor: usize,
  }

  impl Scripted {
    fn new(values: Vec<f64>) -> Self {
      Self { values, cursor: 0 }
    }
  }

  impl VariateSource for Scripted {
    fn next_variate(&mut self) -> f64 {
      if self.cursor == self.values.len() {
        self.cursor = 0;
      }
      let z = self.values[self.cursor];
      self.cursor += 1;
      z
    }

    fn reset_to_start(&mut self) {
      self.cursor = 0;
    }

    fn len(&self) -> usize {
      self.values.len()
    }

    fn cursor(&self) -> usize {
      self.cursor
    }
  }

  #[test]
  fn factors_at_zero_draw() {
    let p = Parameters::default();
    let c = StepCoefficients::new(&p, 0.1);
    assert_relative_eq!(Scheme::Exact.factor(&c, 0.0), 0.003f64.exp(), max_relative = 1e-14);
    assert_relative_eq!(Scheme::EulerMaruyama.factor(&c, 0.0), 1.005, max_relative = 1e-14);
    assert_relative_eq!(Scheme::Milstein.factor(&c, 0.0), 1.003, max_relative = 1e-14);
  }

  #[test]
  fn milstein_adds_ito_correction_to_euler() {
    let p = Parameters::default();
    let c = StepCoefficients::new(&p, 0.25);
    for z in [-2.0, -0.5, 0.0, 0.7, 1.9] {
      let diff = Scheme::Milstein.factor(&c, z) - Scheme::EulerMaruyama.factor(&c, z);
      assert_abs_diff_eq!(diff, c.half_var * (z * z - 1.0), epsilon = 1e-14);
    }
  }

  #[test]
  fn each_step_consumes_one_draw_per_path() {
    let mut src = Scripted::new(vec![0.1, -0.2, 0.3, 0.4, -0.5, 0.6]);
    let p = Parameters::default();
    let sim = Simulation::exact(p, 3, 2, &mut src).unwrap();
    assert_eq!(src.cursor(), 6);

    let c = StepCoefficients::new(&p, 0.5);
    let row1 = sim.row(1).unwrap();
    let row2 = sim.row(2).unwrap();
    for (i, z) in [0.1, -0.2, 0.3].into_iter().enumerate() {
      assert_relative_eq!(row1[i], 100.0 * Scheme::Exact.factor(&c, z), max_relative = 1e-14);
    }
    for (i, z) in [0.4, -0.5, 0.6].into_iter().enumerate() {
      assert_relative_eq!(
        row2[i],
        row1[i] * Scheme::Exact.factor(&c, z),
        max_relative = 1e-14
      );
    }
  }

  #[test]
  fn step_zero_is_initial_price_for_all_schemes() {
    let mut rns = GaussianRns::with_seed(Engine::MersenneTwister, 50 * 4, 1).unwrap();
    for scheme in Scheme::ALL {
      rns.reset_to_start();
      let sim = Simulation::new(scheme, Parameters::default(), 50, 4, &mut rns).unwrap();
      assert_eq!(sim.row(0).unwrap().len(), 50);
      assert!(sim.row(0).unwrap().iter().all(|s| *s == 100.0));
    }
  }

  #[test]
  fn replayed_stream_gives_identical_paths() {
    let mut rns = GaussianRns::with_seed(Engine::LaggedFibonacci, 200, 2).unwrap();
    let a = Simulation::milstein(Parameters::default(), 20, 10, &mut rns).unwrap();
    rns.reset_to_start();
    let b = Simulation::milstein(Parameters::default(), 20, 10, &mut rns).unwrap();
    assert_eq!(a.paths(), b.paths());
  }

  #[test]
  fn unreset_stream_changes_paths() {
    let mut rns = GaussianRns::with_seed(Engine::MersenneTwister, 200, 2).unwrap();
    let a = Simulation::exact(Parameters::default(), 20, 10, &mut rns).unwrap();
    let b = Simulation::exact(Parameters::default(), 20, 10, &mut rns).unwrap();
    assert_ne!(a.final_row(), b.final_row());
    assert_eq!(rns.reshuffles(), 1);
  }

  #[test]
  fn row_access_is_bounds_checked() {
    let mut src = Scripted::new(vec![0.0]);
    let sim = Simulation::euler_maruyama(Parameters::default(), 2, 5, &mut src).unwrap();
    assert!(sim.row(5).is_ok());
    assert_eq!(
      sim.row(6).unwrap_err(),
      SimulationError::RowOutOfRange {
        index: 6,
        num_steps: 5
      }
    );
  }

  #[test]
  fn invalid_inputs_fail_before_drawing() {
    let mut src = Scripted::new(vec![0.0]);
    let bad = Parameters {
      s0: -1.0,
      ..Parameters::default()
    };
    assert!(matches!(
      Simulation::exact(bad, 2, 2, &mut src),
      Err(SimulationError::InvalidParameters(_))
    ));
    assert_eq!(
      Simulation::exact(Parameters::default(), 0, 2, &mut src).unwrap_err(),
      SimulationError::EmptyPaths
    );
    assert_eq!(
      Simulation::exact(Parameters::default(), 2, 0, &mut src).unwrap_err(),
      SimulationError::NoSteps
    );
    assert_eq!(src.cursor(), 0);
  }

  #[test]
  fn time_grid_spans_horizon() {
    let mut src = Scripted::new(vec![0.0]);
    let p = Parameters::new(0.5, 2.5, 100.0, 0.2, 0.05);
    let sim = Simulation::exact(p, 1, 8, &mut src).unwrap();
    assert_relative_eq!(sim.dt(), 0.25);
    assert_relative_eq!(sim.time_at(0), 0.5);
    assert_relative_eq!(sim.time_at(8), 2.5);
  }

  #[test]
  fn works_through_trait_object() {
    let mut rns = GaussianRns::with_seed(Engine::Sobol, 100, 4).unwrap();
    let source: &mut dyn VariateSource = &mut rns;
    let sim = Simulation::milstein(Parameters::default(), 10, 10, source).unwrap();
    assert!(sim.final_row().iter().all(|s| *s > 0.0));
  }
}
