//! # Paths
//!
//! $$
//! P_{k,i} = S^{(i)}_{t_0 + k\Delta t},\quad k = 0..=K,\ i = 0..N
//! $$
//!
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayViewMut1;

use super::error::SimulationError;

/// Price matrix with one row per time step and one column per path.
/// Row 0 is the initial price replicated across all paths.
#[derive(Debug, Clone, PartialEq)]
pub struct PathMatrix {
  prices: Array2<f64>,
}

impl PathMatrix {
  pub fn new(s0: f64, num_paths: usize, num_steps: usize) -> Result<Self, SimulationError> {
    if num_paths == 0 {
      return Err(SimulationError::EmptyPaths);
    }
    if num_steps == 0 {
      return Err(SimulationError::NoSteps);
    }

    let mut prices = Array2::<f64>::zeros((num_steps + 1, num_paths));
    prices.row_mut(0).fill(s0);
    Ok(Self { prices })
  }

  pub fn num_paths(&self) -> usize {
    self.prices.ncols()
  }

  pub fn num_steps(&self) -> usize {
    self.prices.nrows() - 1
  }

  fn check_index(&self, k: usize) -> Result<(), SimulationError> {
    if k > self.num_steps() {
      return Err(SimulationError::RowOutOfRange {
        index: k,
        num_steps: self.num_steps(),
      });
    }
    Ok(())
  }

  /// Cross-section of all paths at step `k`.
  pub fn row(&self, k: usize) -> Result<ArrayView1<'_, f64>, SimulationError> {
    self.check_index(k)?;
    Ok(self.prices.row(k))
  }

  pub fn row_mut(&mut self, k: usize) -> Result<ArrayViewMut1<'_, f64>, SimulationError> {
    self.check_index(k)?;
    Ok(self.prices.row_mut(k))
  }

  /// Replace the cross-section at step `k`. Other rows are left untouched.
  pub fn set_row(&mut self, k: usize, values: ArrayView1<'_, f64>) -> Result<(), SimulationError> {
    let expected = self.num_paths();
    if values.len() != expected {
      return Err(SimulationError::RowLength {
        expected,
        actual: values.len(),
      });
    }
    self.row_mut(k)?.assign(&values);
    Ok(())
  }

  /// Cross-section at maturity.
  pub fn last_row(&self) -> ArrayView1<'_, f64> {
    self.prices.row(self.num_steps())
  }
}
