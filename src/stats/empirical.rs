//! # Empirical
//!
//! $$
//! \hat f(b)=\frac{\#\{i : \lfloor x_i/w\rceil_0\,w=b\}}{N},\quad w=\frac{\max x-\min x}{B}
//! $$
//!
//! Sample moments, log-returns and normalized density histograms of simulated
//! cross-sections.
//!
use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use ndarray::Array1;
use ndarray::ArrayView1;
use ndarray::Zip;
use ordered_float::OrderedFloat;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmpiricalError {
  #[error("empirical statistics need at least one value")]
  EmptySample,
  #[error("a histogram needs at least one bin")]
  InvalidBinCount,
  #[error("sample lengths differ ({left} vs {right})")]
  LengthMismatch { left: usize, right: usize },
  #[error(transparent)]
  Io(#[from] io::Error),
}

/// Arithmetic mean.
pub fn expected_value(values: ArrayView1<'_, f64>) -> Result<f64, EmpiricalError> {
  values.mean().ok_or(EmpiricalError::EmptySample)
}

/// Population variance `E[x²] − E[x]²`.
pub fn variance(values: ArrayView1<'_, f64>) -> Result<f64, EmpiricalError> {
  let mean = expected_value(values)?;
  let second = values.fold(0.0, |acc, x| acc + x * x) / values.len() as f64;
  Ok((second - mean * mean).max(0.0))
}

/// Elementwise `ln(final / initial)`.
pub fn log_returns(
  final_values: ArrayView1<'_, f64>,
  initial_values: ArrayView1<'_, f64>,
) -> Result<Array1<f64>, EmpiricalError> {
  if final_values.len() != initial_values.len() {
    return Err(EmpiricalError::LengthMismatch {
      left: final_values.len(),
      right: initial_values.len(),
    });
  }

  Ok(
    Zip::from(&final_values)
      .and(&initial_values)
      .map_collect(|f, i| (f / i).ln()),
  )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
  pub mean: f64,
  pub variance: f64,
}

impl Moments {
  pub fn of(values: ArrayView1<'_, f64>) -> Result<Self, EmpiricalError> {
    Ok(Self {
      mean: expected_value(values)?,
      variance: variance(values)?,
    })
  }
}

/// Normalized frequencies keyed by bin, iterated in ascending bin order.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityHistogram {
  bin_width: f64,
  bins: BTreeMap<OrderedFloat<f64>, f64>,
}

impl DensityHistogram {
  /// Bin `values` into bins of width `(max − min) / num_bins`. A value `v`
  /// falls into the bin keyed `trunc(v / w)·w`, so bins are anchored at zero
  /// rather than at the sample minimum.
  ///
  /// A constant sample yields a single bin at that value with density 1.
  pub fn from_values(values: ArrayView1<'_, f64>, num_bins: usize) -> Result<Self, EmpiricalError> {
    if num_bins == 0 {
      return Err(EmpiricalError::InvalidBinCount);
    }
    if values.is_empty() {
      return Err(EmpiricalError::EmptySample);
    }

    let (min, max) = values
      .iter()
      .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
      });
    let bin_width = (max - min) / num_bins as f64;

    let mut bins = BTreeMap::new();
    if bin_width > 0.0 && bin_width.is_finite() {
      for &v in values.iter() {
        // `+ 0.0` folds -0.0 into the zero bin
        let key = (v / bin_width).trunc() * bin_width + 0.0;
        *bins.entry(OrderedFloat(key)).or_insert(0.0) += 1.0;
      }
      let total = values.len() as f64;
      for density in bins.values_mut() {
        *density /= total;
      }
    } else {
      bins.insert(OrderedFloat(min), 1.0);
    }

    Ok(Self {
      bin_width: bin_width.max(0.0),
      bins,
    })
  }

  pub fn bin_width(&self) -> f64 {
    self.bin_width
  }

  pub fn len(&self) -> usize {
    self.bins.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bins.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
    self.bins.iter().map(|(k, d)| (k.into_inner(), *d))
  }

  pub fn total_density(&self) -> f64 {
    self.bins.values().sum()
  }

  /// One `bin<TAB>density` line per bin, ascending.
  pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), EmpiricalError> {
    for (bin, density) in self.iter() {
      writeln!(writer, "{bin}\t{density}")?;
    }
    Ok(())
  }

  pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EmpiricalError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    self.write_to(&mut writer)?;
    writer.flush()?;
    debug!(path = %path.display(), bins = self.len(), "histogram written");
    Ok(())
  }
}
