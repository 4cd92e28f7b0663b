//! # Variates
//!
//! $$
//! z_0, z_1, \dots, z_{N-1} \sim \mathcal{N}(0,1),\quad z_{N+k} = z_{\pi(k)}
//! $$
//!
//! Replayable streams of standard normal draws. A stream is materialised once,
//! then read through a single cursor. Running past the end reshuffles the
//! buffer in place and starts over, so the same multiset of values is reused in
//! a new order. `reset_to_start` rewinds without reshuffling, which is how
//! several discretization schemes are made to consume the identical sequence.
//!
pub mod sobol;

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::Distribution;
use rand_distr::StandardNormal;
use thiserror::Error;
use tracing::debug;

use crate::distributions::normal::inverse_cdf;
use crate::distributions::normal::Ziggurat;
use crate::rng::entropy_seed;
use crate::rng::splitmix64_next;
use crate::rng::LaggedFibonacci607;
use crate::rng::Mt64;
use self::sobol::unit_points;
pub use self::sobol::SOBOL_MAX_POINTS;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VariateError {
  #[error("{requested} Sobol variates requested, at most {max} are supported")]
  SobolCapacity { requested: usize, max: usize },
  #[error("a variate stream needs at least one value")]
  EmptyStream,
}

/// A source of standard normal draws with an explicit, rewindable cursor.
pub trait VariateSource {
  /// Next draw. Exhaustion is handled internally and never surfaces here.
  fn next_variate(&mut self) -> f64;

  /// Rewind the cursor to the first value without regenerating anything.
  /// Once the stream has wrapped, the buffer holds the reshuffled order and a
  /// rewind replays that order, not the one read before the wrap.
  fn reset_to_start(&mut self);

  /// Number of values in one pass of the stream.
  fn len(&self) -> usize;

  /// Position of the next value to be read.
  fn cursor(&self) -> usize;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  fn produce(&mut self, n: usize) -> Vec<f64> {
    (0..n).map(|_| self.next_variate()).collect()
  }

  fn fill(&mut self, out: &mut [f64]) {
    for x in out.iter_mut() {
      *x = self.next_variate();
    }
  }
}

/// Strategy used to materialise a Gaussian stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engine {
  /// MT19937-64 driving `rand_distr::StandardNormal`.
  MersenneTwister,
  /// Lagged Fibonacci (607, 273) driving the Ziggurat transform.
  LaggedFibonacci,
  /// Sobol points mapped through `√2·erf⁻¹(2u − 1)`, shuffled once.
  Sobol,
}

impl Engine {
  pub fn name(&self) -> &'static str {
    match self {
      Engine::MersenneTwister => "mersenne-twister",
      Engine::LaggedFibonacci => "lagged-fibonacci",
      Engine::Sobol => "sobol",
    }
  }
}

impl fmt::Display for Engine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Buffered Gaussian stream produced by one of the [`Engine`] strategies.
///
/// Every instance owns its generators. Nothing is shared between instances, so
/// two streams may be built and consumed on different threads.
pub struct GaussianRns {
  engine: Engine,
  seed: u64,
  data: Vec<f64>,
  cursor: usize,
  reshuffles: usize,
  shuffler: Mt64,
}

impl GaussianRns {
  /// Build `n` draws with `engine`, seeded from operating system entropy.
  pub fn new(engine: Engine, n: usize) -> Result<Self, VariateError> {
    Self::with_seed(engine, n, entropy_seed())
  }

  /// Build `n` draws with `engine` from a fixed seed. The whole stream,
  /// including later reshuffles, is a function of `(engine, n, seed)`.
  pub fn with_seed(engine: Engine, n: usize, seed: u64) -> Result<Self, VariateError> {
    if n == 0 {
      return Err(VariateError::EmptyStream);
    }

    let data: Vec<f64> = match engine {
      Engine::MersenneTwister => {
        let mut rng = Mt64::new(seed);
        (0..n).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
      }
      Engine::LaggedFibonacci => Ziggurat::new()
        .sample_iter(LaggedFibonacci607::new(seed))
        .take(n)
        .collect(),
      Engine::Sobol => sobol_variates(n, seed)?,
    };

    let mut sm = seed;
    let shuffler = Mt64::new(splitmix64_next(&mut sm));

    debug!(%engine, n, seed, "gaussian variates constructed");

    Ok(Self {
      engine,
      seed,
      data,
      cursor: 0,
      reshuffles: 0,
      shuffler,
    })
  }

  pub fn mersenne_twister(n: usize) -> Result<Self, VariateError> {
    Self::new(Engine::MersenneTwister, n)
  }

  pub fn lagged_fibonacci(n: usize) -> Result<Self, VariateError> {
    Self::new(Engine::LaggedFibonacci, n)
  }

  /// Fails with [`VariateError::SobolCapacity`] above [`SOBOL_MAX_POINTS`].
  pub fn sobol(n: usize) -> Result<Self, VariateError> {
    Self::new(Engine::Sobol, n)
  }

  pub fn engine(&self) -> Engine {
    self.engine
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  /// Current buffer contents in stream order.
  pub fn values(&self) -> &[f64] {
    &self.data
  }

  /// How many times the stream has wrapped around.
  pub fn reshuffles(&self) -> usize {
    self.reshuffles
  }

  fn reshuffle(&mut self) {
    self.data.shuffle(&mut self.shuffler);
    self.cursor = 0;
    self.reshuffles += 1;
    debug!(
      engine = %self.engine,
      n = self.data.len(),
      reshuffles = self.reshuffles,
      "variate stream exhausted, reshuffled"
    );
  }
}

impl VariateSource for GaussianRns {
  #[inline]
  fn next_variate(&mut self) -> f64 {
    if self.cursor == self.data.len() {
      self.reshuffle();
    }
    let z = self.data[self.cursor];
    self.cursor += 1;
    z
  }

  fn reset_to_start(&mut self) {
    self.cursor = 0;
  }

  fn len(&self) -> usize {
    self.data.len()
  }

  fn cursor(&self) -> usize {
    self.cursor
  }
}

impl fmt::Debug for GaussianRns {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("GaussianRns")
      .field("engine", &self.engine)
      .field("seed", &self.seed)
      .field("len", &self.data.len())
      .field("cursor", &self.cursor)
      .field("reshuffles", &self.reshuffles)
      .finish()
  }
}

fn sobol_variates(n: usize, seed: u64) -> Result<Vec<f64>, VariateError> {
  if n > SOBOL_MAX_POINTS {
    return Err(VariateError::SobolCapacity {
      requested: n,
      max: SOBOL_MAX_POINTS,
    });
  }

  let mut data: Vec<f64> = unit_points(n).into_iter().map(inverse_cdf).collect();
  // break the low-discrepancy ordering before time-ordered consumption
  data.shuffle(&mut Mt64::new(seed));
  Ok(data)
}
