//! # Rng
//!
//! $$
//! u_{k+1}=F(u_k),\quad x_k = \mathrm{temper}(u_k)
//! $$
//!
//! Uniform engines backing the Gaussian variate sources: a 64-bit Mersenne
//! Twister (MT19937-64) and an additive lagged Fibonacci generator with lags
//! (607, 273). Both are plain values owned by whoever constructed them.
//!
use rand::rngs::OsRng;
use rand::RngCore;
use rand::SeedableRng;

const MT_NN: usize = 312;
const MT_MM: usize = 156;
const MT_MATRIX_A: u64 = 0xb502_6f5a_a966_19e9;
const MT_UPPER_MASK: u64 = 0xffff_ffff_8000_0000;
const MT_LOWER_MASK: u64 = 0x0000_0000_7fff_ffff;
const MT_INIT_MULTIPLIER: u64 = 6_364_136_223_846_793_005;

const LF_LONG_LAG: usize = 607;
const LF_SHORT_LAG: usize = 273;

#[inline(always)]
pub(crate) fn splitmix64_next(state: &mut u64) -> u64 {
  *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
  let mut z = *state;
  z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
  z ^ (z >> 31)
}

/// Draws a fresh 64-bit seed from the operating system entropy source.
pub fn entropy_seed() -> u64 {
  OsRng.next_u64()
}

fn fill_bytes_from_u64(dest: &mut [u8], mut next: impl FnMut() -> u64) {
  let mut chunks = dest.chunks_exact_mut(8);
  for chunk in &mut chunks {
    chunk.copy_from_slice(&next().to_le_bytes());
  }
  let rem = chunks.into_remainder();
  if !rem.is_empty() {
    let bytes = next().to_le_bytes();
    rem.copy_from_slice(&bytes[..rem.len()]);
  }
}

/// 64-bit Mersenne Twister, bit-compatible with `std::mt19937_64`.
#[derive(Clone)]
pub struct Mt64 {
  state: [u64; MT_NN],
  index: usize,
}

impl Mt64 {
  pub fn new(seed: u64) -> Self {
    let mut state = [0u64; MT_NN];
    state[0] = seed;
    for i in 1..MT_NN {
      let prev = state[i - 1];
      state[i] = MT_INIT_MULTIPLIER
        .wrapping_mul(prev ^ (prev >> 62))
        .wrapping_add(i as u64);
    }
    Self {
      state,
      index: MT_NN,
    }
  }

  fn twist(&mut self) {
    for i in 0..MT_NN {
      let x = (self.state[i] & MT_UPPER_MASK) | (self.state[(i + 1) % MT_NN] & MT_LOWER_MASK);
      let mut x_a = x >> 1;
      if x & 1 != 0 {
        x_a ^= MT_MATRIX_A;
      }
      self.state[i] = self.state[(i + MT_MM) % MT_NN] ^ x_a;
    }
    self.index = 0;
  }
}

impl RngCore for Mt64 {
  #[inline]
  fn next_u32(&mut self) -> u32 {
    (self.next_u64() >> 32) as u32
  }

  #[inline]
  fn next_u64(&mut self) -> u64 {
    if self.index >= MT_NN {
      self.twist();
    }
    let mut x = self.state[self.index];
    self.index += 1;

    x ^= (x >> 29) & 0x5555_5555_5555_5555;
    x ^= (x << 17) & 0x71d6_7fff_eda6_0000;
    x ^= (x << 37) & 0xfff7_eee0_0000_0000;
    x ^ (x >> 43)
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    fill_bytes_from_u64(dest, || self.next_u64());
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

impl SeedableRng for Mt64 {
  type Seed = [u8; 8];

  fn from_seed(seed: Self::Seed) -> Self {
    Self::new(u64::from_le_bytes(seed))
  }

  fn seed_from_u64(state: u64) -> Self {
    Self::new(state)
  }
}

/// Additive lagged Fibonacci generator `x_n = x_{n-607} + x_{n-273} mod 2^64`.
///
/// The low bits of an additive lagged Fibonacci word are weak. `next_u64`
/// returns the full word, so consumers should take high bits: `next_u32` is
/// the upper half and `gen::<f64>()` uses the top 53 bits.
#[derive(Clone)]
pub struct LaggedFibonacci607 {
  state: [u64; LF_LONG_LAG],
  pos: usize,
}

impl LaggedFibonacci607 {
  pub fn new(seed: u64) -> Self {
    let mut sm = seed;
    let mut state = [0u64; LF_LONG_LAG];
    for x in state.iter_mut() {
      *x = splitmix64_next(&mut sm);
    }
    // full period needs at least one odd element
    state[0] |= 1;
    Self { state, pos: 0 }
  }
}

impl RngCore for LaggedFibonacci607 {
  #[inline]
  fn next_u32(&mut self) -> u32 {
    (self.next_u64() >> 32) as u32
  }

  #[inline]
  fn next_u64(&mut self) -> u64 {
    let short = (self.pos + LF_LONG_LAG - LF_SHORT_LAG) % LF_LONG_LAG;
    let x = self.state[self.pos].wrapping_add(self.state[short]);
    self.state[self.pos] = x;
    self.pos = (self.pos + 1) % LF_LONG_LAG;
    x
  }

  fn fill_bytes(&mut self, dest: &mut [u8]) {
    fill_bytes_from_u64(dest, || self.next_u64());
  }

  fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
    self.fill_bytes(dest);
    Ok(())
  }
}

impl SeedableRng for LaggedFibonacci607 {
  type Seed = [u8; 8];

  fn from_seed(seed: Self::Seed) -> Self {
    Self::new(u64::from_le_bytes(seed))
  }

  fn seed_from_u64(state: u64) -> Self {
    Self::new(state)
  }
}
