//! # Normal
//!
//! $$
//! f(x)=\frac{1}{\sqrt{2\pi}}\exp\!\left(-\frac{x^2}{2}\right)
//! $$
//!
//! Marsaglia–Tsang Ziggurat with 128 layers, plus the inverse-CDF map used for
//! quasi-random points.
//!
use std::sync::OnceLock;

use rand::Rng;
use rand_distr::Distribution;
use statrs::function::erf::erf_inv;

const R_TAIL: f64 = 3.442619855899;
const LAYER_AREA: f64 = 9.91256303526217e-3;
const M1: f64 = 2_147_483_648.0;

struct ZigTables {
  kn: [i64; 128],
  wn: [f64; 128],
  fn_tab: [f64; 128],
}

static ZIG_TABLES: OnceLock<ZigTables> = OnceLock::new();

fn zig_tables() -> &'static ZigTables {
  ZIG_TABLES.get_or_init(|| {
    let mut kn = [0i64; 128];
    let mut wn = [0.0f64; 128];
    let mut fn_tab = [0.0f64; 128];

    let mut dn = R_TAIL;
    let mut tn = dn;
    let q = LAYER_AREA / (-0.5 * dn * dn).exp();

    kn[0] = ((dn / q) * M1) as i64;
    kn[1] = 0;

    wn[0] = q / M1;
    wn[127] = dn / M1;

    fn_tab[0] = 1.0;
    fn_tab[127] = (-0.5 * dn * dn).exp();

    for i in (1..=126).rev() {
      dn = (-2.0 * (LAYER_AREA / dn + (-0.5 * dn * dn).exp()).ln()).sqrt();
      kn[i + 1] = ((dn / tn) * M1) as i64;
      tn = dn;
      fn_tab[i] = (-0.5 * dn * dn).exp();
      wn[i] = dn / M1;
    }

    ZigTables { kn, wn, fn_tab }
  })
}

/// Uniform in (0, 1], safe to pass to `ln`.
#[inline]
fn open_unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
  1.0 - rng.gen::<f64>()
}

#[cold]
#[inline(never)]
fn nfix<R: Rng + ?Sized>(hz: i32, iz: usize, tables: &ZigTables, rng: &mut R) -> f64 {
  let mut hz = hz;
  let mut iz = iz;

  loop {
    let x = hz as f64 * tables.wn[iz];

    if iz == 0 {
      loop {
        let x_tail = -open_unit(rng).ln() / R_TAIL;
        let y = -open_unit(rng).ln();
        if y + y >= x_tail * x_tail {
          return if hz > 0 {
            R_TAIL + x_tail
          } else {
            -R_TAIL - x_tail
          };
        }
      }
    }

    if tables.fn_tab[iz] + rng.gen::<f64>() * (tables.fn_tab[iz - 1] - tables.fn_tab[iz])
      < (-0.5 * x * x).exp()
    {
      return x;
    }

    hz = rng.next_u32() as i32;
    iz = (hz & 127) as usize;
    if (hz.unsigned_abs() as i64) < tables.kn[iz] {
      return hz as f64 * tables.wn[iz];
    }
  }
}

/// Standard normal sampler using the table-based Ziggurat algorithm.
///
/// Roughly 99% of draws cost one 32-bit integer, a table lookup and a multiply;
/// the rest fall back to `nfix`. Tables are built once per process and are
/// read-only, so any number of samplers can be used concurrently.
#[derive(Clone, Copy, Debug, Default)]
pub struct Ziggurat;

impl Ziggurat {
  pub fn new() -> Self {
    let _ = zig_tables();
    Self
  }
}

impl Distribution<f64> for Ziggurat {
  #[inline]
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
    let tables = zig_tables();
    let hz = rng.next_u32() as i32;
    let iz = (hz & 127) as usize;
    if (hz.unsigned_abs() as i64) < tables.kn[iz] {
      hz as f64 * tables.wn[iz]
    } else {
      nfix(hz, iz, tables, rng)
    }
  }
}

/// Standard normal quantile via the inverse error function,
/// `Φ⁻¹(u) = √2·erf⁻¹(2u − 1)`.
#[inline]
pub fn inverse_cdf(u: f64) -> f64 {
  std::f64::consts::SQRT_2 * erf_inv(2.0 * u - 1.0)
}
