//! Simulates GBM with the exact, Milstein and Euler–Maruyama schemes on one
//! shared Gaussian stream and writes terminal density histograms to disk.
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::ValueEnum;
use ndarray::ArrayView1;
use stochastic_schemes::stats::empirical::log_returns;
use stochastic_schemes::stats::empirical::DensityHistogram;
use stochastic_schemes::stats::empirical::Moments;
use stochastic_schemes::stochastic;
use stochastic_schemes::stochastic::Parameters;
use stochastic_schemes::stochastic::Scheme;
use stochastic_schemes::stochastic::Simulation;
use stochastic_schemes::variates::Engine;
use stochastic_schemes::variates::GaussianRns;
use stochastic_schemes::variates::VariateSource;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineArg {
  MersenneTwister,
  LaggedFibonacci,
  Sobol,
}

impl From<EngineArg> for Engine {
  fn from(arg: EngineArg) -> Self {
    match arg {
      EngineArg::MersenneTwister => Engine::MersenneTwister,
      EngineArg::LaggedFibonacci => Engine::LaggedFibonacci,
      EngineArg::Sobol => Engine::Sobol,
    }
  }
}

/// GBM discretization scheme comparison
#[derive(Debug, Parser)]
#[command(name = "stochastic-schemes")]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Start time
  #[arg(long, default_value_t = stochastic::T0, allow_negative_numbers = true)]
  t0: f64,

  /// Maturity
  #[arg(long, default_value_t = stochastic::T)]
  maturity: f64,

  /// Initial price
  #[arg(long, default_value_t = stochastic::S0)]
  s0: f64,

  /// Volatility
  #[arg(long, default_value_t = stochastic::SIGMA)]
  sigma: f64,

  /// Drift
  #[arg(long, default_value_t = stochastic::MU, allow_negative_numbers = true)]
  mu: f64,

  /// Number of simulated paths
  #[arg(long, default_value_t = stochastic::NUM_PATHS)]
  paths: usize,

  /// Number of time steps
  #[arg(long, default_value_t = stochastic::NUM_STEPS)]
  steps: usize,

  /// Histogram bins
  #[arg(long, default_value_t = 10)]
  bins: usize,

  /// Gaussian variate engine
  #[arg(long, value_enum, default_value_t = EngineArg::MersenneTwister)]
  engine: EngineArg,

  /// Fixed seed; operating system entropy when omitted
  #[arg(long)]
  seed: Option<u64>,

  /// Directory receiving the histogram files
  #[arg(long, default_value = ".")]
  output_dir: PathBuf,
}

fn histogram_file_name(scheme: Scheme, maturity: f64, steps: usize) -> String {
  format!("{}_time_{}_timesteps_{}.txt", scheme.tag(), maturity, steps)
}

fn log_returns_file_name(maturity: f64, steps: usize) -> String {
  format!(
    "{}_time_{}_log_rets_at_timestep{}.txt",
    Scheme::Exact.tag(),
    maturity,
    steps
  )
}

fn write_histogram(values: ArrayView1<'_, f64>, bins: usize, path: &Path) -> Result<()> {
  let histogram = DensityHistogram::from_values(values, bins)
    .with_context(|| format!("failed to bin values for {}", path.display()))?;
  histogram
    .write_to_file(path)
    .with_context(|| format!("failed to write {}", path.display()))?;
  info!(path = %path.display(), bins = histogram.len(), "histogram written");
  Ok(())
}

fn run(args: Args) -> Result<()> {
  let params = Parameters::new(args.t0, args.maturity, args.s0, args.sigma, args.mu);
  params.validate().context("invalid model parameters")?;

  let engine = Engine::from(args.engine);
  let n = args
    .paths
    .checked_mul(args.steps)
    .context("paths × steps overflows")?;
  let mut rns = match args.seed {
    Some(seed) => GaussianRns::with_seed(engine, n, seed),
    None => GaussianRns::new(engine, n),
  }
  .with_context(|| format!("failed to build {n} {engine} variates"))?;

  info!(
    engine = %rns.engine(),
    paths = args.paths,
    steps = args.steps,
    seed = rns.seed(),
    "simulating"
  );

  let mut simulations = Vec::with_capacity(Scheme::ALL.len());
  for scheme in [Scheme::Exact, Scheme::Milstein, Scheme::EulerMaruyama] {
    rns.reset_to_start();
    let sim = Simulation::new(scheme, params, args.paths, args.steps, &mut rns)
      .with_context(|| format!("{scheme} simulation failed"))?;
    simulations.push(sim);
  }

  std::fs::create_dir_all(&args.output_dir)
    .with_context(|| format!("failed to create {}", args.output_dir.display()))?;

  info!(
    mean = params.terminal_mean(),
    variance = params.terminal_variance(),
    "analytical terminal moments"
  );

  for sim in &simulations {
    let path = args
      .output_dir
      .join(histogram_file_name(sim.scheme(), args.maturity, args.steps));
    write_histogram(sim.final_row(), args.bins, &path)?;

    let m = Moments::of(sim.final_row())?;
    info!(
      scheme = %sim.scheme(),
      time = sim.time_at(sim.num_steps()),
      mean = m.mean,
      variance = m.variance,
      "terminal moments"
    );
  }

  if let Some(exact) = simulations.iter().find(|s| s.scheme() == Scheme::Exact) {
    let initial = exact.row(0)?;
    let rets = log_returns(exact.final_row(), initial)?;

    let path = args
      .output_dir
      .join(log_returns_file_name(args.maturity, args.steps));
    write_histogram(rets.view(), args.bins, &path)?;

    let m = Moments::of(rets.view())?;
    let tau = params.horizon();
    info!(
      mean = m.mean,
      variance = m.variance,
      analytical_mean = (params.mu - 0.5 * params.sigma.powi(2)) * tau,
      analytical_variance = params.sigma.powi(2) * tau,
      "exact log-return moments"
    );
  }

  Ok(())
}

fn main() -> Result<()> {
  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer())
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    )
    .init();

  run(Args::parse())
}
