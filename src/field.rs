//! Scalar noise fields steering stroke direction.

use {
  noise::{NoiseFn, OpenSimplex, Perlin, SuperSimplex},
  serde::{Deserialize, Serialize},
  std::fmt::{Debug, Formatter},
};

/// A total, side-effect-free 2D scalar function, conventionally in `[-1, 1]`.
pub trait NoiseField {
  fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseField for F where F: Fn(f64, f64) -> f64 {
  fn sample(&self, x: f64, y: f64) -> f64 { self(x, y) }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum NoiseKind {
  #[default]
  OpenSimplex,
  SuperSimplex,
  Perlin,
}

#[derive(Clone)]
enum Source {
  OpenSimplex(OpenSimplex),
  SuperSimplex(SuperSimplex),
  Perlin(Perlin),
}

/// Seeded gradient noise.
#[derive(Clone)]
pub struct FlowNoise {
  kind: NoiseKind,
  seed: u32,
  source: Source,
}

impl FlowNoise {
  pub fn new(kind: NoiseKind, seed: u32) -> Self {
    let source = match kind {
      NoiseKind::OpenSimplex => Source::OpenSimplex(OpenSimplex::new(seed)),
      NoiseKind::SuperSimplex => Source::SuperSimplex(SuperSimplex::new(seed)),
      NoiseKind::Perlin => Source::Perlin(Perlin::new(seed)),
    };
    Self { kind, seed, source }
  }

  pub fn kind(&self) -> NoiseKind { self.kind }
  pub fn seed(&self) -> u32 { self.seed }
}

impl Debug for FlowNoise {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FlowNoise")
      .field("kind", &self.kind)
      .field("seed", &self.seed)
      .finish()
  }
}

impl NoiseField for FlowNoise {
  fn sample(&self, x: f64, y: f64) -> f64 {
    match &self.source {
      Source::OpenSimplex(n) => n.get([x, y]),
      Source::SuperSimplex(n) => n.get([x, y]),
      Source::Perlin(n) => n.get([x, y]),
    }
  }
}

/// Fold a 64 bit run seed into the 32 bit seed the noise generators take.
pub fn noise_seed(run_seed: u64) -> u32 {
  (run_seed ^ (run_seed >> 32)) as u32
}
