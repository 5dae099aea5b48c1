use {
  crate::{
    error::{self, ConfigError},
    field::NoiseField,
    geometry::{Circle, Rectangle, RectangleExt, P2, V2},
    solver::{
      spatial_index::{Obstacle, SpatialIndex},
      stroke::{LengthMetric, Stroke, StrokeId},
    },
  },
  anyhow::Result,
  rand::Rng,
  serde::{Deserialize, Serialize},
};


/// A named style variation that fires with `probability`, only when `enabled`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
  pub enabled: bool,
  pub probability: f64,
}

impl Gate {
  pub const fn new(enabled: bool, probability: f64) -> Self {
    Self { enabled, probability }
  }

  /// The random draw always happens, so toggling `enabled` never shifts the stream.
  pub fn draw(&self, rng: &mut impl Rng) -> bool {
    let hit = rng.gen_bool(self.probability);
    self.enabled && hit
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
  /// Noise is sampled at `(x / zoom, y / zoom)`; larger is smoother.
  pub zoom: f64,
  /// Noise value to heading multiplier; larger is more chaotic.
  pub distort: f64,
  /// Base radii, one picked uniformly per stroke.
  pub radii: Vec<f64>,
  /// Clearance between a growing stroke and existing obstacles.
  pub padding: f64,
  /// Strokes not longer than this are rejected.
  pub min_length: f64,
  /// Growth stops once a stroke is this long.
  pub max_length: f64,
  /// Step size as a fraction of canvas width. A step moves `radius * step size`.
  pub step_fraction: f64,
  pub choppy_step_fraction: f64,
  /// Start region, as a scale of the canvas around its center.
  pub inner_scale: f64,
  pub overflow_scale: f64,
  /// Radius multiplier of heavy strokes.
  pub heavy_factor: f64,
  /// Rare strokes starting closer to the canvas edge.
  pub edge_overflow: Gate,
  /// Occasional thick strokes.
  pub heavy: Gate,
  /// Occasional strokes taking coarser, visible steps.
  pub choppy: Gate,
  pub length_metric: LengthMetric,
  /// Index cells along the longer canvas side.
  pub index_resolution: u32,
}

impl Default for GrowthParams {
  /// Tuned for an 8000 x 11200 canvas.
  fn default() -> Self {
    Self {
      zoom: 2500.0,
      distort: 2.5,
      radii: vec![40.0, 50.0, 60.0],
      padding: 50.0,
      min_length: 50.0,
      max_length: 5600.0,
      step_fraction: 1.0 / 10000.0,
      choppy_step_fraction: 1.0 / 5000.0,
      inner_scale: 0.8,
      overflow_scale: 0.95,
      heavy_factor: 4.0,
      edge_overflow: Gate::new(false, 0.005),
      heavy: Gate::new(true, 0.1),
      choppy: Gate::new(true, 0.1),
      length_metric: LengthMetric::default(),
      index_resolution: 15,
    }}}

impl GrowthParams {
  /// Rescale every length for a canvas `factor` times as wide, keeping the look.
  pub fn scaled(mut self, factor: f64) -> Self {
    self.zoom *= factor;
    self.radii.iter_mut().for_each(|r| *r *= factor);
    self.padding *= factor;
    self.min_length *= factor;
    self.max_length *= factor;
    // the step is width * fraction, and width is already scaled
    self.step_fraction /= factor;
    self.choppy_step_fraction /= factor;
    self
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.radii.is_empty() {
      return Err(ConfigError::EmptyRadiusSet);
    }
    for &radius in &self.radii {
      error::positive("stroke radius", radius)?;
    }
    error::positive("zoom", self.zoom)?;
    error::finite("distort", self.distort)?;
    error::non_negative("padding", self.padding)?;
    error::non_negative("min length", self.min_length)?;
    error::positive("max length", self.max_length)?;
    if self.min_length > self.max_length {
      return Err(ConfigError::Range { name: "stroke length", min: self.min_length, max: self.max_length });
    }
    error::positive("step fraction", self.step_fraction)?;
    error::positive("choppy step fraction", self.choppy_step_fraction)?;
    error::scale("inner scale", self.inner_scale)?;
    error::scale("overflow scale", self.overflow_scale)?;
    error::positive("heavy factor", self.heavy_factor)?;
    error::probability("edge overflow probability", self.edge_overflow.probability)?;
    error::probability("heavy probability", self.heavy.probability)?;
    error::probability("choppy probability", self.choppy.probability)?;
    error::positive("index resolution", self.index_resolution as f64)?;
    Ok(())
  }

  /// Widest stroke [`StrokeGrower::seed`] can draw.
  pub fn largest_radius(&self) -> f64 {
    let base = self.radii.iter().copied().fold(0.0, f64::max);
    if self.heavy.enabled { base * self.heavy_factor.max(1.0) } else { base }
  }
}

/// Which gates fired for a stroke.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Gates {
  pub long: bool,
  pub heavy: bool,
  pub choppy: bool,
}

/// Everything decided before a stroke starts growing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Seed {
  start: P2,
  radius: f64,
  step_size: f64,
  region: Rectangle,
  gates: Gates,
}

impl Seed {
  /// A stroke starting at `start`, moving `radius * step_size` per step, for as long as it
  /// stays inside `region`.
  pub fn new(start: P2, radius: f64, step_size: f64, region: Rectangle) -> Result<Self> {
    error::positive("stroke radius", radius)?;
    error::positive("step size", step_size)?;
    Ok(Self { start, radius, step_size, region, gates: Gates::default() })
  }

  pub fn start(&self) -> P2 { self.start }
  pub fn radius(&self) -> f64 { self.radius }
  pub fn step_size(&self) -> f64 { self.step_size }
  pub fn region(&self) -> Rectangle { self.region }
  pub fn gates(&self) -> Gates { self.gates }
  /// Distance covered by a single step.
  pub fn displacement(&self) -> f64 { self.radius * self.step_size }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
  Collision,
  OutOfBounds,
  MaxLength,
}

/// A grown stroke, not yet judged.
#[derive(Debug, Clone, PartialEq)]
pub struct Growth {
  pub stroke: Stroke,
  pub stop: StopReason,
  pub steps: usize,
  /// index size the stroke was grown against
  generation: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
  Accepted { stroke: Stroke, stop: StopReason },
  Rejected { stroke: Stroke, stop: StopReason },
}

impl Outcome {
  pub fn is_accepted(&self) -> bool {
    matches!(self, Outcome::Accepted { .. })
  }

  pub fn stroke(&self) -> &Stroke {
    match self {
      Outcome::Accepted { stroke, .. } | Outcome::Rejected { stroke, .. } => stroke
    }
  }

  pub fn stop(&self) -> StopReason {
    match self {
      Outcome::Accepted { stop, .. } | Outcome::Rejected { stop, .. } => *stop
    }
  }
}

/// Grows strokes one at a time against a shared [`SpatialIndex`].
///
/// [`StrokeGrower::grow`] only reads the index; [`StrokeGrower::commit`] is the single
/// place it is written.
#[derive(Debug, Clone)]
pub struct StrokeGrower<N> {
  canvas: Rectangle,
  params: GrowthParams,
  noise: N,
  index: SpatialIndex,
  next_id: StrokeId,
}

impl<N: NoiseField> StrokeGrower<N> {
  pub fn new(canvas: Rectangle, params: GrowthParams, noise: N) -> Result<Self> {
    params.validate()?;
    let index = SpatialIndex::with_resolution(canvas, params.index_resolution)?;
    Ok(Self { canvas, params, noise, index, next_id: 0 })
  }

  pub fn canvas(&self) -> Rectangle { self.canvas }
  pub fn params(&self) -> &GrowthParams { &self.params }
  pub fn noise(&self) -> &N { &self.noise }
  pub fn index(&self) -> &SpatialIndex { &self.index }
  pub fn into_index(self) -> SpatialIndex { self.index }

  /// Obstacles that every later stroke must keep clear of, e.g. a reserved area.
  pub fn add_obstacles(&mut self, obstacles: impl IntoIterator<Item = Obstacle>) {
    self.index.extend(obstacles);
  }

  /// Draw start point, radius, and step size of the next stroke.
  ///
  /// Draw order is fixed: long, heavy, radius, choppy, start point.
  pub fn seed(&self, rng: &mut impl Rng) -> Seed {
    let p = &self.params;
    let long = p.edge_overflow.draw(rng);
    let heavy = p.heavy.draw(rng);
    let base = p.radii[rng.gen_range(0..p.radii.len())];
    let choppy = p.choppy.draw(rng);

    let radius = if heavy { base * p.heavy_factor } else { base };
    let width = self.canvas.width();
    let step_size = if choppy { width * p.choppy_step_fraction } else { width * p.step_fraction };
    let region = self.canvas.scale_centered(if long { p.overflow_scale } else { p.inner_scale });

    Seed {
      start: region.random_point(rng),
      radius,
      step_size,
      region,
      gates: Gates { long, heavy, choppy },
    }
  }

  /// Grow a stroke from `seed` until it collides, leaves its region, or is long enough.
  /// The index is left untouched.
  pub fn grow(&self, seed: &Seed) -> Growth {
    let p = &self.params;
    let mut stroke = Stroke::new(self.next_id, seed.start, seed.radius, p.length_metric);
    let displacement = seed.displacement();
    let mut point = seed.start;
    let mut steps = 0;

    let stop = loop {
      if !seed.region.contains(point) { break StopReason::OutOfBounds; }
      if stroke.length() >= p.max_length { break StopReason::MaxLength; }

      let heading = self.noise.sample(point.x / p.zoom, point.y / p.zoom) * p.distort;
      point += V2::new(heading.cos(), heading.sin()) * displacement;
      steps += 1;

      if self.collides(point, seed.radius) { break StopReason::Collision; }
      stroke.push(Circle::new(point, seed.radius));
    };

    Growth { stroke, stop, steps, generation: self.index.len() }
  }

  /// Whether a point of `radius` at `point` is closer to any obstacle than
  /// `obstacle.radius / 2 + radius / 2 + padding`.
  pub fn collides(&self, point: P2, radius: f64) -> bool {
    let padding = self.params.padding;
    let reach = radius / 2.0 + self.index.max_radius() / 2.0 + padding;
    self.index.neighbors(Circle::new(point, reach))
      .any(|o| o.center.distance_to(point) < o.radius / 2.0 + radius / 2.0 + padding)
  }

  /// Accept a stroke longer than the minimum and insert all of its points into the index,
  /// or reject it and insert nothing.
  ///
  /// A growth made before another commit is first cut at its first point that collides
  /// with what has been committed since.
  pub fn commit(&mut self, growth: Growth) -> Outcome {
    let Growth { mut stroke, mut stop, generation, .. } = growth;

    if generation != self.index.len() {
      let first_collision = stroke.points().iter()
        .position(|p| self.collides(p.center, p.radius));
      if let Some(keep) = first_collision {
        stroke.truncate(keep);
        stop = StopReason::Collision;
      }
    }

    if stroke.length() > self.params.min_length {
      stroke.id = self.next_id;
      self.next_id += 1;
      let id = stroke.id;
      self.index.extend(stroke.points().iter().map(|p| Obstacle::new(*p, id)));
      Outcome::Accepted { stroke, stop }
    } else {
      Outcome::Rejected { stroke, stop }
    }
  }

  /// Seed, grow, and commit one stroke.
  pub fn attempt(&mut self, rng: &mut impl Rng) -> Outcome {
    let seed = self.seed(rng);
    let growth = self.grow(&seed);
    self.commit(growth)
  }
}
