//! One full run: seeded randomness in, colored strokes out.

use {
  crate::{
    error::{self, ConfigError},
    field::{noise_seed, FlowNoise, NoiseKind},
    geometry::{canvas, Rectangle},
    palette::{Color, ColorRegions, Palette},
    solver::{Gate, GrowthParams, Outcome, SpatialIndex, StopReason, Stroke, StrokeGrower},
  },
  anyhow::{Context, Result},
  rand::prelude::*,
  serde::{Deserialize, Serialize},
  std::time::Instant,
  tracing::{debug, info, trace},
};

/// Canvas width [`GrowthParams::default`] is tuned for.
pub const REFERENCE_WIDTH: f64 = 8000.0;
/// Height over width.
pub const ASPECT_RATIO: f64 = 1.4;

/// Receives accepted strokes in acceptance order.
pub trait StrokeSink {
  fn begin(&mut self, _canvas: Rectangle, _background: Color) -> Result<()> { Ok(()) }
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()>;
  fn finish(&mut self, _label: &str) -> Result<()> { Ok(()) }
}

impl StrokeSink for Vec<(Stroke, Color)> {
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> {
    self.push((stroke.clone(), color));
    Ok(())
  }
}

impl<S: StrokeSink + ?Sized> StrokeSink for &mut S {
  fn begin(&mut self, canvas: Rectangle, background: Color) -> Result<()> { (**self).begin(canvas, background) }
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> { (**self).stroke(stroke, color) }
  fn finish(&mut self, label: &str) -> Result<()> { (**self).finish(label) }
}

/// A disabled sink.
impl<S: StrokeSink> StrokeSink for Option<S> {
  fn begin(&mut self, canvas: Rectangle, background: Color) -> Result<()> {
    self.as_mut().map_or(Ok(()), |sink| sink.begin(canvas, background))
  }
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> {
    self.as_mut().map_or(Ok(()), |sink| sink.stroke(stroke, color))
  }
  fn finish(&mut self, label: &str) -> Result<()> {
    self.as_mut().map_or(Ok(()), |sink| sink.finish(label))
  }
}

/// Forwards everything to both sinks, `A` first.
impl<A: StrokeSink, B: StrokeSink> StrokeSink for (A, B) {
  fn begin(&mut self, canvas: Rectangle, background: Color) -> Result<()> {
    self.0.begin(canvas, background)?;
    self.1.begin(canvas, background)
  }
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> {
    self.0.stroke(stroke, color)?;
    self.1.stroke(stroke, color)
  }
  fn finish(&mut self, label: &str) -> Result<()> {
    self.0.finish(label)?;
    self.1.finish(label)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
  pub seed: u64,
  pub width: f64,
  pub height: f64,
  /// Number of stroke attempts.
  pub density: usize,
  pub palette: String,
  /// Canvas color. The palette's own background when unset.
  pub background: Option<Color>,
  pub noise: NoiseKind,
  /// Number of color regions.
  pub regions: usize,
  pub growth: GrowthParams,
  pub split: SplitParams,
}

/// Accepted strokes cut into pieces of different palette colors.
///
/// Cuts come from a random stream of their own, so splitting never moves a stroke.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitParams {
  /// Whether an accepted stroke is split at all.
  pub stroke: Gate,
  /// Chance of a cut at each inner point of a split stroke.
  pub cut_probability: f64,
  /// Leave out the segment at every cut.
  pub gap: bool,
}

impl Default for SplitParams {
  fn default() -> Self {
    Self {
      stroke: Gate::new(false, 0.0),
      cut_probability: 0.2,
      gap: false,
    }}}

/// Cut `stroke` at inner points, each with probability `cut`. Neighboring pieces share the
/// point at their cut unless `gap` is set, in which case the segment between them is dropped.
///
/// One draw per inner point, whether or not it cuts.
pub fn split_stroke(stroke: &Stroke, cut: f64, gap: bool, rng: &mut impl Rng) -> Vec<Stroke> {
  let points = stroke.points();
  let piece = |from: usize, to: usize| {
    let start = if from == 0 { stroke.start } else { points[from].center };
    let mut piece = Stroke::new(stroke.id, start, stroke.radius, stroke.metric());
    points[from..to].iter().for_each(|&p| piece.push(p));
    piece
  };
  let mut pieces = vec![];
  let mut from = 0;
  for i in 1..points.len().saturating_sub(1) {
    if rng.gen_bool(cut) {
      pieces.push(piece(from, i + 1));
      from = if gap { i + 1 } else { i };
    }
  }
  if from < points.len() {
    pieces.push(piece(from, points.len()));
  }
  pieces
}

impl Default for RunConfig {
  fn default() -> Self {
    Self {
      seed: 0,
      width: REFERENCE_WIDTH,
      height: REFERENCE_WIDTH * ASPECT_RATIO,
      density: 3000,
      palette: Palette::NAMES[0].to_string(),
      background: None,
      noise: NoiseKind::default(),
      regions: 10,
      growth: GrowthParams::default(),
      split: SplitParams::default(),
    }}}

impl RunConfig {
  /// Randomize a run from `seed`, for a canvas `width` wide.
  ///
  /// Draws, in order: zoom, distortion, whether edge overflow, heavy and choppy strokes
  /// are allowed at all, and the palette.
  pub fn from_seed(seed: u64, width: f64) -> Self {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    let defaults = GrowthParams::default();

    let zoom = rng.gen_range(1800..3200) as f64;
    let distort = rng.gen_range(1.5..4.2);
    let edge_overflow = rng.gen_bool(0.25);
    let heavy = rng.gen_bool(0.8);
    let choppy = rng.gen_bool(0.8);
    let palette = Palette::random_name(&mut rng).to_string();

    let growth = GrowthParams {
      zoom,
      distort,
      max_length: REFERENCE_WIDTH * ASPECT_RATIO / 2.0,
      edge_overflow: Gate { enabled: edge_overflow, ..defaults.edge_overflow },
      heavy: Gate { enabled: heavy, ..defaults.heavy },
      choppy: Gate { enabled: choppy, ..defaults.choppy },
      ..defaults
    };

    Self {
      seed,
      width,
      height: width * ASPECT_RATIO,
      palette,
      background: Some(Color::hsl(35.0, 0.13, 0.92)),
      growth: growth.scaled(width / REFERENCE_WIDTH),
      ..Self::default()
    }
  }

  pub fn canvas(&self) -> Rectangle { canvas(self.width, self.height) }

  pub fn label(&self) -> String { format!("Forces-{}", self.seed) }

  pub fn validate(&self) -> Result<(), ConfigError> {
    error::positive("canvas width", self.width)?;
    error::positive("canvas height", self.height)?;
    Palette::named(&self.palette)?;
    self.growth.validate()?;
    error::probability("split probability", self.split.stroke.probability)?;
    error::probability("cut probability", self.split.cut_probability)?;

    // a probe must never reach past the neighboring ring of cells
    let cell_size = self.width.max(self.height) / self.growth.index_resolution as f64;
    let reach = self.growth.largest_radius() + self.growth.padding;
    if cell_size < reach {
      return Err(ConfigError::FineIndex { cell_size, reach });
    }
    Ok(())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
  pub label: String,
  pub seed: u64,
  pub palette: String,
  pub attempts: usize,
  pub accepted: usize,
  pub rejected_collision: usize,
  pub rejected_out_of_bounds: usize,
  pub rejected_max_length: usize,
  /// Accepted strokes handed to the sinks in pieces.
  pub split: usize,
  pub obstacles: usize,
  pub elapsed_ms: u64,
}

impl RunSummary {
  pub fn rejected(&self) -> usize {
    self.rejected_collision + self.rejected_out_of_bounds + self.rejected_max_length
  }
}

/// The driver of one run. Owns the random source, the color regions, and the grower.
#[derive(Debug)]
pub struct Composition {
  config: RunConfig,
  background: Color,
  palette: Palette,
  regions: ColorRegions,
  rng: rand_pcg::Pcg64,
  split_rng: rand_pcg::Pcg64,
  grower: StrokeGrower<FlowNoise>,
  begun: bool,
}

/// Keeps split decisions off the stream strokes are grown from.
const SPLIT_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

impl Composition {
  pub fn new(config: &RunConfig) -> Result<Self> {
    config.validate()?;
    let palette = Palette::named(&config.palette)?;
    let bounds = config.canvas();
    let mut rng = rand_pcg::Pcg64::seed_from_u64(config.seed);
    let regions = ColorRegions::random(bounds, &palette, config.regions, &mut rng);
    let noise = FlowNoise::new(config.noise, noise_seed(config.seed));
    let grower = StrokeGrower::new(bounds, config.growth.clone(), noise)
      .context("unable to set up stroke growth")?;

    Ok(Self {
      config: config.clone(),
      background: config.background.unwrap_or_else(|| palette.background()),
      palette,
      regions,
      rng,
      split_rng: rand_pcg::Pcg64::seed_from_u64(config.seed ^ SPLIT_STREAM),
      grower,
      begun: false,
    })
  }

  pub fn config(&self) -> &RunConfig { &self.config }
  pub fn regions(&self) -> &ColorRegions { &self.regions }
  pub fn index(&self) -> &SpatialIndex { self.grower.index() }

  /// Attempt `density` strokes one after another, forwarding every accepted stroke with
  /// its color to `sink`.
  ///
  /// Only the first call sends [`StrokeSink::begin`]. Calling it again adds another
  /// `density` attempts to the same sink, around the strokes already laid down.
  pub fn run<S: StrokeSink + ?Sized>(&mut self, sink: &mut S) -> Result<RunSummary> {
    let t0 = Instant::now();
    let config = &self.config;
    let label = config.label();
    info!(
      seed = config.seed,
      width = config.width,
      height = config.height,
      zoom = config.growth.zoom,
      distort = config.growth.distort,
      edge_overflow = config.growth.edge_overflow.enabled,
      heavy = config.growth.heavy.enabled,
      choppy = config.growth.choppy.enabled,
      palette = %config.palette,
      density = config.density,
      "{label} started"
    );

    let mut summary = RunSummary {
      label: label.clone(),
      seed: config.seed,
      palette: config.palette.clone(),
      attempts: 0,
      accepted: 0,
      rejected_collision: 0,
      rejected_out_of_bounds: 0,
      rejected_max_length: 0,
      split: 0,
      obstacles: 0,
      elapsed_ms: 0,
    };
    let density = config.density;
    let progress_step = (density / 10).max(1);

    if !self.begun {
      sink.begin(self.grower.canvas(), self.background)?;
      self.begun = true;
    }
    let split = config.split;

    for attempt in 0..density {
      let outcome = self.grower.attempt(&mut self.rng);
      summary.attempts += 1;
      match &outcome {
        Outcome::Accepted { stroke, stop } => {
          let color = self.regions.color_at(stroke.start);
          trace!(id = stroke.id, points = stroke.len(), length = stroke.length(), ?stop, %color, "accepted");
          if split.stroke.draw(&mut self.split_rng) {
            let pieces = split_stroke(stroke, split.cut_probability, split.gap, &mut self.split_rng);
            for piece in &pieces {
              sink.stroke(piece, self.palette.pick(&mut self.split_rng))
                .with_context(|| format!("sink failed on stroke {}", stroke.id))?;
            }
            trace!(id = stroke.id, pieces = pieces.len(), "split");
            summary.split += 1;
          } else {
            sink.stroke(stroke, color)
              .with_context(|| format!("sink failed on stroke {}", stroke.id))?;
          }
          summary.accepted += 1;
        }
        Outcome::Rejected { stroke, stop } => {
          trace!(points = stroke.len(), length = stroke.length(), ?stop, "rejected");
          match stop {
            StopReason::Collision => summary.rejected_collision += 1,
            StopReason::OutOfBounds => summary.rejected_out_of_bounds += 1,
            StopReason::MaxLength => summary.rejected_max_length += 1,
          }
        }
      }
      if (attempt + 1) % progress_step == 0 {
        debug!("{label}: {}/{density} attempts, {} accepted", attempt + 1, summary.accepted);
      }
    }

    sink.finish(&label)?;

    summary.obstacles = self.grower.index().len();
    summary.elapsed_ms = t0.elapsed().as_millis() as u64;
    debug!("{label} index: {}", self.grower.index().stats());
    info!(
      accepted = summary.accepted,
      rejected = summary.rejected(),
      obstacles = summary.obstacles,
      "{label} finished in {}ms", summary.elapsed_ms
    );
    Ok(summary)
  }
}

/// Build a [`Composition`] from `config` and run it into `sink`.
pub fn generate<S: StrokeSink + ?Sized>(config: &RunConfig, sink: &mut S) -> Result<RunSummary> {
  Composition::new(config)?.run(sink)
}
