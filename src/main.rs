//! Render flow-field pieces to SVG and PNG.
//!
//! Every piece is fully described by its seed; the effective config of each run is written
//! next to the images, and can be fed back with `--config`.

use {
  anyhow::{bail, Context, Result},
  clap::Parser,
  flow_filling::{
    composition::{generate, RunConfig, RunSummary, REFERENCE_WIDTH},
    drawing::Canvas,
    field::NoiseKind,
    profile,
    solver::{Gate, LengthMetric},
    svg::SvgDocument,
  },
  rayon::prelude::*,
  serde::Serialize,
  std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
  },
  tracing::{error, info, warn},
  tracing_subscriber::EnvFilter,
};

#[derive(Parser, Debug)]
#[command(name = "flow-filling", version)]
#[command(about = "Non-overlapping strokes grown along a noise field")]
struct Cli {
  /// First seed; defaults to the current time in milliseconds
  #[arg(long)]
  seed: Option<u64>,

  /// Number of pieces, seeds `seed..seed + count`, rendered in parallel
  #[arg(long, short = 'n', default_value_t = 1)]
  count: u64,

  /// Canvas width, 8000 by default; the height is 1.4 times as much
  #[arg(long)]
  width: Option<f64>,

  /// Number of stroke attempts
  #[arg(long)]
  density: Option<usize>,

  /// Color palette: orange_autumn, peaches_and_cream, spring_break or red_white_black
  #[arg(long)]
  palette: Option<String>,

  #[arg(long, value_enum)]
  noise: Option<NoiseKind>,

  /// Measure strokes over points taken two at a time
  #[arg(long)]
  paired_length: bool,

  /// Chance that a stroke is cut into pieces of different colors
  #[arg(long)]
  split_chance: Option<f64>,

  /// Leave a gap at every cut of a split stroke
  #[arg(long)]
  split_gap: bool,

  /// JSON run config, e.g. a manifest written by an earlier run
  #[arg(long)]
  config: Option<PathBuf>,

  /// Output directory
  #[arg(long, short, default_value = "output")]
  out: PathBuf,

  /// Width of the PNG preview in pixels
  #[arg(long, default_value_t = 2000)]
  png_width: u32,

  #[arg(long)]
  no_png: bool,

  #[arg(long)]
  no_svg: bool,

  /// Enable debug output
  #[arg(long, short)]
  verbose: bool,
}

/// Written as `<out>/forces-<seed>.json`.
#[derive(Serialize)]
struct Manifest<'a> {
  config: &'a RunConfig,
  summary: &'a RunSummary,
}

fn load_config(path: &Path) -> Result<RunConfig> {
  let file = File::open(path)
    .with_context(|| format!("unable to open {}", path.display()))?;
  let value: serde_json::Value = serde_json::from_reader(file)
    .with_context(|| format!("{} is not valid JSON", path.display()))?;
  // a manifest carries the config under "config"
  let config = match value.get("config") {
    Some(config) if value.get("summary").is_some() => config.clone(),
    _ => value
  };
  serde_json::from_value(config)
    .with_context(|| format!("{} is not a run config", path.display()))
}

fn run_config(cli: &Cli, base: Option<&RunConfig>, seed: u64) -> RunConfig {
  let mut config = match base {
    Some(base) => RunConfig { seed, ..base.clone() },
    None => RunConfig::from_seed(seed, cli.width.unwrap_or(REFERENCE_WIDTH))
  };
  if let Some(density) = cli.density { config.density = density; }
  if let Some(palette) = &cli.palette { config.palette = palette.clone(); }
  if let Some(noise) = cli.noise { config.noise = noise; }
  if cli.paired_length { config.growth.length_metric = LengthMetric::Paired; }
  if let Some(chance) = cli.split_chance { config.split.stroke = Gate::new(chance > 0.0, chance); }
  if cli.split_gap { config.split.gap = true; }
  config
}

fn render(cli: &Cli, config: &RunConfig) -> Result<RunSummary> {
  let comment = serde_json::to_string_pretty(config)?;
  let mut sinks = (
    (!cli.no_svg).then(|| SvgDocument::new().with_comment(comment)),
    (!cli.no_png).then(|| Canvas::new(cli.png_width)),
  );
  let summary = generate(config, &mut sinks)?;

  let stem = cli.out.join(format!("forces-{}", config.seed));
  if let Some(svg) = &sinks.0 {
    profile!("svg", svg.save(stem.with_extension("svg"))?);
  }
  if let Some(png) = &sinks.1 {
    profile!("png", png.save(stem.with_extension("png"))?);
  }

  let manifest = stem.with_extension("json");
  let file = File::create(&manifest)
    .with_context(|| format!("unable to create {}", manifest.display()))?;
  serde_json::to_writer_pretty(BufWriter::new(file), &Manifest { config, summary: &summary })?;
  info!("{}: {} strokes, written to {}", summary.label, summary.accepted, stem.display());
  Ok(summary)
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let filter = if cli.verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt().with_env_filter(filter).init();

  let base = cli.config.as_deref().map(load_config).transpose()?;
  if let (Some(width), Some(base)) = (cli.width, &base) {
    warn!("--width {width} is ignored, the config sets a {}x{} canvas", base.width, base.height);
  }
  let first = match (cli.seed, &base) {
    (Some(seed), _) => seed,
    (None, Some(base)) => base.seed,
    (None, None) => SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() as u64,
  };
  let configs = (0..cli.count)
    .map(|i| run_config(&cli, base.as_ref(), first.wrapping_add(i)))
    .collect::<Vec<_>>();
  for config in &configs {
    config.validate()
      .with_context(|| format!("invalid config for seed {}", config.seed))?;
  }

  fs::create_dir_all(&cli.out)
    .with_context(|| format!("unable to create {}", cli.out.display()))?;
  info!("rendering {} piece(s) from seed {first} into {}", configs.len(), cli.out.display());

  let failed = configs.par_iter()
    .map(|config| render(&cli, config).map_err(|e| error!("seed {}: {e:#}", config.seed)))
    .filter(Result::is_err)
    .count();

  if failed > 0 {
    bail!("{failed} of {} runs failed", configs.len());
  }
  Ok(())
}

#[cfg(test)] mod tests {
  use super::*;

  fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("flow-filling").chain(args.iter().copied()))
  }

  #[test] fn manifest_round_trip() -> Result<()> {
    let config = RunConfig { density: 40, ..RunConfig::from_seed(17, 300.0) };
    let summary = generate(&config, &mut None::<SvgDocument>)?;
    let dir = std::env::temp_dir();

    let manifest = dir.join("flow_filling_manifest.json");
    serde_json::to_writer(File::create(&manifest)?, &Manifest { config: &config, summary: &summary })?;
    assert_eq!(load_config(&manifest)?, config);

    let plain = dir.join("flow_filling_config.json");
    serde_json::to_writer(File::create(&plain)?, &config)?;
    assert_eq!(load_config(&plain)?, config);

    let broken = dir.join("flow_filling_broken.json");
    fs::write(&broken, "{ \"density\": ")?;
    assert!(load_config(&broken).is_err());
    Ok(())
  }

  #[test] fn overrides() {
    let args = cli(&["--density", "12", "--palette", "spring_break", "--paired-length", "--split-chance", "0.3"]);
    let config = run_config(&args, None, 4);
    assert_eq!(config.seed, 4);
    assert_eq!(config.width, REFERENCE_WIDTH);
    assert_eq!(config.density, 12);
    assert_eq!(config.palette, "spring_break");
    assert_eq!(config.growth.length_metric, LengthMetric::Paired);
    assert_eq!(config.split.stroke, Gate::new(true, 0.3));
    assert!(!config.split.gap);

    // a loaded config keeps its canvas and only takes the new seed
    let base = RunConfig::from_seed(1, 500.0);
    let config = run_config(&cli(&["--width", "900"]), Some(&base), 2);
    assert_eq!(config.seed, 2);
    assert_eq!(config.width, 500.0);
    assert_eq!(config.growth, base.growth);
  }
}
