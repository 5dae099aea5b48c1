//! This is a library for flow-field line art in ℝ².
//!
//! Thousands of strokes are grown step by step along the direction field of a 2D noise
//! function. Every stroke keeps a configurable clearance from every stroke accepted before
//! it, so the final picture is a dense packing of curves that never touch.
//!
//! It is split into a core and its collaborators:
//! - [`solver`] holds the core: a uniform-grid [`SpatialIndex`](solver::SpatialIndex) of
//!   circular obstacles and the [`StrokeGrower`](solver::StrokeGrower) that consumes it.
//! - [`field`] provides the noise the strokes follow, [`palette`] the colors.
//! - [`composition`] drives one full run and forwards accepted strokes to a
//!   [`StrokeSink`](composition::StrokeSink): [`svg::SvgDocument`], or
//!   `drawing::Canvas` (requires `drawing` feature).
//!
//! # Basic usage
//! ```no_run
//! # use flow_filling::{
//! #   composition::{RunConfig, generate},
//! #   svg::SvgDocument,
//! #   error::Result
//! # };
//! # fn main() -> Result<()> {
//! // Randomize the run parameters from a seed, for a 2000px wide canvas.
//! let config = RunConfig::from_seed(42, 2000.0);
//!
//! // Any `StrokeSink` can receive the strokes; here a vector document.
//! let mut svg = SvgDocument::new();
//! let summary = generate(&config, &mut svg)?;
//! println!("{} of {} strokes accepted", summary.accepted, summary.attempts);
//!
//! svg.save("forces.svg")?;
//! #   Ok(())
//! # }
//! ```
//!
//! # Growing strokes by hand
//! The driver is a thin loop; the core can be used directly, with any noise function:
//! ```
//! # use flow_filling::{
//! #   geometry::{Rectangle, P2},
//! #   solver::{GrowthParams, StrokeGrower, Outcome},
//! #   error::Result
//! # };
//! # use rand::SeedableRng;
//! # fn main() -> Result<()> {
//! let canvas = Rectangle::new(P2::new(0.0, 0.0), P2::new(1000.0, 1400.0));
//! let params = GrowthParams::default().scaled(1000.0 / 8000.0);
//! let noise = |x: f64, y: f64| (x * 3.0).sin() * (y * 2.0).cos();
//! let mut grower = StrokeGrower::new(canvas, params, noise)?;
//! let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
//!
//! for _ in 0..100 {
//!   if let Outcome::Accepted { stroke, .. } = grower.attempt(&mut rng) {
//!     assert!(stroke.len() > 0);
//!   }
//! }
//! #   Ok(())
//! # }
//! ```
//!
//! # On ordering
//! Strokes must be grown one at a time: the next stroke has to see every point committed
//! by the previous one. [`StrokeGrower::grow`](solver::StrokeGrower::grow) borrows the
//! grower immutably and [`StrokeGrower::commit`](solver::StrokeGrower::commit) mutably;
//! a growth that was made before some other commit is checked again against the index
//! before it is accepted. Parallelism is only ever applied across independent runs, see
//! `src/main.rs`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(rustdoc::private_intra_doc_links)]

pub mod error;
pub mod geometry;
pub mod field;
pub mod solver;
pub mod palette;
pub mod composition;
pub mod svg;
#[cfg(feature = "drawing")]
#[cfg_attr(docsrs, doc(cfg(feature = "drawing")))]
pub mod drawing;

#[doc(hidden)]
pub use tracing;

/// Time a statement, and report it as a `debug` event.
#[macro_export]
macro_rules! profile(
  ($title: literal, $stmt: stmt) => {{
    let t0 = std::time::Instant::now();
    $stmt;
    $crate::tracing::debug!("{} profile: {}ms", $title, t0.elapsed().as_millis());
  }}
);
