use {
  super::*,
  crate::{
    composition::{generate, Composition, RunConfig},
    geometry::canvas,
    solver::{LengthMetric, Obstacle},
    svg::SvgDocument,
  },
  image::GenericImageView,
};

const WHITE: Color = Color::rgb(255, 255, 255);
const BLACK: Color = Color::rgb(0, 0, 0);

fn horizontal(y: f64, radius: f64) -> Stroke {
  let mut stroke = Stroke::new(0, P2::new(100.0, y), radius, LengthMetric::Consecutive);
  for x in (100..=900).step_by(50) {
    stroke.push(Circle::new(P2::new(x as f64, y), radius));
  }
  stroke
}

#[test] fn begin_sizes_image() -> Result<()> {
  let mut canvas_sink = Canvas::new(100);
  canvas_sink.begin(canvas(1000.0, 1400.0), WHITE)?;
  assert_eq!(canvas_sink.image().dimensions(), (100, 140));
  assert!(canvas_sink.image().pixels().all(|p| p.0 == WHITE.0));
  assert_eq!(canvas_sink.to_pixels(P2::new(500.0, 700.0)), Px::new(50.0, 70.0));
  Ok(())
}

#[test] fn stroke_coverage() -> Result<()> {
  let mut sink = Canvas::new(100);
  sink.begin(canvas(1000.0, 1400.0), WHITE)?;
  // 4 pixels wide, centered on pixel row 50
  sink.stroke(&horizontal(505.0, 40.0), BLACK)?;
  let image = sink.image();

  assert_eq!(image.get_pixel(50, 50).0, BLACK.0);
  assert_eq!(image.get_pixel(50, 49).0, BLACK.0);
  // the row centered exactly on the edge is half covered
  let edge = image.get_pixel(50, 52).0;
  assert!(edge[0] > 64 && edge[0] < 192, "{edge:?}");
  assert_eq!(image.get_pixel(50, 54).0, WHITE.0);
  assert_eq!(image.get_pixel(50, 10).0, WHITE.0);
  // round caps reach past the last point by the half width only
  assert_eq!(image.get_pixel(5, 50).0, WHITE.0);
  Ok(())
}

#[test] fn overlapping_segments_blend_once() -> Result<()> {
  let mut sink = Canvas::new(100);
  sink.begin(canvas(1000.0, 1000.0), WHITE)?;
  let mut stroke = Stroke::new(0, P2::new(500.0, 505.0), 40.0, LengthMetric::Consecutive);
  // three points on top of each other
  for _ in 0..3 {
    stroke.push(Circle::new(P2::new(500.0, 505.0), 40.0));
  }
  sink.stroke(&stroke, BLACK)?;

  let mut reference = Canvas::new(100);
  reference.begin(canvas(1000.0, 1000.0), WHITE)?;
  reference.draw_circle(Circle::new(P2::new(500.0, 505.0), 20.0), BLACK);
  // same partial coverage at the edge
  assert_eq!(sink.image().get_pixel(50, 52), reference.image().get_pixel(50, 52));
  assert_ne!(sink.image().get_pixel(50, 52).0, BLACK.0);
  Ok(())
}

#[test] fn off_canvas_is_clipped() -> Result<()> {
  let mut sink = Canvas::new(64);
  sink.begin(canvas(64.0, 64.0), WHITE)?;
  sink.draw_circle(Circle::new(P2::new(-1000.0, -1000.0), 5.0), BLACK);
  sink.draw_circle(Circle::new(P2::new(0.0, 0.0), 5.0), BLACK);
  assert_eq!(sink.image().get_pixel(0, 0).0, BLACK.0);
  assert_eq!(sink.image().get_pixel(63, 63).0, WHITE.0);
  let empty = Stroke::new(0, P2::origin(), 1.0, LengthMetric::Consecutive);
  sink.stroke(&empty, BLACK)?;
  Ok(())
}

#[test] fn draw_index_colors_by_stroke() -> Result<()> {
  let mut index = SpatialIndex::new(canvas(100.0, 100.0), 10.0)?;
  index.extend([
    Obstacle::new(Circle::new(P2::new(25.0, 50.0), 20.0), 0),
    Obstacle::new(Circle::new(P2::new(75.0, 50.0), 20.0), 1),
  ]);
  let mut sink = Canvas::new(100);
  sink.begin(index.bounds(), WHITE)?;
  sink.draw_index(&index, 255);
  let (a, b) = (sink.image().get_pixel(25, 50), sink.image().get_pixel(75, 50));
  assert_ne!(a.0, WHITE.0);
  assert_ne!(a, b);
  Ok(())
}

#[test] fn full_run() -> Result<()> {
  let config = RunConfig { density: 200, ..RunConfig::from_seed(21, 400.0) };
  let mut sink = Canvas::new(400);
  let summary = generate(&config, &mut sink)?;
  assert!(summary.accepted > 0);
  let background = Rgba(config.background.unwrap_or(WHITE).0);
  let painted = sink.image().pixels().filter(|p| **p != background).count();
  assert!(painted > 0);

  let path = std::env::temp_dir().join("flow_filling_full_run.png");
  sink.save(&path)?;
  assert_eq!(image::open(&path)?.dimensions().0, 400);
  Ok(())
}

#[test] fn second_run_paints_over_first() -> Result<()> {
  let config = RunConfig { density: 150, ..RunConfig::from_seed(13, 400.0) };
  let background = Rgba(config.background.unwrap_or(WHITE).0);
  let mut composition = Composition::new(&config)?;
  let mut sinks = (SvgDocument::new(), Canvas::new(200));

  let first = composition.run(&mut sinks)?;
  let before = sinks.1.image().clone();
  let second = composition.run(&mut sinks)?;
  assert!(first.accepted > 0);

  assert_eq!(sinks.0.len(), first.accepted + second.accepted);
  // strokes from the first run are still there
  let kept = before.pixels()
    .zip(sinks.1.image().pixels())
    .filter(|(a, _)| **a != background)
    .all(|(_, b)| *b != background);
  assert!(kept);
  Ok(())
}

#[test] fn long_diagonal_stroke() -> Result<()> {
  let mut sink = Canvas::new(200);
  sink.begin(canvas(1000.0, 1000.0), WHITE)?;
  let mut stroke = Stroke::new(0, P2::new(0.0, 0.0), 20.0, LengthMetric::Consecutive);
  for i in 0..=100 {
    stroke.push(Circle::new(P2::new(i as f64 * 10.0, i as f64 * 10.0), 20.0));
  }
  sink.stroke(&stroke, BLACK)?;
  let image = sink.image();
  for i in (5..195).step_by(10) {
    assert_eq!(image.get_pixel(i, i).0, BLACK.0);
  }
  assert_eq!(image.get_pixel(150, 50).0, WHITE.0);
  assert_eq!(image.get_pixel(20, 180).0, WHITE.0);
  Ok(())
}
