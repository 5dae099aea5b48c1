use {
  flow_filling::{
    composition::{generate, RunConfig},
    drawing::Canvas,
    error::Result,
    svg::SvgDocument,
  },
};

/// One piece from seed 7, 2000 units wide, written as both SVG and PNG.
fn main() -> Result<()> {
  let config = RunConfig::from_seed(7, 2000.0);
  let mut sinks = (SvgDocument::new(), Canvas::new(1000));
  let summary = generate(&config, &mut sinks)?;
  println!("{} of {} strokes accepted", summary.accepted, summary.attempts);

  sinks.0.save("out.svg")?;
  sinks.1.save("out.png")?;
  open::that("out.png")?;
  Ok(())
}
