use {
  flow_filling::{
    composition::{Composition, RunConfig},
    drawing::Canvas,
    error::Result,
  },
};

/// Every obstacle the spatial index holds after a run, colored by the stroke it belongs
/// to, over the strokes themselves.
fn main() -> Result<()> {
  let path = "out.png";
  let config = RunConfig { density: 800, ..RunConfig::from_seed(3, 1200.0) };
  let mut composition = Composition::new(&config)?;
  let mut canvas = Canvas::new(1200);
  let summary = composition.run(&mut canvas)?;

  canvas.draw_index(composition.index(), 160);
  println!("{}", composition.index().stats());
  println!("{summary:?}");

  canvas.save(path)?;
  open::that(path)?;
  Ok(())
}
