#![allow(non_snake_case)]
use {
  super::{pixel_bounds, Draw, Polyline, Px, Texture},
  image::{Pixel, Rgba, RgbaImage},
};

impl Draw<RgbaImage> for Texture<Polyline, Rgba<u8>> {
  fn draw(&self, image: &mut RgbaImage) {
    let bounding_box = match self.shape.bounding_box().and_then(|b| pixel_bounds(b, image)) {
      Some(x) => x,
      None => return // bounding box has no intersection with the image at all
    };
    let Δp = 1.0;
    let capsules = self.shape.0.iter()
      .filter_map(|capsule| Some((capsule, pixel_bounds(capsule.bounding_box(), image)?)))
      .collect::<Vec<_>>();
    let x0 = bounding_box.min.x;

    // distance to the nearest capsule, one row at a time
    let mut row = vec![f64::INFINITY; bounding_box.width() as usize];
    for y in bounding_box.y_range() {
      row.fill(f64::INFINITY);
      let mut covered = false;
      for (capsule, local) in capsules.iter().filter(|(_, local)| local.y_range().contains(&y)) {
        covered = true;
        for x in local.x_range() {
          let center = Px::new(x as f64 + 0.5, y as f64 + 0.5);
          let cell = &mut row[(x - x0) as usize];
          *cell = cell.min(capsule.sdf(center));
        }
      }
      if !covered { continue; }

      for (x, &sdf) in bounding_box.x_range().zip(&row) {
        if sdf < 0.5 * Δp {
          let pixel = image.get_pixel_mut(x, y);
          *pixel = sdf_overlay_aa(sdf, Δp, *pixel, self.texture);
        }
      }
    }
  }
}

fn sdf_overlay_aa(sdf: f64, Δp: f64, mut col1: Rgba<u8>, mut col2: Rgba<u8>) -> Rgba<u8> {
  let Δf = (0.5 * Δp - sdf) // antialias
    .clamp(0.0, Δp);
  let alpha = Δf / Δp;
  // overlay blending with premultiplied alpha
  col2.0[3] = ((col2.0[3] as f64) * alpha) as u8;
  col1.blend(&col2);
  col1
}
