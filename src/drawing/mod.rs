//! Raster output, `drawing` feature.
//!
//! Strokes are rasterized from signed distance fields: a segment of a stroke is a capsule,
//! and each pixel is blended with a coverage derived from its distance to the nearest
//! capsule, which gives one pixel of anti-aliasing at every edge.

use {
  crate::{
    composition::StrokeSink,
    geometry::{CanvasSpace, Circle, PixelSpace, Rectangle, P2},
    palette::Color,
    solver::{SpatialIndex, Stroke},
  },
  anyhow::{Context, Result},
  euclid::{Box2D, Point2D, Scale, Size2D, Vector2D},
  image::{Rgba, RgbaImage},
  itertools::Itertools,
  std::path::Path,
};

mod impl_draw_rgbaimage;
#[cfg(test)] mod tests;

pub type Px = Point2D<f64, PixelSpace>;

pub trait Draw<Backend> {
  fn draw(&self, image: &mut Backend);
}

/// Shape together with what fills it.
#[derive(Debug, Copy, Clone)]
pub struct Texture<S, T> {
  pub shape: S,
  pub texture: T,
}

/// Segment `a`-`b` inflated by `radius`, in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Capsule {
  pub a: Px,
  pub b: Px,
  pub radius: f64,
}

impl Capsule {
  pub fn sdf(&self, p: Px) -> f64 {
    let (pa, ba) = (p - self.a, self.b - self.a);
    let h = match ba.square_length() {
      l if l > 0.0 => (pa.dot(ba) / l).clamp(0.0, 1.0),
      _ => 0.0
    };
    (pa - ba * h).length() - self.radius
  }

  /// Includes one pixel of margin for the anti-aliased edge.
  pub fn bounding_box(&self) -> Box2D<f64, PixelSpace> {
    let r = Vector2D::splat(self.radius + 1.0);
    Box2D::new(self.a.min(self.b) - r, self.a.max(self.b) + r)
  }
}

/// Capsules drawn as one shape: an overlap of two segments is covered once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polyline(pub Vec<Capsule>);

impl Polyline {
  pub fn bounding_box(&self) -> Option<Box2D<f64, PixelSpace>> {
    self.0.iter()
      .map(Capsule::bounding_box)
      .reduce(|a, b| a.union(&b))
  }
}

/// Clip a box to the image and snap it outward to whole pixels.
fn pixel_bounds(bounding_box: Box2D<f64, PixelSpace>, image: &RgbaImage) -> Option<Box2D<u32, PixelSpace>> {
  let (w, h) = image.dimensions();
  bounding_box
    .round_out()
    .intersection(&Box2D::from_size(Size2D::new(w as f64, h as f64)))
    .filter(|b| !b.is_empty())
    .map(|b| b.to_u32())
}

/// Raster sink: an RGBA image holding the whole canvas, `width` pixels wide.
#[derive(Debug, Clone)]
pub struct Canvas {
  width: u32,
  origin: P2,
  scale: Scale<f64, CanvasSpace, PixelSpace>,
  image: RgbaImage,
}

impl Canvas {
  /// Height follows the canvas aspect ratio on [`StrokeSink::begin`].
  pub fn new(width: u32) -> Self {
    Self {
      width,
      origin: P2::origin(),
      scale: Scale::new(1.0),
      image: RgbaImage::new(0, 0),
    }
  }

  pub fn image(&self) -> &RgbaImage { &self.image }
  pub fn into_image(self) -> RgbaImage { self.image }

  pub fn to_pixels(&self, point: P2) -> Px {
    ((point - self.origin) * self.scale).to_point()
  }

  /// Pixels per canvas unit.
  pub fn scale(&self) -> f64 { self.scale.get() }

  pub fn draw_circle(&mut self, circle: Circle, color: Color) {
    let center = self.to_pixels(circle.center);
    let dot = Capsule { a: center, b: center, radius: circle.radius * self.scale() };
    Texture { shape: Polyline(vec![dot]), texture: Rgba(color.0) }.draw(&mut self.image);
  }

  /// Every obstacle at its own radius, colored by the stroke it came from.
  pub fn draw_index(&mut self, index: &SpatialIndex, alpha: u8) {
    for obstacle in index.obstacles() {
      // golden angle hue steps keep neighboring ids apart
      let Color([r, g, b, _]) = Color::hsl(obstacle.stroke as f64 * 137.508, 0.65, 0.5);
      self.draw_circle(Circle::new(obstacle.center, obstacle.radius / 2.0), Color([r, g, b, alpha]));
    }
  }

  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    self.image.save(path)
      .with_context(|| format!("unable to save {}", path.display()))
  }
}

impl StrokeSink for Canvas {
  fn begin(&mut self, canvas: Rectangle, background: Color) -> Result<()> {
    let scale = self.width as f64 / canvas.width();
    let height = (canvas.height() * scale).round().max(1.0) as u32;
    self.origin = canvas.min;
    self.scale = Scale::new(scale);
    self.image = RgbaImage::from_pixel(self.width, height, Rgba(background.0));
    Ok(())
  }

  /// The stroke is `stroke.radius` wide.
  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> {
    let radius = stroke.radius * self.scale() / 2.0;
    let points = stroke.centers()
      .map(|p| self.to_pixels(p))
      .collect::<Vec<_>>();
    let capsules = match points.len() {
      0 => return Ok(()),
      1 => vec![Capsule { a: points[0], b: points[0], radius }],
      _ => points.into_iter()
        .tuple_windows()
        .map(|(a, b)| Capsule { a, b, radius })
        .collect()
    };
    Texture { shape: Polyline(capsules), texture: Rgba(color.0) }.draw(&mut self.image);
    Ok(())
  }
}
