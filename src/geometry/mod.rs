//! Canvas geometry.
//!
//! The origin of coordinate system is in top-left corner. All shapes live in canvas
//! space: the same units as the configured canvas width and height.

use {
  euclid::{Point2D, Box2D, Vector2D, Size2D},
  rand::Rng,
};

pub mod shapes;
pub use shapes::*;
#[cfg(test)] mod tests;

/// Canvas coordinate basis
#[derive(Debug, Copy, Clone)]
pub struct CanvasSpace;
/// Output image coordinate basis
#[derive(Debug, Copy, Clone)]
pub struct PixelSpace;

pub type P2 = Point2D<f64, CanvasSpace>;
pub type V2 = Vector2D<f64, CanvasSpace>;
/// Axis aligned rectangle, `min` inclusive, `max` exclusive.
pub type Rectangle = Box2D<f64, CanvasSpace>;

pub trait BoundingBox {
  fn bounding_box(&self) -> Rectangle;
}

pub trait RectangleExt: Sized {
  /// Scale around the center of the rectangle.
  fn scale_centered(&self, factor: f64) -> Self;
  /// Uniformly distributed point inside the rectangle.
  fn random_point(&self, rng: &mut impl Rng) -> P2;
}

impl RectangleExt for Rectangle {
  fn scale_centered(&self, factor: f64) -> Self {
    let center = self.center();
    let half = (self.size() * factor / 2.0).to_vector();
    Box2D::new(center - half, center + half)
  }

  fn random_point(&self, rng: &mut impl Rng) -> P2 {
    P2::new(
      rng.gen_range(self.min.x..self.max.x),
      rng.gen_range(self.min.y..self.max.y),
    )
  }
}

/// Canvas rectangle with the origin in the top-left corner.
pub fn canvas(width: f64, height: f64) -> Rectangle {
  Box2D::from_size(Size2D::new(width, height))
}
