use {
  super::{BoundingBox, Rectangle, P2, V2},
  euclid::Box2D,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Circle {
  pub center: P2,
  pub radius: f64,
}

impl Circle {
  pub fn new(center: P2, radius: f64) -> Self {
    Self { center, radius }
  }
}

impl BoundingBox for Circle {
  fn bounding_box(&self) -> Rectangle {
    Box2D::new(
      self.center - V2::splat(self.radius),
      self.center + V2::splat(self.radius),
    )}}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
  pub a: P2,
  pub b: P2,
  pub c: P2,
}

impl Triangle {
  pub fn new(a: P2, b: P2, c: P2) -> Self {
    Self { a, b, c }
  }

  /// Points on an edge are inside. The result does not depend on vertex winding.
  pub fn contains(&self, p: P2) -> bool {
    let side = |from: P2, to: P2| (to - from).cross(p - from);
    let (d1, d2, d3) = (side(self.a, self.b), side(self.b, self.c), side(self.c, self.a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
  }
}

impl BoundingBox for Triangle {
  fn bounding_box(&self) -> Rectangle {
    Box2D::from_points([self.a, self.b, self.c])
  }}
