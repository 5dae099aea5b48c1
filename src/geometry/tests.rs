use {
  super::*,
  anyhow::Result,
  rand::prelude::*,
};

#[test] fn scale_centered() {
  let rect = canvas(100.0, 200.0);
  let inner = rect.scale_centered(0.8);
  assert_eq!(inner.min, P2::new(10.0, 20.0));
  assert_eq!(inner.max, P2::new(90.0, 180.0));
  assert_eq!(inner.center(), rect.center());
  assert_eq!(rect.scale_centered(1.0), rect);
}

#[test] fn random_point_inside() -> Result<()> {
  let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
  let rect = canvas(8000.0, 11200.0).scale_centered(0.95);
  for _ in 0..1000 {
    assert!(rect.contains(rect.random_point(&mut rng)));
  }
  Ok(())
}

#[test] fn triangle_contains() {
  let cw = Triangle::new(P2::new(0.0, 0.0), P2::new(10.0, 0.0), P2::new(0.0, 10.0));
  let ccw = Triangle::new(cw.a, cw.c, cw.b);
  for t in [cw, ccw] {
    assert!(t.contains(P2::new(1.0, 1.0)));
    assert!(t.contains(P2::new(5.0, 0.0))); // edge
    assert!(t.contains(P2::new(0.0, 0.0))); // vertex
    assert!(!t.contains(P2::new(6.0, 6.0)));
    assert!(!t.contains(P2::new(-0.1, 1.0)));
  }
}

#[test] fn bounding_boxes() {
  let circle = Circle::new(P2::new(5.0, 5.0), 2.0);
  assert_eq!(circle.bounding_box(), Box2D::new(P2::new(3.0, 3.0), P2::new(7.0, 7.0)));
  let triangle = Triangle::new(P2::new(4.0, 1.0), P2::new(-2.0, 3.0), P2::new(0.0, 9.0));
  assert_eq!(triangle.bounding_box(), Box2D::new(P2::new(-2.0, 1.0), P2::new(4.0, 9.0)));
}
