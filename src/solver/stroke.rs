use {
  crate::geometry::{Circle, P2},
  itertools::Itertools,
  serde::{Deserialize, Serialize},
};

pub type StrokeId = u32;

/// How the length of a stroke is accounted.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthMetric {
  /// Sum over consecutive pairs: 0-1, 1-2, 2-3, ...
  #[default]
  Consecutive,
  /// Sum over points taken two at a time: 0-1, 2-3, 4-5, ...
  /// A trailing odd point contributes nothing.
  Paired,
}

impl LengthMetric {
  pub fn measure(self, points: &[Circle]) -> f64 {
    match self {
      LengthMetric::Consecutive => points.iter()
        .tuple_windows()
        .map(|(a, b)| a.center.distance_to(b.center))
        .sum(),
      LengthMetric::Paired => points.chunks_exact(2)
        .map(|pair| pair[0].center.distance_to(pair[1].center))
        .sum(),
    }
  }

  /// Length gained by appending `next` to `points`.
  fn increment(self, points: &[Circle], next: &Circle) -> f64 {
    let last = match points.last() {
      Some(last) => last,
      None => return 0.0
    };
    match self {
      LengthMetric::Consecutive => last.center.distance_to(next.center),
      LengthMetric::Paired if points.len() % 2 == 1 => last.center.distance_to(next.center),
      LengthMetric::Paired => 0.0,
    }
  }
}

/// One grown line. The start point is where growth began, and is not one of `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
  pub id: StrokeId,
  pub start: P2,
  pub radius: f64,
  metric: LengthMetric,
  points: Vec<Circle>,
  length: f64,
}

impl Stroke {
  pub fn new(id: StrokeId, start: P2, radius: f64, metric: LengthMetric) -> Self {
    Self { id, start, radius, metric, points: vec![], length: 0.0 }
  }

  pub fn push(&mut self, point: Circle) {
    self.length += self.metric.increment(&self.points, &point);
    self.points.push(point);
  }

  /// Keep the first `len` points.
  pub fn truncate(&mut self, len: usize) {
    self.points.truncate(len);
    self.length = self.metric.measure(&self.points);
  }

  pub fn points(&self) -> &[Circle] { &self.points }

  pub fn centers(&self) -> impl Iterator<Item = P2> + '_ {
    self.points.iter().map(|p| p.center)
  }

  /// Accumulated length under the stroke's metric, kept up to date by [`Stroke::push`].
  pub fn length(&self) -> f64 { self.length }

  pub fn metric(&self) -> LengthMetric { self.metric }

  pub fn len(&self) -> usize { self.points.len() }

  pub fn is_empty(&self) -> bool { self.points.is_empty() }
}

#[cfg(test)] mod tests {
  use {
    super::*,
    rand::prelude::*,
  };

  fn line(xs: &[f64]) -> Vec<Circle> {
    xs.iter().map(|&x| Circle::new(P2::new(x, 0.0), 1.0)).collect()
  }

  #[test] fn paired_length_skips_odd_links() {
    // pairs (0,1) and (2,3); the point at x = 4 is left over
    let points = line(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    assert_eq!(LengthMetric::Paired.measure(&points), 2.0);
    assert_eq!(LengthMetric::Consecutive.measure(&points), 4.0);

    let points = line(&[0.0, 1.0, 11.0, 13.0, 100.0]);
    assert_eq!(LengthMetric::Paired.measure(&points), 3.0);
  }

  #[test] fn degenerate_lengths() {
    for metric in [LengthMetric::Paired, LengthMetric::Consecutive] {
      assert_eq!(metric.measure(&[]), 0.0);
      assert_eq!(metric.measure(&line(&[7.0])), 0.0);
    }
  }

  #[test] fn incremental_length_matches_measure() {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(3);
    for metric in [LengthMetric::Paired, LengthMetric::Consecutive] {
      let mut stroke = Stroke::new(0, P2::origin(), 1.0, metric);
      for _ in 0..257 {
        stroke.push(Circle::new(P2::new(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0)), 1.0));
        let expected = metric.measure(stroke.points());
        assert!((stroke.length() - expected).abs() < 1e-9, "{metric:?}");
      }
    }
  }
}
