use {
  crate::{
    error::{self, ConfigError},
    geometry::{Circle, Rectangle, P2},
    solver::StrokeId,
  },
  anyhow::Result,
  itertools::iproduct,
  std::{
    collections::HashMap,
    fmt::{Display, Formatter},
  },
};


/// Circular footprint of one point of an accepted stroke.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Obstacle {
  pub center: P2,
  pub radius: f64,
  /// Stroke this obstacle came from. Collision checks never look at it.
  pub stroke: StrokeId,
}

impl Obstacle {
  pub fn new(circle: Circle, stroke: StrokeId) -> Self {
    Self { center: circle.center, radius: circle.radius, stroke }
  }
}

pub type Cell = (i32, i32);

/// Uniform grid of obstacle buckets.
///
/// An obstacle lives in the single bucket its center maps to. Queries expand to a ring of
/// cells wide enough to cover the probe radius, so the search area never depends on how
/// many obstacles are stored.
/// ```text
///  ----------------------
///  |  |  |  |  |  |  |  |
///  |xx|xx|xx|  |  |  |  |
///  |xx|oo|xx|  |  |  |  |
///  |xx|xx|xx|  |  |  |  |
///  ----------------------
/// ```
#[derive(Debug, Clone)]
pub struct SpatialIndex {
  bounds: Rectangle,
  cell_size: f64,
  /// widest ring a query may inspect, spans the bounds twice over
  max_ring: i32,
  buckets: HashMap<Cell, Vec<Obstacle>>,
  /// bucket keys in creation order, for deterministic iteration
  order: Vec<Cell>,
  len: usize,
  max_radius: f64,
}

impl SpatialIndex {
  pub fn new(bounds: Rectangle, target_cell_size: f64) -> Result<Self> {
    if bounds.is_empty() {
      return Err(ConfigError::EmptyCanvas { width: bounds.width(), height: bounds.height() }.into());
    }
    let cell_size = error::positive("cell size", target_cell_size)?;
    let extent = bounds.width().max(bounds.height());
    Ok(Self {
      bounds,
      cell_size,
      max_ring: ((extent / cell_size).ceil() as i32).saturating_mul(2).saturating_add(1),
      buckets: HashMap::new(),
      order: vec![],
      len: 0,
      max_radius: 0.0,
    })
  }

  /// `resolution` cells along the longer side of `bounds`.
  pub fn with_resolution(bounds: Rectangle, resolution: u32) -> Result<Self> {
    error::positive("index resolution", resolution as f64)?;
    Self::new(bounds, bounds.width().max(bounds.height()) / resolution as f64)
  }

  pub fn bounds(&self) -> Rectangle { self.bounds }
  pub fn cell_size(&self) -> f64 { self.cell_size }
  pub fn len(&self) -> usize { self.len }
  pub fn is_empty(&self) -> bool { self.len == 0 }
  /// Largest radius inserted so far.
  pub fn max_radius(&self) -> f64 { self.max_radius }

  /// Find out what cell a given point is located in.
  pub fn cell_of(&self, point: P2) -> Cell {
    let offset = (point - self.bounds.min) / self.cell_size;
    (offset.x.floor() as i32, offset.y.floor() as i32)
  }

  /// Points outside of `bounds` are accepted, they land in cells past the grid edge.
  pub fn insert(&mut self, obstacle: Obstacle) {
    let cell = self.cell_of(obstacle.center);
    let order = &mut self.order;
    self.buckets.entry(cell)
      .or_insert_with(|| {
        order.push(cell);
        vec![]
      })
      .push(obstacle);
    self.len += 1;
    self.max_radius = self.max_radius.max(obstacle.radius);
  }

  pub fn extend(&mut self, obstacles: impl IntoIterator<Item = Obstacle>) {
    obstacles.into_iter().for_each(|obstacle| self.insert(obstacle));
  }

  /// Number of cells on each side of the probe's cell a query inspects.
  fn ring(&self, radius: f64) -> i32 {
    ((radius.max(0.0) / self.cell_size).ceil() as i32).clamp(1, self.max_ring)
  }

  /// Candidate neighbors of `probe`: everything stored in the probe's cell and in the
  /// ring of cells covering `probe.radius` around it.
  ///
  /// An over-approximation, callers apply the exact distance test.
  pub fn neighbors(&self, probe: Circle) -> impl Iterator<Item = &Obstacle> + '_ {
    let (cx, cy) = self.cell_of(probe.center);
    let ring = self.ring(probe.radius);
    iproduct!(
      cy.saturating_sub(ring)..=cy.saturating_add(ring),
      cx.saturating_sub(ring)..=cx.saturating_add(ring)
    )
      .filter_map(move |(y, x)| self.buckets.get(&(x, y)))
      .flatten()
  }

  pub fn query_neighbors(&self, probe: Circle) -> Vec<Obstacle> {
    self.neighbors(probe).copied().collect()
  }

  /// All obstacles, bucket by bucket in the order buckets were first used.
  pub fn obstacles(&self) -> impl Iterator<Item = &Obstacle> + '_ {
    self.order.iter()
      .filter_map(move |cell| self.buckets.get(cell))
      .flatten()
  }

  pub fn stats(&self) -> IndexStats {
    let fullest_bucket = self.buckets.values()
      .map(Vec::len)
      .max()
      .unwrap_or(0);
    let allocated = self.buckets.values()
      .map(|bucket| bucket.capacity() * std::mem::size_of::<Obstacle>())
      .sum::<usize>()
      + self.buckets.capacity() * std::mem::size_of::<(Cell, Vec<Obstacle>)>()
      + self.order.capacity() * std::mem::size_of::<Cell>();
    IndexStats {
      obstacles: self.len,
      buckets: self.buckets.len(),
      fullest_bucket,
      cell_size: self.cell_size,
      memory_bytes: allocated,
    }
  }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct IndexStats {
  pub obstacles: usize,
  pub buckets: usize,
  pub fullest_bucket: usize,
  pub cell_size: f64,
  pub memory_bytes: usize,
}

impl Display for IndexStats {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    use humansize::{FileSize, file_size_opts as options};

    write!(
      f,
      "obstacles: {}, buckets: {}, fullest bucket: {}, cell size: {:.2}, memory: {}",
      self.obstacles,
      self.buckets,
      self.fullest_bucket,
      self.cell_size,
      self.memory_bytes
        .file_size(options::BINARY)
        .unwrap_or_else(|e| e)
    )
  }
}
