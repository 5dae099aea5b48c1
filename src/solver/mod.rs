pub mod spatial_index;
pub use spatial_index::{SpatialIndex, Obstacle, IndexStats};

pub mod stroke;
pub use stroke::{Stroke, StrokeId, LengthMetric};

pub mod stroke_grower;
pub use stroke_grower::{StrokeGrower, GrowthParams, Gate, Gates, Seed, Growth, Outcome, StopReason};
