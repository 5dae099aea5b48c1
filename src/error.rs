//! Error types.
//!
//! Errors are carried as [`anyhow::Error`]. The single typed error is [`ConfigError`]:
//! a run refuses to start when its parameters could not terminate or make no sense.
//! Everything after construction (collision, short strokes) is an outcome, not an error.
//! ```
//! # use flow_filling::error::ConfigError;
//! let err = anyhow::Error::from(ConfigError::EmptyRadiusSet);
//! assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::EmptyRadiusSet));
//! ```
use std::fmt::{self, Display};

pub use anyhow::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
  EmptyRadiusSet,
  /// Must be strictly positive and finite.
  NonPositive { name: &'static str, value: f64 },
  NonFinite { name: &'static str, value: f64 },
  /// Must be zero or positive, and finite.
  Negative { name: &'static str, value: f64 },
  /// Must lie in `[0, 1]`.
  Probability { name: &'static str, value: f64 },
  /// Must lie in `(0, 1]`.
  Scale { name: &'static str, value: f64 },
  /// `min` must not exceed `max`.
  Range { name: &'static str, min: f64, max: f64 },
  EmptyCanvas { width: f64, height: f64 },
  /// Index cells must hold the widest stroke plus its padding.
  FineIndex { cell_size: f64, reach: f64 },
  UnknownPalette(String),
  /// No color with a positive weight.
  EmptyPalette(String),
  InvalidColor(String),
}

impl Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    use ConfigError::*;
    match self {
      EmptyRadiusSet => write!(f, "stroke radius set is empty"),
      NonPositive { name, value } => write!(f, "{name} must be positive and finite, got {value}"),
      NonFinite { name, value } => write!(f, "{name} must be finite, got {value}"),
      Negative { name, value } => write!(f, "{name} must be non-negative and finite, got {value}"),
      Probability { name, value } => write!(f, "{name} must be a probability in [0, 1], got {value}"),
      Scale { name, value } => write!(f, "{name} must lie in (0, 1], got {value}"),
      Range { name, min, max } => write!(f, "{name}: minimum {min} exceeds maximum {max}"),
      EmptyCanvas { width, height } => write!(f, "canvas {width}x{height} has no area"),
      FineIndex { cell_size, reach } => write!(
        f,
        "index cells of {cell_size} are narrower than the collision reach {reach}, lower the index resolution"
      ),
      UnknownPalette(name) => write!(
        f,
        "{name} is not a valid palette, valid values are {}",
        crate::palette::Palette::NAMES.join(", ")
      ),
      EmptyPalette(name) => write!(f, "palette {name} has no color with a positive weight"),
      InvalidColor(hex) => write!(f, "{hex} is not a hex color"),
    }
  }
}

impl std::error::Error for ConfigError {}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, ConfigError> {
  if value.is_finite() && value > 0.0 { Ok(value) } else { Err(ConfigError::NonPositive { name, value }) }
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, ConfigError> {
  if value.is_finite() { Ok(value) } else { Err(ConfigError::NonFinite { name, value }) }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
  if value.is_finite() && value >= 0.0 { Ok(value) } else { Err(ConfigError::Negative { name, value }) }
}

pub(crate) fn probability(name: &'static str, value: f64) -> Result<f64, ConfigError> {
  if (0.0..=1.0).contains(&value) { Ok(value) } else { Err(ConfigError::Probability { name, value }) }
}

pub(crate) fn scale(name: &'static str, value: f64) -> Result<f64, ConfigError> {
  if value > 0.0 && value <= 1.0 { Ok(value) } else { Err(ConfigError::Scale { name, value }) }
}
