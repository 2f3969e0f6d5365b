//! Error types for `leisurelink-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("radius must be a positive number of kilometres, got {0}")]
  InvalidRadius(f64),

  #[error("latitude {0} is outside the range where longitude can be corrected")]
  PolarLatitude(f64),

  #[error("malformed point literal: {0:?}")]
  MalformedPoint(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
