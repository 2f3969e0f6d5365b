//! Error type for `leisurelink-seed`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The run cannot start with the given settings.
  #[error("configuration error: {0}")]
  Configuration(String),

  #[error("core error: {0}")]
  Core(#[from] leisurelink_core::Error),

  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error.
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
