//! Error type for `leisurelink-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] leisurelink_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A column held a value no domain type maps to.
  #[error("unexpected {column} value: {value:?}")]
  Decode { column: &'static str, value: String },

  /// A unit operation was requested with no phase transaction open.
  #[error("no open transaction")]
  NoTransaction,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
