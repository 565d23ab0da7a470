//! Error type for `fiberops-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown sync status: {0:?}")]
  UnknownStatus(String),

  #[error("negative record count: {0}")]
  NegativeCount(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
