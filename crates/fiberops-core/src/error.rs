//! Error types for `fiberops-core`.

use thiserror::Error;

/// Errors raised while wiring components together. Runtime failures belong
/// to each backend's own error type.
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid configuration: {0}")]
  Config(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
