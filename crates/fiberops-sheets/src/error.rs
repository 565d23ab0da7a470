//! Error type for `fiberops-sheets`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("credentials file not found: {}", .0.display())]
  CredentialsMissing(PathBuf),

  #[error("malformed credentials: {0}")]
  CredentialsMalformed(String),

  #[error("could not sign token assertion: {0}")]
  Signing(#[from] jsonwebtoken::errors::Error),

  #[error("token endpoint returned {status}: {body}")]
  TokenRejected { status: u16, body: String },

  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("sheets api returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("spreadsheet {0} has no worksheets")]
  NoWorksheets(String),

  #[error("cell {0} does not hold a number")]
  NotANumber(String),

  #[error("invalid url: {0}")]
  InvalidUrl(String),
}

impl Error {
  /// Whether this error arose while establishing a session rather than while
  /// reading data.
  pub fn is_auth(&self) -> bool {
    matches!(
      self,
      Self::CredentialsMissing(_)
        | Self::CredentialsMalformed(_)
        | Self::Signing(_)
        | Self::TokenRejected { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
