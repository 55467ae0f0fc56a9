//! Error types for `people-core`.
//!
//! These are the kinds every repository implementation reports. "Not found"
//! is deliberately absent: it is an expected outcome, expressed as `None` or
//! `false` by the repository operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The identifier string does not parse into the backend's native id type.
  #[error("invalid ID format: {0:?}")]
  InvalidIdentifier(String),

  /// A create or update would violate email uniqueness.
  #[error("email already exists")]
  DuplicateEmail,

  #[error("missing required parameter: {0}")]
  MissingParameter(&'static str),

  /// Input rejected before reaching storage.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// Any storage failure not classified above.
  #[error("backend failure: {0}")]
  Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap an arbitrary storage error as [`Error::Backend`].
  pub fn backend<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Backend(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
