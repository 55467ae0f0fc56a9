//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// Storage failure. The message is generic; the backend has already logged
  /// the cause.
  #[error("internal error: {0}")]
  Internal(&'static str),
}

impl ApiError {
  /// Map a repository error, using `failure` as the client-facing message if
  /// the error is a backend failure.
  pub fn from_repo(err: people_core::Error, failure: &'static str) -> Self {
    use people_core::Error;
    match err {
      Error::InvalidIdentifier(_) => Self::BadRequest("invalid ID format".into()),
      Error::DuplicateEmail => Self::Conflict("email already exists".into()),
      Error::MissingParameter(_) => {
        Self::BadRequest("City and state query parameters are required".into())
      }
      Error::InvalidInput(m) => Self::BadRequest(format!("Invalid input: {m}")),
      Error::Backend(e) => {
        tracing::debug!(error = %e, "{failure}");
        Self::Internal(failure)
      }
    }
  }
}

impl From<people_core::Error> for ApiError {
  fn from(err: people_core::Error) -> Self { Self::from_repo(err, "Internal server error") }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m.to_owned()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
