//! Classification of MongoDB failures into [`people_core::Error`] kinds.

use mongodb::error::{ErrorKind, WriteFailure};
use people_core::Error;

/// Server code for a duplicate key in a unique index.
const DUPLICATE_KEY: i32 = 11000;

/// `true` when a server error reports a duplicate key on the email index.
pub fn is_duplicate_email(code: i32, message: &str) -> bool {
  code == DUPLICATE_KEY && message.contains("email")
}

fn is_duplicate_email_error(err: &mongodb::error::Error) -> bool {
  match err.kind.as_ref() {
    ErrorKind::Write(WriteFailure::WriteError(e)) => is_duplicate_email(e.code, &e.message),
    ErrorKind::Command(e) => is_duplicate_email(e.code, &e.message),
    _ => false,
  }
}

/// Translate a failed driver call. Anything that is not the email index is
/// logged here with full detail and surfaces as `Backend`.
pub fn classify(op: &'static str, err: mongodb::error::Error) -> Error {
  if is_duplicate_email_error(&err) {
    tracing::warn!(op, "email already exists");
    return Error::DuplicateEmail;
  }
  tracing::error!(op, error = %err, "mongodb operation failed");
  Error::backend(err)
}
