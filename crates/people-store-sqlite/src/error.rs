//! Classification of SQLite failures into [`people_core::Error`] kinds.

use people_core::Error;

/// `true` for the unique-constraint failure on `persons.email`.
pub fn is_email_unique_violation(err: &rusqlite::Error) -> bool {
  match err {
    rusqlite::Error::SqliteFailure(e, msg) => {
      e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        && msg.as_deref().is_some_and(|m| m.contains("persons.email"))
    }
    _ => false,
  }
}

/// Translate a failed call on the connection. Anything that is not the email
/// constraint is logged here with full detail and surfaces as `Backend`.
pub fn classify(op: &'static str, err: tokio_rusqlite::Error) -> Error {
  if let tokio_rusqlite::Error::Rusqlite(e) = &err
    && is_email_unique_violation(e)
  {
    tracing::warn!(op, "email already exists");
    return Error::DuplicateEmail;
  }
  tracing::error!(op, error = %err, "sqlite operation failed");
  Error::backend(err)
}
