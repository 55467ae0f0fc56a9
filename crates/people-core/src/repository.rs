//! The `PersonRepository` trait.
//!
//! The trait is implemented by storage backends (`people-store-sqlite`,
//! `people-store-mongo`). The HTTP layer depends on this abstraction and never
//! learns which backend answered.
//!
//! Identifiers cross this boundary as strings. Each implementation parses them
//! into its native shape (failing with [`Error::InvalidIdentifier`]) and
//! renders its native ids back through [`PersonId`](crate::PersonId).
//!
//! [`Error::InvalidIdentifier`]: crate::Error::InvalidIdentifier

use std::future::Future;

use crate::{
  Result,
  model::{Person, PersonCreate, PersonUpdate},
};

/// Abstraction over a person store.
///
/// Not-found is an expected outcome: `get` and `update` return `None`, and
/// `delete` returns `false`. No operation retries and none spans more than one
/// record.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonRepository: Send + Sync {
  /// Persist a new person; the backend assigns its identity.
  ///
  /// Fails with `DuplicateEmail` when the storage engine's unique email
  /// constraint rejects the insert.
  fn create(
    &self,
    input: PersonCreate,
  ) -> impl Future<Output = Result<Person>> + Send + '_;

  /// Fetch a person by id. Returns `None` if no such record exists.
  fn get<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + 'a;

  /// Apply a partial update and return the resulting record.
  ///
  /// Fields that are absent or empty in `patch` are left untouched. A patch
  /// with no effective changes returns the current record without writing.
  /// Returns `None` if no such record exists.
  fn update<'a>(
    &'a self,
    id: &'a str,
    patch: PersonUpdate,
  ) -> impl Future<Output = Result<Option<Person>>> + Send + 'a;

  /// Hard-delete a person. Returns `true` if a record was removed.
  fn delete<'a>(&'a self, id: &'a str) -> impl Future<Output = Result<bool>> + Send + 'a;

  /// Case-insensitive substring search on first and last name, in insertion
  /// order. A blank fragment places no constraint on its field.
  fn search_by_name<'a>(
    &'a self,
    first_name: &'a str,
    last_name: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>>> + Send + 'a;

  /// Persons whose city and state both equal the arguments, ignoring case, in
  /// insertion order. A blank argument is `MissingParameter`.
  fn list_by_city_state<'a>(
    &'a self,
    city: &'a str,
    state: &'a str,
  ) -> impl Future<Output = Result<Vec<Person>>> + Send + 'a;
}

/// Shared argument check for [`PersonRepository::list_by_city_state`].
pub fn require_city_state(city: &str, state: &str) -> Result<()> {
  if city.trim().is_empty() {
    return Err(crate::Error::MissingParameter("city"));
  }
  if state.trim().is_empty() {
    return Err(crate::Error::MissingParameter("state"));
  }
  Ok(())
}

/// A search fragment that constrains its field, or `None` when blank.
pub fn name_fragment(fragment: &str) -> Option<&str> {
  if fragment.trim().is_empty() { None } else { Some(fragment) }
}
