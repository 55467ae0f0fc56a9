//! [`SqliteRepository`]: the SQLite implementation of [`PersonRepository`].

use std::path::PathBuf;

use people_core::{
  Error, Person, PersonCreate, PersonId, PersonRepository, PersonUpdate, Result,
  repository::{name_fragment, require_city_state},
};
use rusqlite::{OptionalExtension as _, params_from_iter, types::Value};
use serde::Deserialize;

use crate::{
  encode::{contains_pattern, decode_id, fold, person_from_row, register_fold},
  error::classify,
  schema::{PERSON_COLUMNS, SCHEMA},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Where the relational backend keeps its database file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SqliteConfig {
  pub path: PathBuf,
}

impl Default for SqliteConfig {
  fn default() -> Self { Self { path: PathBuf::from("db/persons.db") } }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// A person repository backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted and shared by
/// every request.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
  /// Open (or create) the database described by `config` and initialise the
  /// schema. The parent directory is created if it does not exist.
  pub async fn open(config: &SqliteConfig) -> Result<Self> {
    if let Some(parent) = config.path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await.map_err(|e| {
        tracing::error!(path = ?parent, error = %e, "cannot create database directory");
        Error::backend(e)
      })?;
    }

    let conn = tokio_rusqlite::Connection::open(&config.path)
      .await
      .map_err(|e| classify("open", e))?;
    let repo = Self { conn };
    repo.init_schema().await?;
    tracing::info!(path = ?config.path, "sqlite store ready");
    Ok(repo)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|e| classify("open", e))?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_fold(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(|e| classify("init_schema", e))
  }

  async fn fetch(&self, row_id: i64) -> Result<Option<Person>> {
    self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE id = ?1"),
              rusqlite::params![row_id],
              person_from_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(|e| classify("get", e))
  }
}

// ─── PersonRepository impl ───────────────────────────────────────────────────

impl PersonRepository for SqliteRepository {
  async fn create(&self, input: PersonCreate) -> Result<Person> {
    let input = input.normalized();
    let row = input.clone();

    let row_id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO persons
             (first_name, last_name, email, phone, address, city, state, zip_code)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            row.first_name,
            row.last_name,
            row.email,
            row.phone,
            row.address,
            row.city,
            row.state,
            row.zip_code,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(|e| classify("create", e))?;

    tracing::debug!(id = row_id, "person created");
    Ok(Person::from_create(PersonId::Relational(row_id), input))
  }

  async fn get(&self, id: &str) -> Result<Option<Person>> {
    let row_id = decode_id(id)?;
    self.fetch(row_id).await
  }

  async fn update(&self, id: &str, patch: PersonUpdate) -> Result<Option<Person>> {
    let row_id = decode_id(id)?;

    // Read-then-write is not atomic: two concurrent updates to the same person
    // can interleave here and one of the writes is lost.
    let Some(mut person) = self.fetch(row_id).await? else {
      return Ok(None);
    };

    let changes = patch.changes();
    if changes.is_empty() {
      return Ok(Some(person));
    }

    let assignments = changes
      .iter()
      .enumerate()
      .map(|(i, (field, _))| format!("{} = ?{}", field.name(), i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE persons SET {assignments} WHERE id = ?{}",
      changes.len() + 1
    );
    let mut values: Vec<Value> =
      changes.iter().map(|(_, v)| Value::Text(v.clone())).collect();
    values.push(Value::Integer(row_id));

    let affected = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, params_from_iter(values))?))
      .await
      .map_err(|e| classify("update", e))?;

    // Deleted between the read and the write.
    if affected == 0 {
      return Ok(None);
    }

    person.apply(changes);
    tracing::debug!(id = row_id, "person updated");
    Ok(Some(person))
  }

  async fn delete(&self, id: &str) -> Result<bool> {
    let row_id = decode_id(id)?;
    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM persons WHERE id = ?1", rusqlite::params![row_id])?)
      })
      .await
      .map_err(|e| classify("delete", e))?;
    Ok(affected > 0)
  }

  async fn search_by_name(&self, first_name: &str, last_name: &str) -> Result<Vec<Person>> {
    let first = name_fragment(first_name).map(contains_pattern);
    let last  = name_fragment(last_name).map(contains_pattern);

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          r"SELECT {PERSON_COLUMNS} FROM persons
            WHERE (?1 IS NULL OR fold(first_name) LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR fold(last_name)  LIKE ?2 ESCAPE '\')
            ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![first, last], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(|e| classify("search_by_name", e))
  }

  async fn list_by_city_state(&self, city: &str, state: &str) -> Result<Vec<Person>> {
    require_city_state(city, state)?;
    let city  = fold(city);
    let state = fold(state);

    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {PERSON_COLUMNS} FROM persons
           WHERE fold(city) = ?1 AND fold(state) = ?2
           ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![city, state], person_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(|e| classify("list_by_city_state", e))
  }
}
