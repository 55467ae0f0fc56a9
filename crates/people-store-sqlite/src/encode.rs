//! Conversions between domain types and SQLite values.
//!
//! Identifiers are `INTEGER` row ids rendered in decimal. Unset optional
//! fields are stored as `NULL`.

use people_core::{Error, Person, PersonId, Result};
use rusqlite::functions::FunctionFlags;

// ─── Identifier ──────────────────────────────────────────────────────────────

pub fn decode_id(raw: &str) -> Result<i64> {
  raw.parse::<i64>().map_err(|_| {
    tracing::debug!(id = raw, "rejecting non-numeric person id");
    Error::InvalidIdentifier(raw.to_owned())
  })
}

// ─── Rows ────────────────────────────────────────────────────────────────────

fn optional(value: Option<String>) -> Option<String> { value.filter(|s| !s.is_empty()) }

/// Map a row selected with [`crate::schema::PERSON_COLUMNS`].
pub fn person_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person {
    id:         PersonId::Relational(row.get(0)?),
    first_name: row.get(1)?,
    last_name:  row.get(2)?,
    email:      row.get(3)?,
    phone:      optional(row.get(4)?),
    address:    optional(row.get(5)?),
    city:       optional(row.get(6)?),
    state:      optional(row.get(7)?),
    zip_code:   optional(row.get(8)?),
  })
}

// ─── Case folding ────────────────────────────────────────────────────────────

/// SQL name of [`fold`] once registered on a connection.
pub const FOLD_FN: &str = "fold";

/// Unicode lower-casing. Stored values and query arguments both go through
/// this, so the two sides of every comparison are folded identically.
pub fn fold(s: &str) -> String { s.to_lowercase() }

/// Register [`fold`] as a deterministic SQL function. Must run before the
/// schema, whose city/state index is built on it.
pub fn register_fold(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_FN,
    1,
    FunctionFlags::SQLITE_UTF8
      | FunctionFlags::SQLITE_DETERMINISTIC
      | FunctionFlags::SQLITE_INNOCUOUS,
    |ctx| {
      let value: Option<String> = ctx.get(0)?;
      Ok(value.map(|s| fold(&s)))
    },
  )
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Escape `LIKE` metacharacters; pair with `ESCAPE '\'`.
pub fn escape_like(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

/// Folded substring pattern for a search fragment.
pub fn contains_pattern(fragment: &str) -> String {
  format!("%{}%", escape_like(&fold(fragment)))
}
