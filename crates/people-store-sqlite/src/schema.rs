//! SQL schema for the people SQLite store.
//!
//! Executed once at connection startup. The version is recorded in
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Email uniqueness is enforced here, not by a lookup before insert.
CREATE TABLE IF NOT EXISTS persons (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    phone       TEXT,
    address     TEXT,
    city        TEXT,
    state       TEXT,
    zip_code    TEXT
);

-- `fold` is registered on every connection before this runs.
DROP INDEX IF EXISTS persons_city_state_idx;
CREATE INDEX IF NOT EXISTS persons_city_state_fold_idx
    ON persons(fold(city), fold(state));

PRAGMA user_version = 2;
";

/// Column list shared by every `SELECT`, in [`crate::encode::person_from_row`] order.
pub const PERSON_COLUMNS: &str =
  "id, first_name, last_name, email, phone, address, city, state, zip_code";
