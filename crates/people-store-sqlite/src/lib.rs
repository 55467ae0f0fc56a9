//! SQLite backend for the people service.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod error;
mod schema;
mod store;

pub use store::{SqliteConfig, SqliteRepository};
