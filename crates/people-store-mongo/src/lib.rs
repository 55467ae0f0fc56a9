//! MongoDB backend for the people service.
//!
//! Persons live in a single `persons` collection. Identity is the document's
//! `_id` object id; email uniqueness is a unique index created at connect
//! time.

mod document;
mod error;
mod store;

pub use store::{MongoConfig, MongoRepository};

#[cfg(test)]
mod tests;
