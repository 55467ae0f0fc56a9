//! Core types and trait definitions for the people service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`repository::PersonRepository`]; the HTTP layer
//! depends only on that trait.

pub mod error;
pub mod id;
pub mod model;
pub mod repository;

#[cfg(feature = "conformance")]
pub mod conformance;

pub use error::{Error, Result};
pub use id::PersonId;
pub use model::{Person, PersonCreate, PersonField, PersonOut, PersonUpdate};
pub use repository::PersonRepository;
