//! Person identity.
//!
//! Each backend has its own native identifier shape. The repository contract
//! only ever exchanges identifiers as strings; [`PersonId`] renders the native
//! value, and parsing lives with the backend that owns the shape.

use std::fmt;

/// The identity of a stored person. Exactly one representation is used per
/// backend and it never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonId {
  /// Auto-incrementing row id assigned by the relational backend.
  Relational(i64),
  /// 12-byte object id assigned by the document backend.
  Document([u8; 12]),
}

impl PersonId {
  pub fn as_relational(&self) -> Option<i64> {
    match self {
      Self::Relational(id) => Some(*id),
      Self::Document(_) => None,
    }
  }

  pub fn as_document(&self) -> Option<[u8; 12]> {
    match self {
      Self::Document(bytes) => Some(*bytes),
      Self::Relational(_) => None,
    }
  }
}

/// Decimal for relational ids, 24 lowercase hex characters for document ids.
impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Relational(id) => write!(f, "{id}"),
      Self::Document(bytes) => f.write_str(&hex::encode(bytes)),
    }
  }
}
