//! Stored document shape and query filters for the `persons` collection.

use mongodb::bson::{Document, doc, oid::ObjectId};
use people_core::{
  Error, Person, PersonCreate, PersonId, Result, repository::name_fragment,
};
use serde::{Deserialize, Serialize};

/// Name of the unique index on `email`.
pub const EMAIL_INDEX: &str = "email_unique";

/// A person as stored. Unset optional fields are omitted from the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDocument {
  #[serde(rename = "_id")]
  pub id:         ObjectId,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub state:      Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub zip_code:   Option<String>,
}

impl PersonDocument {
  pub fn new(id: ObjectId, input: PersonCreate) -> Self {
    let input = input.normalized();
    Self {
      id,
      first_name: input.first_name,
      last_name: input.last_name,
      email: input.email,
      phone: input.phone,
      address: input.address,
      city: input.city,
      state: input.state,
      zip_code: input.zip_code,
    }
  }

  pub fn into_person(self) -> Person {
    fn optional(v: Option<String>) -> Option<String> { v.filter(|s| !s.is_empty()) }
    Person {
      id:         PersonId::Document(self.id.bytes()),
      first_name: self.first_name,
      last_name:  self.last_name,
      email:      self.email,
      phone:      optional(self.phone),
      address:    optional(self.address),
      city:       optional(self.city),
      state:      optional(self.state),
      zip_code:   optional(self.zip_code),
    }
  }
}

// ─── Identifier ──────────────────────────────────────────────────────────────

pub fn decode_id(raw: &str) -> Result<ObjectId> {
  ObjectId::parse_str(raw).map_err(|_| {
    tracing::debug!(id = raw, "rejecting malformed object id");
    Error::InvalidIdentifier(raw.to_owned())
  })
}

pub fn by_id(id: ObjectId) -> Document { doc! { "_id": id } }

// ─── Filters ─────────────────────────────────────────────────────────────────

/// Case-insensitive literal substring match.
fn contains_ci(fragment: &str) -> Document {
  doc! { "$regex": regex::escape(fragment), "$options": "i" }
}

/// Case-insensitive whole-value match.
fn equals_ci(value: &str) -> Document {
  doc! { "$regex": format!(r"\A{}\z", regex::escape(value)), "$options": "i" }
}

pub fn name_filter(first_name: &str, last_name: &str) -> Document {
  let mut filter = Document::new();
  if let Some(first) = name_fragment(first_name) {
    filter.insert("first_name", contains_ci(first));
  }
  if let Some(last) = name_fragment(last_name) {
    filter.insert("last_name", contains_ci(last));
  }
  filter
}

pub fn city_state_filter(city: &str, state: &str) -> Document {
  doc! {
    "city": equals_ci(city),
    "state": equals_ci(state),
  }
}

/// Object ids grow with creation time, so `_id` order is insertion order.
pub fn insertion_order() -> Document { doc! { "_id": 1 } }
