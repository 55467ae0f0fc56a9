//! The person entity and its view-specific shapes.
//!
//! - [`Person`]: the canonical stored record.
//! - [`PersonCreate`]: create input, no identifier.
//! - [`PersonUpdate`]: partial update, every field optional.
//! - [`PersonOut`]: output view, identifier rendered as a string.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, Result, id::PersonId};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
});

/// Loose shape check: `local@domain.tld`, no whitespace.
pub fn looks_like_email(s: &str) -> bool { EMAIL_RE.is_match(s) }

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The mutable attributes of a person. The key is shared by the SQL column
/// and the document field of the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonField {
  FirstName,
  LastName,
  Email,
  Phone,
  Address,
  City,
  State,
  ZipCode,
}

impl PersonField {
  pub const ALL: [PersonField; 8] = [
    Self::FirstName,
    Self::LastName,
    Self::Email,
    Self::Phone,
    Self::Address,
    Self::City,
    Self::State,
    Self::ZipCode,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Self::FirstName => "first_name",
      Self::LastName => "last_name",
      Self::Email => "email",
      Self::Phone => "phone",
      Self::Address => "address",
      Self::City => "city",
      Self::State => "state",
      Self::ZipCode => "zip_code",
    }
  }
}

// ─── Canonical record ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
  pub id:         PersonId,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub city:       Option<String>,
  pub state:      Option<String>,
  pub zip_code:   Option<String>,
}

impl Person {
  /// Build the stored record for a freshly assigned `id`.
  pub fn from_create(id: PersonId, input: PersonCreate) -> Self {
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

  /// Overwrite a single field. Identity is never touched.
  pub fn set(&mut self, field: PersonField, value: String) {
    match field {
      PersonField::FirstName => self.first_name = value,
      PersonField::LastName => self.last_name = value,
      PersonField::Email => self.email = value,
      PersonField::Phone => self.phone = Some(value),
      PersonField::Address => self.address = Some(value),
      PersonField::City => self.city = Some(value),
      PersonField::State => self.state = Some(value),
      PersonField::ZipCode => self.zip_code = Some(value),
    }
  }

  /// Apply the effective changes produced by [`PersonUpdate::changes`].
  pub fn apply(&mut self, changes: Vec<(PersonField, String)>) {
    for (field, value) in changes {
      self.set(field, value);
    }
  }
}

// ─── Create input ────────────────────────────────────────────────────────────

/// Input for creating a person. Required fields default to empty so that a
/// missing field surfaces through [`PersonCreate::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonCreate {
  #[serde(default)]
  pub first_name: String,
  #[serde(default)]
  pub last_name:  String,
  #[serde(default)]
  pub email:      String,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub city:       Option<String>,
  pub state:      Option<String>,
  pub zip_code:   Option<String>,
}

impl PersonCreate {
  pub fn new(
    first_name: impl Into<String>,
    last_name: impl Into<String>,
    email: impl Into<String>,
  ) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      email: email.into(),
      ..Self::default()
    }
  }

  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().is_empty()
      || self.last_name.trim().is_empty()
      || self.email.trim().is_empty()
    {
      return Err(Error::InvalidInput(
        "first name, last name, and email are required".into(),
      ));
    }
    if !looks_like_email(&self.email) {
      return Err(Error::InvalidInput(format!(
        "{:?} is not a valid email address",
        self.email
      )));
    }
    Ok(())
  }

  /// Map empty optional values to `None` so "not provided" has one spelling.
  pub fn normalized(self) -> Self {
    fn present(v: Option<String>) -> Option<String> {
      v.filter(|s| !s.is_empty())
    }
    Self {
      phone: present(self.phone),
      address: present(self.address),
      city: present(self.city),
      state: present(self.state),
      zip_code: present(self.zip_code),
      ..self
    }
  }
}

// ─── Update input ────────────────────────────────────────────────────────────

/// A partial update.
///
/// A field that is present and non-empty replaces the stored value. An absent
/// field and an empty string both mean "leave unchanged"; there is no way to
/// clear an optional field through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonUpdate {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub city:       Option<String>,
  pub state:      Option<String>,
  pub zip_code:   Option<String>,
}

impl PersonUpdate {
  pub fn get(&self, field: PersonField) -> Option<&str> {
    let value = match field {
      PersonField::FirstName => &self.first_name,
      PersonField::LastName => &self.last_name,
      PersonField::Email => &self.email,
      PersonField::Phone => &self.phone,
      PersonField::Address => &self.address,
      PersonField::City => &self.city,
      PersonField::State => &self.state,
      PersonField::ZipCode => &self.zip_code,
    };
    value.as_deref()
  }

  /// The effective changes, in [`PersonField::ALL`] order.
  pub fn changes(&self) -> Vec<(PersonField, String)> {
    PersonField::ALL
      .into_iter()
      .filter_map(|field| match self.get(field) {
        Some(v) if !v.is_empty() => Some((field, v.to_owned())),
        _ => None,
      })
      .collect()
  }

  pub fn is_noop(&self) -> bool { self.changes().is_empty() }

  /// A name change may not blank a required field, and an email change must
  /// look like an address. Other fields are free-form.
  pub fn validate(&self) -> Result<()> {
    for field in [PersonField::FirstName, PersonField::LastName] {
      if let Some(v) = self.get(field)
        && !v.is_empty()
        && v.trim().is_empty()
      {
        return Err(Error::InvalidInput(format!("{} may not be blank", field.name())));
      }
    }
    match self.email.as_deref() {
      Some(email) if !email.is_empty() && !looks_like_email(email) => Err(
        Error::InvalidInput(format!("{email:?} is not a valid email address")),
      ),
      _ => Ok(()),
    }
  }
}

// ─── Output view ─────────────────────────────────────────────────────────────

/// The shape returned to clients. Unset optional fields render as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonOut {
  pub id:         String,
  pub first_name: String,
  pub last_name:  String,
  pub email:      String,
  pub phone:      String,
  pub address:    String,
  pub city:       String,
  pub state:      String,
  pub zip_code:   String,
}

impl From<Person> for PersonOut {
  fn from(p: Person) -> Self {
    Self {
      id:         p.id.to_string(),
      first_name: p.first_name,
      last_name:  p.last_name,
      email:      p.email,
      phone:      p.phone.unwrap_or_default(),
      address:    p.address.unwrap_or_default(),
      city:       p.city.unwrap_or_default(),
      state:      p.state.unwrap_or_default(),
      zip_code:   p.zip_code.unwrap_or_default(),
    }
  }
}
