//! [`MongoRepository`]: the MongoDB implementation of [`PersonRepository`].

use std::time::Duration;

use futures_util::TryStreamExt as _;
use mongodb::{
  Client, Collection, IndexModel,
  bson::{Document, doc, oid::ObjectId},
  options::{ClientOptions, IndexOptions, ReturnDocument},
};
use people_core::{
  Person, PersonCreate, PersonRepository, PersonUpdate, Result,
  repository::require_city_state,
};
use serde::Deserialize;

use crate::{
  document::{
    EMAIL_INDEX, PersonDocument, by_id, city_state_filter, decode_id, insertion_order,
    name_filter,
  },
  error::classify,
};

const COLLECTION: &str = "persons";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the document backend.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
  pub uri:                  String,
  pub database:             String,
  /// Bounds both the initial connect and server selection for every call.
  pub connect_timeout_secs: u64,
}

impl Default for MongoConfig {
  fn default() -> Self {
    Self {
      uri:                  "mongodb://localhost:27017".to_owned(),
      database:             "person_db".to_owned(),
      connect_timeout_secs: 3,
    }
  }
}

// ─── Repository ──────────────────────────────────────────────────────────────

/// A person repository backed by a MongoDB collection.
///
/// Cloning is cheap; the driver's client owns a shared connection pool.
#[derive(Clone)]
pub struct MongoRepository {
  persons: Collection<PersonDocument>,
}

impl MongoRepository {
  /// Connect, verify the server answers, and ensure the unique email index.
  ///
  /// Any failure here is fatal to startup; the handle is not returned until
  /// the database has answered a ping.
  pub async fn connect(config: &MongoConfig) -> Result<Self> {
    let timeout = Duration::from_secs(config.connect_timeout_secs);

    let mut options = ClientOptions::parse(config.uri.as_str())
      .await
      .map_err(|e| classify("connect", e))?;
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);
    tracing::info!(hosts = ?options.hosts, database = %config.database, "connecting to mongodb");

    let client = Client::with_options(options).map_err(|e| classify("connect", e))?;
    let database = client.database(&config.database);
    database
      .run_command(doc! { "ping": 1 })
      .await
      .map_err(|e| classify("ping", e))?;

    let persons = database.collection::<PersonDocument>(COLLECTION);
    let index = IndexModel::builder()
      .keys(doc! { "email": 1 })
      .options(
        IndexOptions::builder()
          .name(EMAIL_INDEX.to_owned())
          .unique(true)
          .build(),
      )
      .build();
    persons
      .create_index(index)
      .await
      .map_err(|e| classify("create_index", e))?;

    tracing::info!(database = %config.database, "mongodb store ready");
    Ok(Self { persons })
  }

  async fn fetch(&self, id: ObjectId) -> Result<Option<PersonDocument>> {
    self
      .persons
      .find_one(by_id(id))
      .await
      .map_err(|e| classify("get", e))
  }

  async fn find_all(&self, op: &'static str, filter: Document) -> Result<Vec<Person>> {
    let docs: Vec<PersonDocument> = self
      .persons
      .find(filter)
      .sort(insertion_order())
      .await
      .map_err(|e| classify(op, e))?
      .try_collect()
      .await
      .map_err(|e| classify(op, e))?;
    Ok(docs.into_iter().map(PersonDocument::into_person).collect())
  }

  /// Drop the whole database. Tests use a fresh database each.
  #[cfg(test)]
  pub(crate) async fn drop_database(&self) -> Result<()> {
    let name = self.persons.namespace().db;
    self
      .persons
      .client()
      .database(&name)
      .drop()
      .await
      .map_err(|e| classify("drop_database", e))
  }
}

// ─── PersonRepository impl ───────────────────────────────────────────────────

impl PersonRepository for MongoRepository {
  async fn create(&self, input: PersonCreate) -> Result<Person> {
    let document = PersonDocument::new(ObjectId::new(), input);
    self
      .persons
      .insert_one(&document)
      .await
      .map_err(|e| classify("create", e))?;

    tracing::debug!(id = %document.id, "person created");
    Ok(document.into_person())
  }

  async fn get(&self, id: &str) -> Result<Option<Person>> {
    let oid = decode_id(id)?;
    Ok(self.fetch(oid).await?.map(PersonDocument::into_person))
  }

  async fn update(&self, id: &str, patch: PersonUpdate) -> Result<Option<Person>> {
    let oid = decode_id(id)?;

    // Read-then-write is not atomic: two concurrent updates to the same person
    // can interleave here and one of the writes is lost.
    let Some(current) = self.fetch(oid).await? else {
      return Ok(None);
    };

    let changes = patch.changes();
    if changes.is_empty() {
      return Ok(Some(current.into_person()));
    }

    let mut set = Document::new();
    for (field, value) in changes {
      set.insert(field.name(), value);
    }

    // `None` when the document was deleted between the read and the write.
    let updated = self
      .persons
      .find_one_and_update(by_id(oid), doc! { "$set": set })
      .return_document(ReturnDocument::After)
      .await
      .map_err(|e| classify("update", e))?;

    if updated.is_some() {
      tracing::debug!(id = %oid, "person updated");
    }
    Ok(updated.map(PersonDocument::into_person))
  }

  async fn delete(&self, id: &str) -> Result<bool> {
    let oid = decode_id(id)?;
    let result = self
      .persons
      .delete_one(by_id(oid))
      .await
      .map_err(|e| classify("delete", e))?;
    Ok(result.deleted_count > 0)
  }

  async fn search_by_name(&self, first_name: &str, last_name: &str) -> Result<Vec<Person>> {
    self
      .find_all("search_by_name", name_filter(first_name, last_name))
      .await
  }

  async fn list_by_city_state(&self, city: &str, state: &str) -> Result<Vec<Person>> {
    require_city_state(city, state)?;
    self
      .find_all("list_by_city_state", city_state_filter(city, state))
      .await
  }
}
