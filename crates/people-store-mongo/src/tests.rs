//! Integration tests for `MongoRepository`.
//!
//! These need a live server and only run when `PEOPLE_TEST_MONGO_URI` is set,
//! e.g. `PEOPLE_TEST_MONGO_URI=mongodb://localhost:27017`. Each test works in
//! its own freshly named database and drops it afterwards.

use std::future::Future;

use people_core::{PersonCreate, PersonId, PersonRepository, conformance};
use uuid::Uuid;

use crate::{MongoConfig, MongoRepository};

const URI_VAR: &str = "PEOPLE_TEST_MONGO_URI";

/// Well formed, never assigned.
const MISSING_ID: &str = "ffffffffffffffffffffffff";

async fn with_repo<F, Fut>(test: F)
where
  F: FnOnce(MongoRepository) -> Fut,
  Fut: Future<Output = ()>,
{
  let Ok(uri) = std::env::var(URI_VAR) else {
    eprintln!("{URI_VAR} not set; skipping mongodb test");
    return;
  };
  let config = MongoConfig {
    uri,
    database: format!("people_test_{}", Uuid::new_v4().simple()),
    ..MongoConfig::default()
  };
  let repo = MongoRepository::connect(&config).await.expect("connect");
  test(repo.clone()).await;
  repo.drop_database().await.expect("drop test database");
}

// ─── Shared contract ─────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_round_trips() {
  with_repo(|r| async move { conformance::create_then_get_round_trips(&r).await }).await;
}

#[tokio::test]
async fn create_without_optionals_stores_none() {
  with_repo(|r| async move { conformance::create_without_optionals_stores_none(&r).await }).await;
}

#[tokio::test]
async fn ids_are_distinct() {
  with_repo(|r| async move { conformance::ids_are_distinct(&r).await }).await;
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  with_repo(|r| async move { conformance::duplicate_email_is_rejected(&r).await }).await;
}

#[tokio::test]
async fn update_to_taken_email_is_rejected() {
  with_repo(|r| async move { conformance::update_to_taken_email_is_rejected(&r).await }).await;
}

#[tokio::test]
async fn invalid_identifier_is_rejected() {
  with_repo(|r| async move { conformance::invalid_identifier_is_rejected(&r).await }).await;
}

#[tokio::test]
async fn missing_identifier_is_not_found() {
  with_repo(|r| async move {
    conformance::missing_identifier_is_not_found(&r, MISSING_ID).await
  })
  .await;
}

#[tokio::test]
async fn update_merges_present_fields() {
  with_repo(|r| async move { conformance::update_merges_present_fields(&r).await }).await;
}

#[tokio::test]
async fn empty_patch_field_is_noop() {
  with_repo(|r| async move { conformance::empty_patch_field_is_noop(&r).await }).await;
}

#[tokio::test]
async fn update_may_keep_own_email() {
  with_repo(|r| async move { conformance::update_may_keep_own_email(&r).await }).await;
}

#[tokio::test]
async fn delete_removes_record() {
  with_repo(|r| async move { conformance::delete_removes_record(&r).await }).await;
}

#[tokio::test]
async fn search_by_first_name_fragment() {
  with_repo(|r| async move { conformance::search_by_first_name_fragment(&r).await }).await;
}

#[tokio::test]
async fn search_by_last_name_fragment() {
  with_repo(|r| async move { conformance::search_by_last_name_fragment(&r).await }).await;
}

#[tokio::test]
async fn search_with_blank_fragments_returns_all() {
  with_repo(|r| async move { conformance::search_with_blank_fragments_returns_all(&r).await })
    .await;
}

#[tokio::test]
async fn search_fragments_match_literally() {
  with_repo(|r| async move { conformance::search_fragments_match_literally(&r).await }).await;
}

#[tokio::test]
async fn list_by_city_state_requires_both() {
  with_repo(|r| async move { conformance::list_by_city_state_requires_both(&r).await }).await;
}

#[tokio::test]
async fn list_by_city_state_matches_exactly() {
  with_repo(|r| async move { conformance::list_by_city_state_matches_exactly(&r).await }).await;
}

#[tokio::test]
async fn matching_folds_non_ascii() {
  with_repo(|r| async move { conformance::matching_folds_non_ascii(&r).await }).await;
}

// ─── MongoDB specifics ───────────────────────────────────────────────────────

#[tokio::test]
async fn ids_are_lowercase_object_id_hex() {
  with_repo(|r| async move {
    let p = r
      .create(PersonCreate::new("John", "Smith", "john@example.com"))
      .await
      .unwrap();
    assert!(matches!(p.id, PersonId::Document(_)));

    let rendered = p.id.to_string();
    assert_eq!(rendered.len(), 24);
    assert!(rendered.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
  })
  .await;
}

#[tokio::test]
async fn connect_is_idempotent_on_existing_index() {
  let Ok(uri) = std::env::var(URI_VAR) else {
    eprintln!("{URI_VAR} not set; skipping mongodb test");
    return;
  };
  let config = MongoConfig {
    uri,
    database: format!("people_test_{}", Uuid::new_v4().simple()),
    ..MongoConfig::default()
  };
  let first = MongoRepository::connect(&config).await.expect("first connect");
  let second = MongoRepository::connect(&config).await.expect("second connect");
  second.drop_database().await.expect("drop");
  drop(first);
}
