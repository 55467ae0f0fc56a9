//! JSON REST API for the people directory.
//!
//! Exposes an axum [`Router`] backed by any [`PersonRepository`]. Transport,
//! tracing and timeouts are the caller's responsibility.
//!
//! | Method   | Path | Handler |
//! |----------|------|---------|
//! | `POST`   | `/persons`, `/persons/` | [`persons::create`] |
//! | `GET`    | `/persons/search` | [`search::by_name`] |
//! | `GET`    | `/persons/by_city_state` | [`search::by_city_state`] |
//! | `GET`    | `/persons/{person_id}` | [`persons::get_one`] |
//! | `PUT`    | `/persons/{person_id}` | [`persons::update_one`] |
//! | `DELETE` | `/persons/{person_id}` | [`persons::delete_one`] |
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(people_api::api_router(repo.clone()))
//! ```

pub mod error;
pub mod persons;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use people_core::PersonRepository;

pub use error::ApiError;

/// Build a fully-materialised API router for `repo`.
///
/// The static `search` and `by_city_state` segments take precedence over the
/// `{person_id}` capture.
pub fn api_router<R>(repo: Arc<R>) -> Router<()>
where
  R: PersonRepository + 'static,
{
  Router::new()
    .route("/persons", post(persons::create::<R>))
    .route("/persons/", post(persons::create::<R>))
    .route("/persons/search", get(search::by_name::<R>))
    .route("/persons/by_city_state", get(search::by_city_state::<R>))
    .route(
      "/persons/{person_id}",
      get(persons::get_one::<R>)
        .put(persons::update_one::<R>)
        .delete(persons::delete_one::<R>),
    )
    .with_state(repo)
}

// ─── Router tests ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
  };
  use people_core::{Error, Person, PersonCreate, PersonUpdate, Result};
  use people_store_sqlite::SqliteRepository;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app() -> Router {
    let repo = SqliteRepository::open_in_memory().await.unwrap();
    api_router(Arc::new(repo))
  }

  async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn john() -> Value {
    json!({
      "first_name": "John",
      "last_name":  "Smith",
      "email":      "john@example.com",
      "city":       "Springfield",
      "state":      "IL",
    })
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_flat_record() {
    let app = app().await;
    let (status, body) = call(&app, "POST", "/persons", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "1");
    assert_eq!(body["first_name"], "John");
    assert_eq!(body["city"], "Springfield");
    assert_eq!(body["phone"], "");
    assert_eq!(body["zip_code"], "");
  }

  #[tokio::test]
  async fn create_accepts_trailing_slash() {
    let app = app().await;
    let (status, _) = call(&app, "POST", "/persons/", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
  }

  #[tokio::test]
  async fn create_duplicate_email_is_409() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let (status, body) = call(&app, "POST", "/persons", Some(john())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already exists");
  }

  #[tokio::test]
  async fn create_missing_required_field_is_400() {
    let app = app().await;
    let body = json!({ "first_name": "John", "email": "john@example.com" });
    let (status, body) = call(&app, "POST", "/persons", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));
  }

  #[tokio::test]
  async fn create_malformed_email_is_400() {
    let app = app().await;
    let mut body = john();
    body["email"] = json!("not-an-email");
    let (status, _) = call(&app, "POST", "/persons", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn create_malformed_json_is_400() {
    let app = app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/persons")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Get / update / delete ───────────────────────────────────────────────────

  #[tokio::test]
  async fn get_by_id() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let (status, body) = call(&app, "GET", "/persons/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "john@example.com");
  }

  #[tokio::test]
  async fn get_unknown_id_is_404() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/persons/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Person not found");
  }

  #[tokio::test]
  async fn get_malformed_id_is_400() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/persons/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid ID format");
  }

  #[tokio::test]
  async fn update_merges_and_ignores_empty_fields() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let patch = json!({ "phone": "555-0100", "city": "", "first_name": "Johnny" });
    let (status, body) = call(&app, "PUT", "/persons/1", Some(patch)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Johnny");
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["city"], "Springfield");
    assert_eq!(body["last_name"], "Smith");
  }

  #[tokio::test]
  async fn update_with_empty_body_returns_current() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let (status, body) = call(&app, "PUT", "/persons/1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "John");
  }

  #[tokio::test]
  async fn update_with_blank_name_is_400() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let patch = json!({ "last_name": "   " });
    let (status, body) = call(&app, "PUT", "/persons/1", Some(patch)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid input"));

    let (_, body) = call(&app, "GET", "/persons/1", None).await;
    assert_eq!(body["last_name"], "Smith");
  }

  #[tokio::test]
  async fn update_to_taken_email_is_409() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let mut jane = john();
    jane["email"] = json!("jane@example.com");
    call(&app, "POST", "/persons", Some(jane)).await;

    let patch = json!({ "email": "john@example.com" });
    let (status, _) = call(&app, "PUT", "/persons/2", Some(patch)).await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn update_unknown_id_is_404() {
    let app = app().await;
    let patch = json!({ "phone": "555-0100" });
    let (status, _) = call(&app, "PUT", "/persons/7", Some(patch)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;

    let (status, body) = call(&app, "DELETE", "/persons/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = call(&app, "DELETE", "/persons/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Person not found or already deleted");

    let (status, _) = call(&app, "GET", "/persons/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Queries ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn search_by_fragment() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let mut mark = john();
    mark["first_name"] = json!("Mark");
    mark["last_name"] = json!("Jones");
    mark["email"] = json!("mark@example.com");
    call(&app, "POST", "/persons", Some(mark)).await;

    let (status, body) = call(&app, "GET", "/persons/search?first_name=JO", None).await;
    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["first_name"], "John");

    let (_, body) = call(&app, "GET", "/persons/search", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
  }

  #[tokio::test]
  async fn search_is_not_captured_as_id() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/persons/search?last_name=x", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn by_city_state_matches_ignoring_case() {
    let app = app().await;
    call(&app, "POST", "/persons", Some(john())).await;
    let (status, body) =
      call(&app, "GET", "/persons/by_city_state?city=springfield&state=il", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn by_city_state_without_state_is_400() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/persons/by_city_state?city=Springfield", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City and state query parameters are required");
  }

  // ── Backend failure ─────────────────────────────────────────────────────────

  /// Every call fails as if the database were unreachable.
  struct FailingRepository;

  fn down() -> Error {
    Error::backend(std::io::Error::new(
      std::io::ErrorKind::ConnectionRefused,
      "secret host db.internal:5432 unreachable",
    ))
  }

  impl PersonRepository for FailingRepository {
    async fn create(&self, _input: PersonCreate) -> Result<Person> { Err(down()) }

    async fn get(&self, _id: &str) -> Result<Option<Person>> { Err(down()) }

    async fn update(&self, _id: &str, _patch: PersonUpdate) -> Result<Option<Person>> {
      Err(down())
    }

    async fn delete(&self, _id: &str) -> Result<bool> { Err(down()) }

    async fn search_by_name(&self, _first: &str, _last: &str) -> Result<Vec<Person>> {
      Err(down())
    }

    async fn list_by_city_state(&self, _city: &str, _state: &str) -> Result<Vec<Person>> {
      Err(down())
    }
  }

  #[tokio::test]
  async fn backend_failure_is_opaque_500() {
    let app = api_router(Arc::new(FailingRepository));

    let (status, body) = call(&app, "POST", "/persons", Some(john())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to create person");

    let (status, body) = call(&app, "GET", "/persons/1", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.to_string().contains("db.internal"));
  }
}
