//! Handlers for `/persons` CRUD endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/persons` | Body: [`PersonCreate`]; returns 201 + [`PersonOut`] |
//! | `GET`    | `/persons/{person_id}` | 404 if not found |
//! | `PUT`    | `/persons/{person_id}` | Body: [`PersonUpdate`]; empty fields are left unchanged |
//! | `DELETE` | `/persons/{person_id}` | Returns `{"ok":true}` |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use people_core::{PersonCreate, PersonOut, PersonRepository, PersonUpdate};
use serde_json::{Value, json};

use crate::error::ApiError;

fn bad_body(rejection: JsonRejection) -> ApiError {
  ApiError::BadRequest(format!("Invalid input: {}", rejection.body_text()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /persons`
pub async fn create<R>(
  State(repo): State<Arc<R>>,
  body: Result<Json<PersonCreate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  R: PersonRepository,
{
  let Json(input) = body.map_err(bad_body)?;
  input.validate()?;

  let person = repo
    .create(input)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to create person"))?;
  Ok((StatusCode::CREATED, Json(PersonOut::from(person))))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /persons/{person_id}`
pub async fn get_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
) -> Result<Json<PersonOut>, ApiError>
where
  R: PersonRepository,
{
  let person = repo
    .get(&id)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to retrieve person"))?
    .ok_or_else(|| ApiError::NotFound("Person not found".into()))?;
  Ok(Json(person.into()))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /persons/{person_id}`
pub async fn update_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
  body: Result<Json<PersonUpdate>, JsonRejection>,
) -> Result<Json<PersonOut>, ApiError>
where
  R: PersonRepository,
{
  let Json(patch) = body.map_err(bad_body)?;
  patch.validate()?;

  let person = repo
    .update(&id, patch)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to update person"))?
    .ok_or_else(|| ApiError::NotFound("Person not found".into()))?;
  Ok(Json(person.into()))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /persons/{person_id}`
pub async fn delete_one<R>(
  State(repo): State<Arc<R>>,
  Path(id): Path<String>,
) -> Result<Json<Value>, ApiError>
where
  R: PersonRepository,
{
  let removed = repo
    .delete(&id)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to delete person"))?;
  if !removed {
    return Err(ApiError::NotFound("Person not found or already deleted".into()));
  }
  Ok(Json(json!({ "ok": true })))
}
