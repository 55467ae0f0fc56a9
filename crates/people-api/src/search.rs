//! Handlers for the read-only query endpoints.
//!
//! Missing query parameters are passed to the repository as empty strings;
//! the repository decides whether that means "unconstrained" (name search) or
//! a missing-parameter error (city/state listing).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use people_core::{PersonOut, PersonRepository};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct NameParams {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
}

/// `GET /persons/search[?first_name=...][&last_name=...]`
///
/// Case-insensitive substring match; with neither parameter every person is
/// returned.
pub async fn by_name<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<NameParams>,
) -> Result<Json<Vec<PersonOut>>, ApiError>
where
  R: PersonRepository,
{
  let first = params.first_name.unwrap_or_default();
  let last = params.last_name.unwrap_or_default();

  let persons = repo
    .search_by_name(&first, &last)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to search persons"))?;
  Ok(Json(persons.into_iter().map(PersonOut::from).collect()))
}

#[derive(Debug, Deserialize, Default)]
pub struct CityStateParams {
  pub city:  Option<String>,
  pub state: Option<String>,
}

/// `GET /persons/by_city_state?city=...&state=...`
pub async fn by_city_state<R>(
  State(repo): State<Arc<R>>,
  Query(params): Query<CityStateParams>,
) -> Result<Json<Vec<PersonOut>>, ApiError>
where
  R: PersonRepository,
{
  let city = params.city.unwrap_or_default();
  let state = params.state.unwrap_or_default();

  let persons = repo
    .list_by_city_state(&city, &state)
    .await
    .map_err(|e| ApiError::from_repo(e, "Failed to list persons by city and state"))?;
  Ok(Json(persons.into_iter().map(PersonOut::from).collect()))
}
