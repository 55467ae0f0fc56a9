//! HTTP server assembly for the people directory.
//!
//! Holds the runtime configuration, the health and root routes, and the
//! middleware stack wrapped around [`people_api::api_router`]. The binary in
//! `main.rs` picks a backend and hands the repository to [`app`].

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
  Json, Router,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
  routing::get,
};
use people_core::PersonRepository;
use people_store_mongo::MongoConfig;
use people_store_sqlite::SqliteConfig;
use serde::{Deserialize, Serialize};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which storage engine serves requests. Resolved once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Mongo,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `PEOPLE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                 String,
  pub port:                 u16,
  pub backend:              Backend,
  /// Deadline for a whole request, storage calls included.
  pub request_timeout_secs: u64,
  pub sqlite:               SqliteConfig,
  pub mongo:                MongoConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                 "0.0.0.0".to_owned(),
      port:                 8080,
      backend:              Backend::default(),
      request_timeout_secs: 10,
      sqlite:               SqliteConfig::default(),
      mongo:                MongoConfig::default(),
    }
  }
}

impl ServerConfig {
  /// Layer the optional TOML file at `path` and the environment over the
  /// built-in defaults.
  ///
  /// Nested keys use `__` in the environment, e.g. `PEOPLE_SQLITE__PATH`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("PEOPLE")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Health ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
struct Health {
  status:      &'static str,
  backend:     Backend,
  mongo_db:    String,
  sqlite_path: String,
}

impl From<&ServerConfig> for Health {
  fn from(config: &ServerConfig) -> Self {
    Self {
      status:      "ok",
      backend:     config.backend,
      mongo_db:    config.mongo.database.clone(),
      sqlite_path: config.sqlite.path.display().to_string(),
    }
  }
}

/// `GET /health`
async fn health(State(report): State<Arc<Health>>) -> Json<Health> {
  Json(report.as_ref().clone())
}

/// `GET /` redirects to the health report.
async fn root() -> impl IntoResponse {
  (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/health")])
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: API routes, health, and middleware.
pub fn app<R>(repo: Arc<R>, config: &ServerConfig) -> Router
where
  R: PersonRepository + 'static,
{
  let report = Arc::new(Health::from(config));
  let timeout = Duration::from_secs(config.request_timeout_secs);

  Router::new()
    .route("/", get(root))
    .route("/health", get(health))
    .with_state(report)
    .merge(people_api::api_router(repo))
    .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
