//! people-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) and `PEOPLE_*`
//! environment variables, connects the configured backend, and serves the
//! JSON API over HTTP until Ctrl-C.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use people_core::PersonRepository;
use people_server::{Backend, ServerConfig};
use people_store_mongo::MongoRepository;
use people_store_sqlite::SqliteRepository;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "People directory HTTP server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  match config.backend {
    Backend::Sqlite => {
      let repo = SqliteRepository::open(&config.sqlite)
        .await
        .with_context(|| format!("failed to open sqlite store at {:?}", config.sqlite.path))?;
      serve(repo, &config).await
    }
    Backend::Mongo => {
      let repo = MongoRepository::connect(&config.mongo)
        .await
        .with_context(|| format!("failed to connect to mongodb at {}", config.mongo.uri))?;
      serve(repo, &config).await
    }
  }
}

async fn serve<R>(repo: R, config: &ServerConfig) -> anyhow::Result<()>
where
  R: PersonRepository + 'static,
{
  let app = people_server::app(Arc::new(repo), config);
  let address = config.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!(backend = ?config.backend, "Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "cannot listen for Ctrl-C; running until killed");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutdown requested");
}
