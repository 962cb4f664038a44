//! HTTP front door for Muster.
//!
//! Wraps the JSON API from `muster-api` with the service-level endpoints
//! (`/` and `/health`) and request tracing. The `muster` binary in
//! `main.rs` loads a [`ServerConfig`] and serves [`app`].

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, routing::get};
use muster_core::store::MusterStore;
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `muster.toml` and
/// `MUSTER_*` environment variables.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       8000,
      store_path: PathBuf::from("muster.db"),
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then apply `MUSTER_*` overrides.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MUSTER"))
      .build()?
      .try_deserialize()
  }

  /// `host:port`, suitable for `TcpListener::bind`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// The store path with a leading `~/` expanded to `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application: service endpoints plus the API under
/// `/api`, with every request traced.
pub fn app<S>(store: Arc<S>) -> Router
where
  S: MusterStore + Send + Sync + 'static,
{
  Router::new()
    .route("/", get(root))
    .route("/health", get(health))
    .nest("/api", muster_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> {
  Json(json!({
    "message": "Welcome to the Muster API",
    "docs":    "/api",
    "version": env!("CARGO_PKG_VERSION"),
  }))
}

async fn health() -> Json<Value> { Json(json!({ "status": "healthy" })) }
