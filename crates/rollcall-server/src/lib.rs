//! HTTP server wiring for Rollcall.
//!
//! Mounts the JSON API under `/api`, adds a `/health` probe and request
//! tracing, and provides the HTTP forecast client.

pub mod error;
pub mod forecast;

pub use error::Error;

use std::{path::PathBuf, time::Duration};

use axum::{Json, Router, routing::get};
use rollcall_api::{ApiState, api_router};
use rollcall_core::{risk::RiskSource, store::AttendanceStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ROLLCALL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                  String,
  #[serde(default = "default_port")]
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// `GET` endpoint of the forecast service. Unset disables risk scores.
  #[serde(default)]
  pub forecast_url:          Option<String>,
  #[serde(default = "default_forecast_timeout")]
  pub forecast_timeout_secs: u64,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_forecast_timeout() -> u64 { 5 }

impl ServerConfig {
  pub fn forecast_timeout(&self) -> Duration {
    Duration::from_secs(self.forecast_timeout_secs)
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn app<S, R>(state: ApiState<S, R>) -> Router
where
  S: AttendanceStore + 'static,
  R: RiskSource + 'static,
{
  Router::new()
    .route("/health", get(health))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────
