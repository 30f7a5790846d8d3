//! HTTP front end for the Tenure contract register.
//!
//! Mounts the JSON API under `/api` behind Basic auth and exposes an
//! unauthenticated `/healthz` probe.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use serde::Deserialize;
use tenure_core::{document::Employer, lifecycle::ContractLifecycle, store::ContractStore};
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `TENURE_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  #[serde(default)]
  pub employer_name:      String,
  #[serde(default)]
  pub employer_address:   String,
}

impl ServerConfig {
  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }

  pub fn employer(&self) -> Employer {
    Employer {
      name:    self.employer_name.clone(),
      address: self.employer_address.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(lifecycle: ContractLifecycle<S>, config: &ServerConfig) -> Router
where
  S: ContractStore + Clone + 'static,
{
  let auth = Arc::new(config.auth());
  let api = tenure_api::api_router(lifecycle, config.employer())
    .layer(middleware::from_fn_with_state(auth, require_auth));

  Router::new()
    .route("/healthz", get(|| async { "ok" }))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
