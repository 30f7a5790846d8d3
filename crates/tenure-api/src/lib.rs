//! JSON REST API for Tenure.
//!
//! Exposes an axum [`Router`] backed by any [`tenure_core::store::ContractStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", tenure_api::api_router(lifecycle, employer))
//! ```

pub mod contracts;
pub mod error;
pub mod search;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tenure_core::{document::Employer, lifecycle::ContractLifecycle, store::ContractStore};

pub use error::ApiError;

/// State shared by every handler.
#[derive(Clone)]
pub struct ApiState<S> {
  pub lifecycle: ContractLifecycle<S>,
  /// Printed in the header of exported documents.
  pub employer:  Arc<Employer>,
}

/// Build a fully-materialised API router over `lifecycle`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(lifecycle: ContractLifecycle<S>, employer: Employer) -> Router<()>
where
  S: ContractStore + Clone + 'static,
{
  let state = ApiState { lifecycle, employer: Arc::new(employer) };

  Router::new()
    // Contracts
    .route("/contracts", get(contracts::list::<S>).post(contracts::create::<S>))
    .route(
      "/contracts/{id}",
      get(contracts::get_one::<S>)
        .patch(contracts::update_one::<S>)
        .delete(contracts::delete_one::<S>),
    )
    .route("/contracts/{id}/renew", post(contracts::renew_one::<S>))
    .route("/contracts/{id}/history", get(contracts::history::<S>))
    .route("/contracts/{id}/document", get(contracts::document::<S>))
    // Queries
    .route("/search", get(search::handler::<S>))
    .route("/stats", get(search::stats_handler::<S>))
    .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use serde_json::{Value, json};
  use tenure_core::memory::MemoryStore;
  use tower::ServiceExt as _;

  fn app() -> (Router, MemoryStore) {
    let store = MemoryStore::new();
    let employer = Employer { name: "ACME Works".into(), address: "Industrial zone".into() };
    (api_router(ContractLifecycle::new(store.clone()), employer), store)
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
  }

  async fn json_body(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
  }

  fn contract_body(card: &str, name: &str, end: &str) -> Value {
    json!({
      "national_card_number": card,
      "full_name": name,
      "birth_date": "1990-03-14",
      "position": "Welder",
      "contract_start": "2024-01-01",
      "contract_end": end,
      "base_salary": 40000.0
    })
  }

  async fn create(app: &Router, card: &str, name: &str, end: &str) -> u64 {
    let resp = send(app, "POST", "/contracts", Some(contract_body(card, name, end))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await["id"].as_u64().unwrap()
  }

  #[tokio::test]
  async fn create_then_get() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;

    let resp = send(&app, "GET", &format!("/contracts/{id}?as_of=2024-06-01"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["contract"]["full_name"], "Amina Bensaid");
    assert_eq!(body["status"], "active");
    assert_eq!(body["expiring_soon"], false);
  }

  #[tokio::test]
  async fn create_missing_fields_is_bad_request() {
    let (app, store) = app();
    let resp = send(&app, "POST", "/contracts", Some(contract_body("X1", " ", "2024-12-31"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert!(body["error"].as_str().unwrap().contains("full_name"));

    use tenure_core::store::ContractStore as _;
    assert!(store.load_all().await.unwrap().contracts.is_empty());
  }

  #[tokio::test]
  async fn renew_flow_over_http() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;

    let resp = send(
      &app,
      "POST",
      &format!("/contracts/{id}/renew"),
      Some(json!({ "contract_start": "2025-01-01", "contract_end": "2025-12-31" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let renewed = json_body(resp).await;
    let renewed_id = renewed["id"].as_u64().unwrap();
    assert_eq!(renewed["renewal_count"], 1);
    assert_eq!(renewed["original_contract_id"], id);
    assert_eq!(renewed["base_salary"], Value::Null);

    // Listing shows only the renewal.
    let list = json_body(send(&app, "GET", "/contracts?as_of=2025-06-01", None).await).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["contract"]["id"], renewed_id);

    // History from the original.
    let history =
      json_body(send(&app, "GET", &format!("/contracts/{id}/history"), None).await).await;
    let ids: Vec<u64> = history
      .as_array()
      .unwrap()
      .iter()
      .map(|c| c["contract"]["id"].as_u64().unwrap())
      .collect();
    assert_eq!(ids, vec![id, renewed_id]);

    // The superseded version is read-only.
    let resp = send(
      &app,
      "PATCH",
      &format!("/contracts/{id}"),
      Some(json!({ "position": "Foreman" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn renew_with_empty_range_is_bad_request() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;
    let resp = send(
      &app,
      "POST",
      &format!("/contracts/{id}/renew"),
      Some(json!({ "contract_start": "2025-01-01", "contract_end": "2025-01-01" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn patch_cannot_blank_required_fields_or_store_negative_salary() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;

    for body in [
      json!({ "full_name": "" }),
      json!({ "position": "   " }),
      json!({ "base_salary": -5.0 }),
    ] {
      let resp = send(&app, "PATCH", &format!("/contracts/{id}"), Some(body)).await;
      assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let stored = json_body(send(&app, "GET", &format!("/contracts/{id}"), None).await).await;
    assert_eq!(stored["contract"]["full_name"], "Amina Bensaid");
    assert_eq!(stored["contract"]["position"], "Welder");
    assert_eq!(stored["contract"]["base_salary"], 40000.0);
  }

  #[tokio::test]
  async fn renew_with_negative_salary_is_bad_request() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;
    let resp = send(
      &app,
      "POST",
      &format!("/contracts/{id}/renew"),
      Some(json!({
        "base_salary": -1.0,
        "contract_start": "2025-01-01",
        "contract_end": "2025-12-31"
      })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // The source is still the live version.
    let source = json_body(send(&app, "GET", &format!("/contracts/{id}"), None).await).await;
    assert_eq!(source["contract"]["is_superseded"], false);
  }

  #[tokio::test]
  async fn delete_unknown_is_not_found() {
    let (app, _) = app();
    let resp = send(&app, "DELETE", "/contracts/404", None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn delete_then_get_is_not_found() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;
    let resp = send(&app, "DELETE", &format!("/contracts/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = send(&app, "GET", &format!("/contracts/{id}"), None).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn status_filter_and_search() {
    let (app, _) = app();
    create(&app, "X1", "Amina Bensaid", "2025-05-01").await;
    create(&app, "Y2", "Bilal Hamdi", "2025-06-15").await;
    create(&app, "Z3", "Chafia Ould", "2026-01-01").await;

    let expired =
      json_body(send(&app, "GET", "/contracts?status=expired&as_of=2025-06-01", None).await).await;
    assert_eq!(expired.as_array().unwrap().len(), 1);
    assert_eq!(expired[0]["contract"]["national_card_number"], "X1");

    let soon = json_body(
      send(&app, "GET", "/contracts?status=expiring_soon&as_of=2025-06-01", None).await,
    )
    .await;
    assert_eq!(soon.as_array().unwrap().len(), 1);
    assert_eq!(soon[0]["contract"]["national_card_number"], "Y2");

    let found = json_body(send(&app, "GET", "/search?q=HAMDI", None).await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    let stats = json_body(send(&app, "GET", "/stats?as_of=2025-06-01", None).await).await;
    assert_eq!(stats["total"], 3);
    assert_eq!(stats["active"], 2);
    assert_eq!(stats["expired"], 1);
    assert_eq!(stats["expiring_soon"], 1);
  }

  #[tokio::test]
  async fn document_is_plain_text_attachment() {
    let (app, _) = app();
    let id = create(&app, "X1", "Amina Bensaid", "2024-12-31").await;

    let resp =
      send(&app, "GET", &format!("/contracts/{id}/document?as_of=2024-02-03"), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
      .headers()
      .get(header::CONTENT_DISPOSITION)
      .unwrap()
      .to_str()
      .unwrap()
      .to_string();
    assert!(disposition.contains("contract_Amina_Bensaid_2024-02-03.txt"));

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.starts_with("ACME Works"));
    assert!(text.contains("Date: 03/02/2024"));
  }

  #[tokio::test]
  async fn storage_failure_is_internal_error() {
    let (app, store) = app();
    store.fail_writes(true);
    let resp = send(&app, "POST", "/contracts", Some(contract_body("X1", "Amina", "2024-12-31"))).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  }
}
