//! Handlers for `/contracts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/contracts` | Current contracts; optional `status`, `as_of` |
//! | `POST`   | `/contracts` | Body: [`NewContract`]; returns 201 + stored record |
//! | `GET`    | `/contracts/:id` | Single classified record |
//! | `PATCH`  | `/contracts/:id` | Body: [`ContractPatch`] |
//! | `DELETE` | `/contracts/:id` | 204 |
//! | `POST`   | `/contracts/:id/renew` | Body: [`RenewalTerms`]; returns 201 + new version |
//! | `GET`    | `/contracts/:id/history` | Whole lineage, oldest first |
//! | `GET`    | `/contracts/:id/document` | Plain-text contract document |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{StatusCode, header},
  response::IntoResponse,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tenure_core::{
  contract::{ContractId, ContractPatch, NewContract, RenewalTerms},
  document::{document_filename, render_document},
  query::{ClassifiedContract, StatusFilter, current_contracts, filter_by_status, today},
  store::ContractStore,
};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Restrict to active, expired or expiring-soon contracts.
  pub status: Option<StatusFilter>,
  /// Reference date for classification. Defaults to today.
  pub as_of:  Option<NaiveDate>,
}

/// `GET /contracts[?status=active|expired|expiring_soon][&as_of=YYYY-MM-DD]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<ClassifiedContract>>, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let as_of = params.as_of.unwrap_or_else(today);
  let snapshot = state.lifecycle.snapshot().await?;

  let contracts = match params.status {
    Some(filter) => filter_by_status(&snapshot.contracts, filter, as_of),
    None => current_contracts(&snapshot.contracts),
  };

  Ok(Json(
    contracts
      .into_iter()
      .map(|c| ClassifiedContract::new(c, as_of))
      .collect(),
  ))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /contracts`: returns 201 + the stored record.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewContract>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  body.validate()?;
  let record = state.lifecycle.create(body).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AsOfParams {
  pub as_of: Option<NaiveDate>,
}

/// `GET /contracts/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
  Query(params): Query<AsOfParams>,
) -> Result<Json<ClassifiedContract>, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let as_of = params.as_of.unwrap_or_else(today);
  let record = state.lifecycle.get(id).await?;
  Ok(Json(ClassifiedContract::new(&record, as_of)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /contracts/:id`: superseded versions answer 409.
pub async fn update_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
  Json(patch): Json<ContractPatch>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  patch.validate()?;
  let record = state.lifecycle.update(id, patch).await?;
  Ok(Json(record))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /contracts/:id`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
) -> Result<StatusCode, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  state.lifecycle.delete(id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Renew ────────────────────────────────────────────────────────────────────

/// `POST /contracts/:id/renew`: returns 201 + the new version.
pub async fn renew_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
  Json(terms): Json<RenewalTerms>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  terms.validate()?;
  let record = state.lifecycle.renew(id, terms).await?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /contracts/:id/history`
pub async fn history<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
  Query(params): Query<AsOfParams>,
) -> Result<Json<Vec<ClassifiedContract>>, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let as_of = params.as_of.unwrap_or_else(today);
  let lineage = state.lifecycle.history(id).await?;
  Ok(Json(
    lineage
      .iter()
      .map(|c| ClassifiedContract::new(c, as_of))
      .collect(),
  ))
}

// ─── Document ─────────────────────────────────────────────────────────────────

/// `GET /contracts/:id/document[?as_of=YYYY-MM-DD]`: `as_of` is the issue
/// date printed on the document.
pub async fn document<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ContractId>,
  Query(params): Query<AsOfParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let issued_on = params.as_of.unwrap_or_else(today);
  let record = state.lifecycle.get(id).await?;

  let body = render_document(&record, &state.employer, issued_on);
  let disposition = format!(
    "attachment; filename=\"{}\"",
    document_filename(&record, issued_on)
  );

  Ok((
    [
      (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
      (header::CONTENT_DISPOSITION, disposition),
    ],
    body,
  ))
}
