//! Handlers for `GET /search` and `GET /stats`.

use axum::{
  Json,
  extract::{Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tenure_core::{
  query::{ClassifiedContract, ContractStats, search, stats, today},
  store::ContractStore,
};

use crate::{ApiState, error::ApiError};

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Matched case-insensitively against name, position and card number.
  #[serde(default)]
  pub q:     String,
  pub as_of: Option<NaiveDate>,
}

/// `GET /search?q=<term>[&as_of=YYYY-MM-DD]`
pub async fn handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<ClassifiedContract>>, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let as_of = params.as_of.unwrap_or_else(today);
  let snapshot = state.lifecycle.snapshot().await?;

  Ok(Json(
    search(&snapshot.contracts, &params.q)
      .into_iter()
      .map(|c| ClassifiedContract::new(c, as_of))
      .collect(),
  ))
}

#[derive(Debug, Deserialize, Default)]
pub struct StatsParams {
  pub as_of: Option<NaiveDate>,
}

/// `GET /stats[?as_of=YYYY-MM-DD]`
pub async fn stats_handler<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<StatsParams>,
) -> Result<Json<ContractStats>, ApiError>
where
  S: ContractStore + Clone + 'static,
{
  let as_of = params.as_of.unwrap_or_else(today);
  let snapshot = state.lifecycle.snapshot().await?;
  Ok(Json(stats(&snapshot.contracts, as_of)))
}
