//! Error types for `tenure-core`.

use chrono::NaiveDate;
use thiserror::Error;

use crate::contract::ContractId;

#[derive(Debug, Error)]
pub enum Error {
  #[error("contract not found: {0}")]
  NotFound(ContractId),

  #[error("contract end {end} must be after contract start {start}")]
  InvalidDateRange { start: NaiveDate, end: NaiveDate },

  #[error("validation error: {0}")]
  Validation(String),

  /// The record already has a successor and is read-only history.
  #[error("contract {0} is superseded")]
  Superseded(ContractId),

  #[error("storage unavailable: {0}")]
  StorageUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error as [`Error::StorageUnavailable`].
  pub fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageUnavailable(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
