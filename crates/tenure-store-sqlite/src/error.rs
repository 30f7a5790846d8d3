//! Error type for `tenure-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// The stored blob was written by a newer version of the format.
  #[error("unsupported contracts blob version: {0}")]
  UnsupportedVersion(u32),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
