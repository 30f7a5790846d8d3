//! [`SqliteStore`], the SQLite implementation of [`ContractStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use tenure_core::store::{ContractStore, Snapshot};

use crate::{
  Result,
  encode::{decode_snapshot, encode_dt, encode_snapshot},
  schema::{CONTRACTS_KEY, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contract store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// The raw JSON document currently stored, if any.
  pub async fn raw_blob(&self) -> Result<Option<String>> {
    let raw = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM blobs WHERE key = ?1",
              rusqlite::params![CONTRACTS_KEY],
              |row| row.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }

  /// Overwrite the stored JSON document verbatim.
  pub async fn put_raw_blob(&self, value: String) -> Result<()> {
    let at_str = encode_dt(Utc::now());
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO blobs (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET
             value      = excluded.value,
             updated_at = excluded.updated_at",
          rusqlite::params![CONTRACTS_KEY, value, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ContractStore impl ──────────────────────────────────────────────────────

impl ContractStore for SqliteStore {
  type Error = crate::Error;

  async fn load_all(&self) -> Result<Snapshot> {
    match self.raw_blob().await? {
      Some(raw) => decode_snapshot(&raw),
      None => Ok(Snapshot::default()),
    }
  }

  async fn save_all(&self, snapshot: &Snapshot) -> Result<()> {
    let encoded = encode_snapshot(snapshot)?;
    debug!(
      contracts = snapshot.contracts.len(),
      bytes = encoded.len(),
      "saving contracts blob"
    );
    self.put_raw_blob(encoded).await
  }
}
