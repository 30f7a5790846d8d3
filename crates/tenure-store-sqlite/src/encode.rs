//! Encoding and decoding of the contracts blob.
//!
//! Current layout: `{"version": 1, "next_id": N, "contracts": [...]}`.
//! A bare JSON array of records (the unversioned layout, with its own field
//! names; see the aliases on [`ContractRecord`]) is still accepted on read.
//! Its high-water mark is derived from the largest id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tenure_core::{contract::ContractRecord, store::Snapshot};

use crate::{Error, Result};

/// Format version written by this crate.
pub const BLOB_VERSION: u32 = 1;

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Blob ────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BlobRef<'a> {
  version:   u32,
  next_id:   u64,
  contracts: &'a [ContractRecord],
}

#[derive(Deserialize)]
struct Blob {
  version:   u32,
  #[serde(default)]
  next_id:   Option<u64>,
  #[serde(default)]
  contracts: Vec<ContractRecord>,
}

pub fn encode_snapshot(snapshot: &Snapshot) -> Result<String> {
  Ok(serde_json::to_string(&BlobRef {
    version:   BLOB_VERSION,
    next_id:   snapshot.next_id,
    contracts: &snapshot.contracts,
  })?)
}

pub fn decode_snapshot(s: &str) -> Result<Snapshot> {
  let value: serde_json::Value = serde_json::from_str(s)?;

  if value.is_array() {
    let contracts: Vec<ContractRecord> = serde_json::from_value(value)?;
    return Ok(Snapshot::from_records(contracts));
  }

  let blob: Blob = serde_json::from_value(value)?;
  if blob.version > BLOB_VERSION {
    return Err(Error::UnsupportedVersion(blob.version));
  }

  let mut snapshot = Snapshot::from_records(blob.contracts);
  if let Some(next_id) = blob.next_id {
    snapshot.next_id = snapshot.next_id.max(next_id);
  }
  Ok(snapshot)
}
