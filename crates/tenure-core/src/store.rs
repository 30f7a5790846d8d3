//! The `ContractStore` trait and the snapshot it persists.
//!
//! The trait is implemented by storage backends (e.g. `tenure-store-sqlite`).
//! Backends never interpret the records: they load and save the whole
//! collection as one unit, so a single successful `save_all` is the only way
//! the durable state ever changes.

use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contract::{ContractId, ContractRecord};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Every `u64` id has been handed out.
#[derive(Debug, Error)]
#[error("contract id space exhausted")]
pub struct IdSpaceExhausted;

/// The complete durable state: every contract version plus the id
/// high-water mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  /// Next id to hand out. Never decreases, so ids of deleted records are not
  /// reused.
  pub next_id:   u64,
  pub contracts: Vec<ContractRecord>,
}

impl Default for Snapshot {
  fn default() -> Self {
    Self { next_id: 1, contracts: Vec::new() }
  }
}

impl Snapshot {
  /// Build a snapshot from records that carry no high-water mark.
  pub fn from_records(contracts: Vec<ContractRecord>) -> Self {
    let next_id = contracts
      .iter()
      .map(|c| c.id.0.saturating_add(1))
      .max()
      .unwrap_or(1);
    Self { next_id, contracts }
  }

  pub fn get(&self, id: ContractId) -> Option<&ContractRecord> {
    self.contracts.iter().find(|c| c.id == id)
  }

  pub fn get_mut(&mut self, id: ContractId) -> Option<&mut ContractRecord> {
    self.contracts.iter_mut().find(|c| c.id == id)
  }

  /// Allocate a fresh id, strictly greater than every id in the snapshot.
  pub fn allocate_id(&mut self) -> Result<ContractId, IdSpaceExhausted> {
    let mut floor = 1;
    for c in &self.contracts {
      floor = floor.max(c.id.0.checked_add(1).ok_or(IdSpaceExhausted)?);
    }
    let id = self.next_id.max(floor);
    self.next_id = id.checked_add(1).ok_or(IdSpaceExhausted)?;
    Ok(ContractId(id))
  }

  /// Remove the record with `id`, returning it if it existed.
  pub fn remove(&mut self, id: ContractId) -> Option<ContractRecord> {
    let index = self.contracts.iter().position(|c| c.id == id)?;
    Some(self.contracts.remove(index))
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the durable medium holding the contract collection.
///
/// Implementations must make `save_all` all-or-nothing: after an error the
/// previously saved snapshot is still the one `load_all` returns.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ContractStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the whole collection. An empty medium yields
  /// [`Snapshot::default`].
  fn load_all(
    &self,
  ) -> impl Future<Output = Result<Snapshot, Self::Error>> + Send + '_;

  /// Replace the whole collection with `snapshot`.
  fn save_all<'a>(
    &'a self,
    snapshot: &'a Snapshot,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn allocate_id_is_monotonic_across_removals() {
    let mut snapshot = Snapshot::default();
    assert_eq!(snapshot.allocate_id().unwrap(), ContractId(1));
    assert_eq!(snapshot.allocate_id().unwrap(), ContractId(2));

    // Nothing stored, but the high-water mark still advances.
    assert!(snapshot.remove(ContractId(2)).is_none());
    assert_eq!(snapshot.allocate_id().unwrap(), ContractId(3));
  }

  #[test]
  fn from_records_derives_high_water_mark() {
    let snapshot = Snapshot::from_records(Vec::new());
    assert_eq!(snapshot.next_id, 1);
  }

  #[test]
  fn exhausted_id_space_is_an_error_not_a_panic() {
    let mut record: ContractRecord = serde_json::from_str(
      r#"{
        "id": 18446744073709551615,
        "national_card_number": "X1",
        "full_name": "Amina Bensaid",
        "birth_date": "1990-03-14",
        "position": "Welder",
        "contract_start": "2024-01-01",
        "contract_end": "2024-12-31"
      }"#,
    )
    .unwrap();
    assert_eq!(record.id, ContractId(u64::MAX));

    let mut snapshot = Snapshot::from_records(vec![record.clone()]);
    assert_eq!(snapshot.next_id, u64::MAX);
    assert!(snapshot.allocate_id().is_err());

    record.id = ContractId(u64::MAX - 2);
    let mut snapshot = Snapshot::from_records(vec![record]);
    assert_eq!(snapshot.allocate_id().unwrap(), ContractId(u64::MAX - 1));
  }
}
