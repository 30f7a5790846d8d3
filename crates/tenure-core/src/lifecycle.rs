//! Business operations on contracts: create, update, delete and renew.
//!
//! Each mutation loads the full snapshot, edits it in memory and commits it
//! with one `save_all`. A failed write therefore leaves the stored collection
//! exactly as it was, including the two-record change made by a renewal.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::{
  Error, Result,
  contract::{
    ContractId, ContractPatch, ContractRecord, NewContract, RenewalTerms,
    check_date_range,
  },
  lineage::history_of,
  store::{ContractStore, Snapshot},
};

/// Lineage-preserving operations over an injected [`ContractStore`].
///
/// Cloning is cheap; clones share the store and the write lock.
#[derive(Clone)]
pub struct ContractLifecycle<S> {
  store:      S,
  /// Serialises read-modify-write cycles within this process.
  write_lock: Arc<Mutex<()>>,
}

impl<S: ContractStore> ContractLifecycle<S> {
  pub fn new(store: S) -> Self {
    Self { store, write_lock: Arc::new(Mutex::new(())) }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Load the current snapshot.
  pub async fn snapshot(&self) -> Result<Snapshot> {
    self.store.load_all().await.map_err(Error::storage)
  }

  async fn commit(&self, snapshot: &Snapshot) -> Result<()> {
    self.store.save_all(snapshot).await.map_err(Error::storage)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get(&self, id: ContractId) -> Result<ContractRecord> {
    self.snapshot().await?.get(id).cloned().ok_or(Error::NotFound(id))
  }

  /// The full lineage of `id`, oldest first.
  pub async fn history(&self, id: ContractId) -> Result<Vec<ContractRecord>> {
    let snapshot = self.snapshot().await?;
    let record = snapshot.get(id).ok_or(Error::NotFound(id))?;
    Ok(history_of(record, &snapshot.contracts).into_iter().cloned().collect())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// Persist a new original contract.
  pub async fn create(&self, input: NewContract) -> Result<ContractRecord> {
    check_date_range(input.contract_start, input.contract_end)?;

    let _guard = self.write_lock.lock().await;
    let mut snapshot = self.snapshot().await?;

    let id = snapshot.allocate_id().map_err(Error::storage)?;
    let record = input.into_record(id);
    snapshot.contracts.push(record.clone());
    self.commit(&snapshot).await?;

    info!(contract_id = %record.id, card = %record.national_card_number, "created contract");
    Ok(record)
  }

  /// Merge `patch` into a live record. Lineage markers are preserved.
  pub async fn update(&self, id: ContractId, patch: ContractPatch) -> Result<ContractRecord> {
    let _guard = self.write_lock.lock().await;
    let mut snapshot = self.snapshot().await?;

    let record = snapshot.get_mut(id).ok_or(Error::NotFound(id))?;
    if record.is_superseded {
      return Err(Error::Superseded(id));
    }

    let mut updated = record.clone();
    patch.apply_to(&mut updated);
    check_date_range(updated.contract_start, updated.contract_end)?;
    *record = updated.clone();

    self.commit(&snapshot).await?;
    info!(contract_id = %id, "updated contract");
    Ok(updated)
  }

  /// Remove exactly `id`. Other members of its lineage are left in place.
  pub async fn delete(&self, id: ContractId) -> Result<()> {
    let _guard = self.write_lock.lock().await;
    let mut snapshot = self.snapshot().await?;

    let removed = snapshot.remove(id).ok_or(Error::NotFound(id))?;
    self.commit(&snapshot).await?;

    info!(
      contract_id = %id,
      lineage = %removed.lineage_root(),
      was_superseded = removed.is_superseded,
      "deleted contract"
    );
    Ok(())
  }

  /// Renew `id` into a new version and mark `id` as superseded.
  ///
  /// Personal and employment fields are copied from the source; dates and
  /// salary come from `terms`. Both the new record and the supersede flag are
  /// committed in the same write.
  pub async fn renew(&self, id: ContractId, terms: RenewalTerms) -> Result<ContractRecord> {
    let _guard = self.write_lock.lock().await;
    let mut snapshot = self.snapshot().await?;

    let source = snapshot.get_mut(id).ok_or(Error::NotFound(id))?;
    check_date_range(terms.contract_start, terms.contract_end)?;
    if source.is_superseded {
      return Err(Error::Superseded(id));
    }
    source.is_superseded = true;
    let source = source.clone();

    let renewed = ContractRecord {
      id: snapshot.allocate_id().map_err(Error::storage)?,
      contract_start: terms.contract_start,
      contract_end: terms.contract_end,
      base_salary: terms.base_salary,
      renewal_count: source.renewal_count + 1,
      original_contract_id: Some(source.lineage_root()),
      is_renewal: true,
      is_superseded: false,
      ..source
    };
    snapshot.contracts.push(renewed.clone());

    debug!(source = %id, renewed = %renewed.id, "staged renewal");
    self.commit(&snapshot).await?;

    info!(
      contract_id = %renewed.id,
      superseded = %id,
      renewal_count = renewed.renewal_count,
      "renewed contract"
    );
    Ok(renewed)
  }
}
