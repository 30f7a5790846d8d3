//! In-memory [`ContractStore`] used as a test double and for throwaway
//! sessions.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::store::{ContractStore, Snapshot};

#[derive(Debug, Error)]
#[error("in-memory store rejected the write")]
pub struct WriteRejected;

/// A [`ContractStore`] holding its snapshot behind a mutex.
///
/// Cloning is cheap and clones share state. Writes can be made to fail with
/// [`MemoryStore::fail_writes`] to exercise error paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
  snapshot:    Arc<Mutex<Snapshot>>,
  fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Start from an existing snapshot.
  pub fn with_snapshot(snapshot: Snapshot) -> Self {
    Self {
      snapshot:    Arc::new(Mutex::new(snapshot)),
      fail_writes: Arc::default(),
    }
  }

  /// Make every subsequent `save_all` fail (or succeed again).
  pub fn fail_writes(&self, fail: bool) {
    self.fail_writes.store(fail, Ordering::SeqCst);
  }
}

impl ContractStore for MemoryStore {
  type Error = WriteRejected;

  async fn load_all(&self) -> Result<Snapshot, WriteRejected> {
    Ok(self.snapshot.lock().await.clone())
  }

  async fn save_all(&self, snapshot: &Snapshot) -> Result<(), WriteRejected> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(WriteRejected);
    }
    *self.snapshot.lock().await = snapshot.clone();
    Ok(())
  }
}
