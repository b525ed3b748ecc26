//! In-memory allocation store with bincode snapshots.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{AllocationStore, StoreError};
use vesta_types::{Allocation, CertId};

/// A thread-safe in-memory allocation store.
///
/// Contents can be persisted with [`MemoryStore::snapshot`] and restored with
/// [`MemoryStore::from_snapshot`].
#[derive(Default)]
pub struct MemoryStore {
    allocations: Mutex<BTreeMap<CertId, Allocation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<CertId, Allocation>>, StoreError> {
        self.allocations
            .lock()
            .map_err(|e| StoreError::Backend(format!("allocation map poisoned: {e}")))
    }

    /// Serialize every allocation into a single bincode blob.
    pub fn snapshot(&self) -> Result<Vec<u8>, StoreError> {
        let map = self.lock()?;
        let records: Vec<&Allocation> = map.values().collect();
        bincode::serialize(&records).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Rebuild a store from a blob produced by [`MemoryStore::snapshot`].
    pub fn from_snapshot(data: &[u8]) -> Result<Self, StoreError> {
        let records: Vec<Allocation> =
            bincode::deserialize(data).map_err(|e| StoreError::Serialization(e.to_string()))?;
        let allocations = records.into_iter().map(|a| (a.cert_id, a)).collect();
        Ok(Self {
            allocations: Mutex::new(allocations),
        })
    }

    pub fn len(&self) -> usize {
        self.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AllocationStore for MemoryStore {
    fn get(&self, cert_id: CertId) -> Result<Option<Allocation>, StoreError> {
        Ok(self.lock()?.get(&cert_id).cloned())
    }

    fn put(&self, allocation: &Allocation) -> Result<(), StoreError> {
        self.lock()?.insert(allocation.cert_id, allocation.clone());
        Ok(())
    }

    fn delete(&self, cert_id: CertId) -> Result<(), StoreError> {
        self.lock()?.remove(&cert_id);
        Ok(())
    }

    fn iter(&self) -> Result<Vec<Allocation>, StoreError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}
