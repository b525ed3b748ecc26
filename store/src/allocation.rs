//! Allocation storage trait.

use crate::StoreError;
use vesta_types::{Allocation, CertId};

/// Trait for allocation storage operations.
///
/// One record per live certificate. Writers are serialized by the engine,
/// so implementations only need to make each individual call atomic.
pub trait AllocationStore {
    /// Fetch the allocation for a certificate, `None` if it does not exist.
    fn get(&self, cert_id: CertId) -> Result<Option<Allocation>, StoreError>;

    /// Insert or replace an allocation.
    fn put(&self, allocation: &Allocation) -> Result<(), StoreError>;

    /// Remove an allocation. Deleting a missing record is not an error.
    fn delete(&self, cert_id: CertId) -> Result<(), StoreError>;

    /// All live allocations, ordered by certificate id.
    fn iter(&self) -> Result<Vec<Allocation>, StoreError>;

    fn exists(&self, cert_id: CertId) -> Result<bool, StoreError> {
        self.get(cert_id).map(|a| a.is_some())
    }
}
