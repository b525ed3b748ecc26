//! Nullable certificate registry: in-memory ownership and approvals.

use std::collections::{HashMap, HashSet};

use vesta_store::{CertificateRegistry, RegistryError};
use vesta_types::{Address, CertId};

/// An in-memory certificate registry for testing.
///
/// Ids are assigned sequentially starting at 1. Mints and burns can be made
/// to fail on demand to exercise the engine's rollback paths.
pub struct NullRegistry {
    next_id: u64,
    owners: HashMap<CertId, Address>,
    approvals: HashMap<CertId, u32>,
    burned: HashSet<CertId>,
    fail_mints_after: Option<usize>,
    unburnable: HashSet<CertId>,
}

impl NullRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            owners: HashMap::new(),
            approvals: HashMap::new(),
            burned: HashSet::new(),
            fail_mints_after: None,
            unburnable: HashSet::new(),
        }
    }

    /// Mint directly, bypassing failure injection (test setup).
    pub fn issue(&mut self, to: &Address) -> CertId {
        let id = CertId::new(self.next_id);
        self.next_id += 1;
        self.owners.insert(id, to.clone());
        id
    }

    /// Move a certificate to a new owner, clearing its approvals.
    pub fn transfer(&mut self, cert_id: CertId, to: &Address) {
        if let Some(owner) = self.owners.get_mut(&cert_id) {
            *owner = to.clone();
            self.approvals.remove(&cert_id);
        }
    }

    /// Record an outstanding transfer approval.
    pub fn approve(&mut self, cert_id: CertId) {
        *self.approvals.entry(cert_id).or_default() += 1;
    }

    pub fn revoke_approvals(&mut self, cert_id: CertId) {
        self.approvals.remove(&cert_id);
    }

    /// Allow `n` more successful mints, then fail every subsequent one.
    pub fn fail_mints_after(&mut self, n: usize) {
        self.fail_mints_after = Some(n);
    }

    /// Make every burn call that includes `cert_id` fail.
    pub fn refuse_burn(&mut self, cert_id: CertId) {
        self.unburnable.insert(cert_id);
    }

    pub fn is_burned(&self, cert_id: CertId) -> bool {
        self.burned.contains(&cert_id)
    }

    /// Number of certificates currently alive.
    pub fn live_count(&self) -> usize {
        self.owners.len()
    }

    /// Live certificates held by `owner`, in id order.
    pub fn certificates_of(&self, owner: &Address) -> Vec<CertId> {
        let mut ids: Vec<CertId> = self
            .owners
            .iter()
            .filter(|(_, o)| *o == owner)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}

impl Default for NullRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CertificateRegistry for NullRegistry {
    fn owner_of(&self, cert_id: CertId) -> Option<Address> {
        self.owners.get(&cert_id).cloned()
    }

    fn has_zero_approvals(&self, cert_id: CertId) -> bool {
        self.approvals.get(&cert_id).copied().unwrap_or(0) == 0
    }

    fn mint(&mut self, to: &Address) -> Result<CertId, RegistryError> {
        if let Some(remaining) = self.fail_mints_after.as_mut() {
            if *remaining == 0 {
                return Err(RegistryError::Rejected("mint disabled".into()));
            }
            *remaining -= 1;
        }
        Ok(self.issue(to))
    }

    fn burn(&mut self, cert_ids: &[CertId]) -> Result<(), RegistryError> {
        if let Some(refused) = cert_ids.iter().find(|id| self.unburnable.contains(id)) {
            return Err(RegistryError::Rejected(format!("burn of {refused} refused")));
        }
        if let Some(missing) = cert_ids.iter().find(|id| !self.owners.contains_key(id)) {
            return Err(RegistryError::UnknownCertificate(*missing));
        }
        for id in cert_ids {
            self.owners.remove(id);
            self.approvals.remove(id);
            self.burned.insert(*id);
        }
        Ok(())
    }
}
