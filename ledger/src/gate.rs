//! Authorization and pause gate.
//!
//! Holders are authorized per certificate through the registry; this module
//! covers the two engine-wide roles: the administrator (pause switch, fee and
//! treasury settings) and the trusted writer that creates ledger entries.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::LedgerError;
use vesta_types::Address;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// The right to create and extend allocations.
///
/// Issued exactly once, when an engine is constructed, and handed to the
/// grant-issuance subsystem. It cannot be cloned or forged, and a capability
/// issued by one engine is rejected by every other engine.
#[derive(Debug)]
pub struct WriterCapability {
    instance: u64,
}

/// Engine-wide access state.
#[derive(Debug)]
pub struct AccessGate {
    admin: Address,
    paused: bool,
    instance: u64,
}

impl AccessGate {
    /// Create a gate together with the writer capability bound to it.
    pub fn new(admin: Address) -> (Self, WriterCapability) {
        let instance = NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed);
        let gate = Self {
            admin,
            paused: false,
            instance,
        };
        (gate, WriterCapability { instance })
    }

    pub fn admin(&self) -> &Address {
        &self.admin
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fail with `Paused` if mutating holder operations are suspended.
    pub fn ensure_live(&self) -> Result<(), LedgerError> {
        if self.paused {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    pub fn ensure_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.admin {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub fn ensure_writer(&self, cap: &WriterCapability) -> Result<(), LedgerError> {
        if cap.instance != self.instance {
            return Err(LedgerError::Unauthorized);
        }
        Ok(())
    }

    pub fn pause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.ensure_admin(caller)?;
        self.ensure_live()?;
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), LedgerError> {
        self.ensure_admin(caller)?;
        if !self.paused {
            return Err(LedgerError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_requires_admin() {
        let admin = Address::new("admin");
        let (mut gate, _cap) = AccessGate::new(admin.clone());
        assert!(matches!(
            gate.pause(&Address::new("mallory")),
            Err(LedgerError::Unauthorized)
        ));
        gate.pause(&admin).unwrap();
        assert!(matches!(gate.ensure_live(), Err(LedgerError::Paused)));
        assert!(matches!(gate.pause(&admin), Err(LedgerError::Paused)));
        gate.unpause(&admin).unwrap();
        assert!(matches!(gate.unpause(&admin), Err(LedgerError::NotPaused)));
    }

    #[test]
    fn test_foreign_capability_is_rejected() {
        let (gate_a, cap_a) = AccessGate::new(Address::new("admin"));
        let (_gate_b, cap_b) = AccessGate::new(Address::new("admin"));
        assert!(gate_a.ensure_writer(&cap_a).is_ok());
        assert!(matches!(gate_a.ensure_writer(&cap_b), Err(LedgerError::Unauthorized)));
    }
}
