//! Rollback journal for multi-collaborator operations.
//!
//! A split touches the allocation store, the certificate registry and the token
//! vault. Each reversible side effect is recorded here together with its
//! inverse; when a later step fails the journal is unwound newest-first so the
//! call leaves no trace. Burning is irreversible and is always the last step of
//! an operation, so it is never journaled.

use vesta_store::{AllocationStore, CertificateRegistry, TokenVault};
use vesta_types::{Address, Allocation, CertId, TokenId};

use crate::error::LedgerError;

#[derive(Debug)]
enum Undo {
    /// Put back whatever the store held before a write.
    Restore {
        cert_id: CertId,
        previous: Option<Allocation>,
    },
    /// Burn a certificate minted by the failed operation.
    Minted(CertId),
    /// Pull a transfer back into custody.
    Transferred {
        token: TokenId,
        to: Address,
        amount: u128,
    },
}

#[derive(Debug, Default)]
pub(crate) struct Journal {
    entries: Vec<Undo>,
}

impl Journal {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put<S: AllocationStore>(
        &mut self,
        store: &S,
        allocation: &Allocation,
    ) -> Result<(), LedgerError> {
        let previous = store.get(allocation.cert_id)?;
        store.put(allocation)?;
        self.entries.push(Undo::Restore {
            cert_id: allocation.cert_id,
            previous,
        });
        Ok(())
    }

    pub(crate) fn delete<S: AllocationStore>(
        &mut self,
        store: &S,
        cert_id: CertId,
    ) -> Result<(), LedgerError> {
        let previous = store.get(cert_id)?;
        store.delete(cert_id)?;
        self.entries.push(Undo::Restore { cert_id, previous });
        Ok(())
    }

    pub(crate) fn mint<R: CertificateRegistry>(
        &mut self,
        registry: &mut R,
        to: &Address,
    ) -> Result<CertId, LedgerError> {
        let cert_id = registry.mint(to)?;
        self.entries.push(Undo::Minted(cert_id));
        Ok(cert_id)
    }

    pub(crate) fn transfer<V: TokenVault>(
        &mut self,
        vault: &mut V,
        token: &TokenId,
        to: &Address,
        amount: u128,
    ) -> Result<(), LedgerError> {
        vault.transfer(token, to, amount)?;
        self.entries.push(Undo::Transferred {
            token: token.clone(),
            to: to.clone(),
            amount,
        });
        Ok(())
    }

    /// Undo every recorded effect, newest first.
    ///
    /// Unwinding continues past individual failures; each one is logged.
    pub(crate) fn rollback<S, R, V>(self, store: &S, registry: &mut R, vault: &mut V)
    where
        S: AllocationStore,
        R: CertificateRegistry,
        V: TokenVault,
    {
        for undo in self.entries.into_iter().rev() {
            let outcome = match &undo {
                Undo::Restore {
                    previous: Some(allocation),
                    ..
                } => store.put(allocation).map_err(|e| e.to_string()),
                Undo::Restore {
                    cert_id,
                    previous: None,
                } => store.delete(*cert_id).map_err(|e| e.to_string()),
                Undo::Minted(cert_id) => registry.burn(&[*cert_id]).map_err(|e| e.to_string()),
                Undo::Transferred { token, to, amount } => {
                    let custody = vault.custody();
                    vault
                        .transfer_from(token, to, &custody, *amount)
                        .map_err(|e| e.to_string())
                }
            };
            if let Err(error) = outcome {
                tracing::error!(?undo, %error, "rollback step failed");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
