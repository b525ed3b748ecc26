//! Ownership-certificate registry interface.

use crate::RegistryError;
use vesta_types::{Address, CertId};

/// The registry that mints, burns and tracks ownership of certificates.
pub trait CertificateRegistry {
    /// Current owner of a certificate, `None` if it was never minted or is burned.
    fn owner_of(&self, cert_id: CertId) -> Option<Address>;

    /// Whether the certificate has no outstanding transfer approvals.
    fn has_zero_approvals(&self, cert_id: CertId) -> bool;

    /// Mint a new certificate to `to` and return its id.
    fn mint(&mut self, to: &Address) -> Result<CertId, RegistryError>;

    /// Burn every listed certificate, or none of them if any burn fails.
    fn burn(&mut self, cert_ids: &[CertId]) -> Result<(), RegistryError>;
}
