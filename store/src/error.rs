use thiserror::Error;
use vesta_types::{Address, CertId, TokenId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("key not found: {0}")]
    NotFound(String),

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("certificate {0} does not exist")]
    UnknownCertificate(CertId),

    #[error("registry rejected the call: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("insufficient {token} balance in {holder}: need {needed}, have {available}")]
    InsufficientBalance {
        token: TokenId,
        holder: Address,
        needed: u128,
        available: u128,
    },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}
