use thiserror::Error;
use vesta_store::{RegistryError, StoreError, VaultError};
use vesta_types::{Address, CertId, TokenId};

#[derive(Debug, Error)]
pub enum LedgerError {
    // Authorization
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("{caller} does not own {cert_id}")]
    NotOwner { cert_id: CertId, caller: Address },

    // Lifecycle
    #[error("ledger is paused")]
    Paused,

    #[error("ledger is not paused")]
    NotPaused,

    #[error("{0} has outstanding transfer approvals")]
    HasOutstandingApprovals(CertId),

    #[error("{0} not found")]
    CertificateNotFound(CertId),

    // Arithmetic / policy
    /// Share `share_index` of a split rounds flow `flow_index` down to zero.
    /// A zero percentage zeroes every flow and is reported against flow 0.
    #[error("split share {share_index} would zero out flow {flow_index}")]
    ZeroedFlow { share_index: usize, flow_index: usize },

    #[error("split percentages sum to {0} basis points, expected 10000")]
    PercentagesDoNotSumToOneHundred(u32),

    #[error("certificate would carry {count} flows, maximum is {max}")]
    TooManyFlows { count: usize, max: usize },

    #[error("certificates are backed by different tokens")]
    DifferentTokens,

    #[error("merge requires at least two certificates")]
    NotEnoughCertificatesToMerge,

    #[error("{0} appears more than once in the merge")]
    DuplicateCertificate(CertId),

    #[error("fee rate {rate} exceeds maximum {max}")]
    FeeRateTooHigh { rate: u32, max: u32 },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("{token}: ledger owes {outstanding} but custody holds {custody}")]
    ConservationViolated {
        token: TokenId,
        outstanding: u128,
        custody: u128,
    },

    // Collaborators
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("config error: {0}")]
    Config(String),
}
