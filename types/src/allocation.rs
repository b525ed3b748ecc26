//! The allocation record kept for every live certificate.

use serde::{Deserialize, Serialize};

use crate::{CertId, Flow, Provenance, TokenId};

/// Maximum number of flows a single certificate may carry.
pub const MAX_FLOWS: usize = 64;

/// Everything the ledger knows about one certificate.
///
/// Flows are kept in insertion order; the order only matters for traceability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub cert_id: CertId,
    /// The asset backing every flow of this certificate.
    pub token: TokenId,
    pub provenance: Provenance,
    pub flows: Vec<Flow>,
}

impl Allocation {
    pub fn new(cert_id: CertId, token: TokenId, provenance: Provenance) -> Self {
        Self {
            cert_id,
            token,
            provenance,
            flows: Vec::new(),
        }
    }

    /// Sum of `amount - claimed_amount` over all flows, `None` on overflow.
    pub fn outstanding(&self) -> Option<u128> {
        self.flows
            .iter()
            .try_fold(0u128, |acc, f| acc.checked_add(f.unclaimed()))
    }

    /// Sum of flow amounts, `None` on overflow.
    pub fn total_amount(&self) -> Option<u128> {
        self.flows
            .iter()
            .try_fold(0u128, |acc, f| acc.checked_add(f.amount))
    }

    /// True when every flow is settled.
    pub fn is_fully_claimed(&self) -> bool {
        self.flows.iter().all(Flow::is_claimed)
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }
}
