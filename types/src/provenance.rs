//! Provenance tags attached to every allocation by the grant-issuance subsystem.

use serde::{Deserialize, Serialize};

/// Which kind of project produced a certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectKind {
    /// Allocation won in a bidding project.
    Bidding,
    /// Allocation paid out by a reward project.
    Reward,
}

/// Certificate-level metadata. Never used in arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    pub project_id: u64,
    pub kind: ProjectKind,
    pub pool_id: u64,
}

impl Provenance {
    /// Build provenance from the grant-issuance subsystem's wire shape.
    pub fn new(project_id: u64, is_bidding_project: bool, pool_id: u64) -> Self {
        let kind = if is_bidding_project {
            ProjectKind::Bidding
        } else {
            ProjectKind::Reward
        };
        Self {
            project_id,
            kind,
            pool_id,
        }
    }
}
