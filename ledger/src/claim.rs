//! Claim planning: how much each flow pays out at a given time.

use serde::Serialize;

use crate::error::LedgerError;
use crate::vesting::claimable_from;
use vesta_types::{Allocation, CertId, Timestamp};

/// What a committed claim paid out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub cert_id: CertId,
    pub total: u128,
    /// Per-flow amounts, index-parallel to the certificate's flows.
    pub deltas: Vec<u128>,
    /// Every flow is settled and the certificate has been burned.
    pub fully_claimed: bool,
}

/// Read-only preview of a claim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimQuote {
    pub per_flow: Vec<u128>,
    pub total: u128,
    /// Every flow has reached the end of its vesting period.
    pub fully_vested: bool,
}

/// The allocation as it would look after claiming at `now`.
#[derive(Clone, Debug)]
pub struct ClaimPlan {
    pub updated: Allocation,
    pub deltas: Vec<u128>,
    pub total: u128,
    pub fully_claimed: bool,
}

/// Apply vesting math to every open flow of `allocation`.
pub fn plan_claim(allocation: &Allocation, now: Timestamp) -> Result<ClaimPlan, LedgerError> {
    let mut updated = allocation.clone();
    let mut deltas = Vec::with_capacity(updated.flows.len());
    let mut total = 0u128;

    for flow in updated.flows.iter_mut() {
        let delta = claimable_from(flow, now)?;
        if delta > 0 {
            flow.record_claim(delta)
                .ok_or(LedgerError::ArithmeticOverflow)?;
            total = total
                .checked_add(delta)
                .ok_or(LedgerError::ArithmeticOverflow)?;
        }
        deltas.push(delta);
    }

    let fully_claimed = updated.is_fully_claimed();
    Ok(ClaimPlan {
        updated,
        deltas,
        total,
        fully_claimed,
    })
}

/// Preview what [`plan_claim`] would pay at `now` without building the new state.
pub fn quote(allocation: &Allocation, now: Timestamp) -> Result<ClaimQuote, LedgerError> {
    let plan = plan_claim(allocation, now)?;
    let fully_vested = allocation.flows.iter().all(|f| f.vesting_end() <= now);
    Ok(ClaimQuote {
        per_flow: plan.deltas,
        total: plan.total,
        fully_vested,
    })
}
