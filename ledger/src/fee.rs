//! Split and merge fees, charged on unclaimed balances only.

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use vesta_types::{BasisPoints, Flow, FlowState};

/// Upper bound for either fee rate: 2 %.
pub const MAX_FEE_RATE: u32 = 200;

/// The fee rates currently charged by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub split: BasisPoints,
    pub merge: BasisPoints,
}

impl FeeSchedule {
    /// Build a schedule, rejecting rates above [`MAX_FEE_RATE`].
    pub fn new(split_bps: u32, merge_bps: u32) -> Result<Self, LedgerError> {
        Ok(Self {
            split: capped(split_bps)?,
            merge: capped(merge_bps)?,
        })
    }
}

fn capped(rate: u32) -> Result<BasisPoints, LedgerError> {
    match BasisPoints::new(rate) {
        Ok(bps) if rate <= MAX_FEE_RATE => Ok(bps),
        _ => Err(LedgerError::FeeRateTooHigh {
            rate,
            max: MAX_FEE_RATE,
        }),
    }
}

/// Deduct `rate` of every open flow's unclaimed balance from its amount and
/// return the total deducted.
///
/// Settled flows are never charged. The fee is at most `rate` of
/// `amount − claimed`, so an open flow stays open and `claimed <= amount` holds.
pub fn apply_fee(flows: &mut [Flow], rate: BasisPoints) -> Result<u128, LedgerError> {
    if rate.is_zero() {
        return Ok(0);
    }
    let mut total = 0u128;
    for flow in flows.iter_mut() {
        let FlowState::Open { claimed } = flow.state else {
            continue;
        };
        let fee = rate
            .apply_floor(flow.amount - claimed)
            .ok_or(LedgerError::ArithmeticOverflow)?;
        if fee == 0 {
            continue;
        }
        *flow = Flow::with_claimed(
            flow.amount - fee,
            flow.vesting_period,
            flow.vesting_start,
            claimed,
        );
        total = total
            .checked_add(fee)
            .ok_or(LedgerError::ArithmeticOverflow)?;
    }
    Ok(total)
}
