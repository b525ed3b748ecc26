//! Split planning: proportional redistribution of every flow across children.
//!
//! Each child receives `floor(amount × p / 10 000)` of every flow and
//! `ceil(claimed × p / 10 000)` (capped at its amount) of the claimed share.
//! Rounding the amount down and the claimed share up keeps
//! `Σ child amounts <= source amount` and never lets a child report less
//! claimed than its share, so no split can mint claimable value.

use serde::Serialize;

use crate::error::LedgerError;
use crate::fee::apply_fee;
use vesta_types::{Allocation, BasisPoints, CertId, Flow, FlowState, BASIS_POINT};

/// What a committed split produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SplitReceipt {
    pub source: CertId,
    pub children: Vec<CertId>,
    pub fee: u128,
}

/// The flows each child will carry, plus the fee taken beforehand.
#[derive(Clone, Debug)]
pub struct SplitPlan {
    /// Source flows after the fee step.
    pub base: Vec<Flow>,
    pub fee: u128,
    /// One flow list per requested percentage, in input order.
    pub children: Vec<Vec<Flow>>,
}

/// Every share must be non-zero and the shares must add up to exactly 100 %.
pub fn validate_percentages(percentages: &[BasisPoints]) -> Result<(), LedgerError> {
    if let Some(share_index) = percentages.iter().position(BasisPoints::is_zero) {
        return Err(LedgerError::ZeroedFlow {
            share_index,
            flow_index: 0,
        });
    }
    let sum = percentages
        .iter()
        .try_fold(0u32, |acc, p| acc.checked_add(p.raw()))
        .unwrap_or(u32::MAX);
    if sum != BASIS_POINT {
        return Err(LedgerError::PercentagesDoNotSumToOneHundred(sum));
    }
    Ok(())
}

/// Compute the children of a split of `allocation` after charging `fee_rate`.
pub fn plan_split(
    allocation: &Allocation,
    percentages: &[BasisPoints],
    fee_rate: BasisPoints,
) -> Result<SplitPlan, LedgerError> {
    validate_percentages(percentages)?;

    let mut base = allocation.flows.clone();
    let fee = apply_fee(&mut base, fee_rate)?;

    let mut children: Vec<Vec<Flow>> = percentages
        .iter()
        .map(|_| Vec::with_capacity(base.len()))
        .collect();

    for (flow_index, flow) in base.iter().enumerate() {
        let mut distributed = 0u128;
        for (share_index, (share, child)) in percentages.iter().zip(children.iter_mut()).enumerate() {
            let part = split_flow(flow, *share, share_index, flow_index)?;
            distributed += part.amount;
            child.push(part);
        }
        if distributed > flow.amount {
            return Err(LedgerError::ConservationViolated {
                token: allocation.token.clone(),
                outstanding: distributed,
                custody: flow.amount,
            });
        }
    }

    Ok(SplitPlan {
        base,
        fee,
        children,
    })
}

/// One child's share of a single flow.
fn split_flow(
    flow: &Flow,
    share: BasisPoints,
    share_index: usize,
    flow_index: usize,
) -> Result<Flow, LedgerError> {
    if flow.amount == 0 {
        return Ok(*flow);
    }
    let amount = share
        .apply_floor(flow.amount)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    if amount == 0 {
        return Err(LedgerError::ZeroedFlow {
            share_index,
            flow_index,
        });
    }
    let claimed = match flow.state {
        FlowState::Settled => amount,
        FlowState::Open { claimed } => share
            .apply_ceil(claimed)
            .ok_or(LedgerError::ArithmeticOverflow)?
            .min(amount),
    };
    Ok(Flow::with_claimed(
        amount,
        flow.vesting_period,
        flow.vesting_start,
        claimed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_types::{Provenance, Timestamp, TokenId};

    fn bps(raw: u32) -> BasisPoints {
        BasisPoints::new(raw).unwrap()
    }

    fn allocation(flows: Vec<Flow>) -> Allocation {
        let mut a = Allocation::new(CertId::new(1), TokenId::new("TKN"), Provenance::new(1, true, 0));
        a.flows = flows;
        a
    }

    #[test]
    fn test_even_split_preserves_claimed_exactly() {
        let alloc = allocation(vec![Flow::with_claimed(1000, 100, Timestamp::new(0), 400)]);
        let plan = plan_split(&alloc, &[bps(5_000), bps(5_000)], BasisPoints::ZERO).unwrap();
        for child in &plan.children {
            assert_eq!(child[0].amount, 500);
            assert_eq!(child[0].claimed_amount(), 200);
            assert!(!child[0].is_claimed());
        }
        assert_eq!(plan.fee, 0);
    }

    #[test]
    fn test_uneven_split_rounds_amount_down_and_claimed_up() {
        let alloc = allocation(vec![Flow::with_claimed(1001, 100, Timestamp::new(0), 1)]);
        let plan = plan_split(&alloc, &[bps(3_333), bps(3_333), bps(3_334)], BasisPoints::ZERO).unwrap();
        let amounts: Vec<u128> = plan.children.iter().map(|c| c[0].amount).collect();
        assert_eq!(amounts, vec![333, 333, 333]);
        let claimed: Vec<u128> = plan.children.iter().map(|c| c[0].claimed_amount()).collect();
        assert_eq!(claimed, vec![1, 1, 1]);
    }

    #[test]
    fn test_settled_flow_stays_settled() {
        let alloc = allocation(vec![
            Flow::with_claimed(800, 100, Timestamp::new(0), 800),
            Flow::new(600, 100, Timestamp::new(7)),
        ]);
        let plan = plan_split(&alloc, &[bps(2_500), bps(7_500)], BasisPoints::ZERO).unwrap();
        assert!(plan.children[0][0].is_claimed());
        assert_eq!(plan.children[0][0].amount, 200);
        assert_eq!(plan.children[1][0].amount, 600);
        assert_eq!(plan.children[1][1].vesting_start, Timestamp::new(7));
        assert_eq!(plan.children[1][1].amount, 450);
    }

    #[test]
    fn test_rounded_up_claim_reaching_amount_settles_child() {
        let alloc = allocation(vec![Flow::with_claimed(3, 100, Timestamp::new(0), 2)]);
        let plan = plan_split(&alloc, &[bps(5_000), bps(5_000)], BasisPoints::ZERO).unwrap();
        assert_eq!(plan.children[0][0].amount, 1);
        assert!(plan.children[0][0].is_claimed());
    }

    #[test]
    fn test_tiny_share_rejects_whole_split() {
        let alloc = allocation(vec![
            Flow::new(1_000_000, 100, Timestamp::new(0)),
            Flow::new(10, 100, Timestamp::new(0)),
        ]);
        let result = plan_split(&alloc, &[bps(1), bps(9_999)], BasisPoints::ZERO);
        assert!(matches!(
            result,
            Err(LedgerError::ZeroedFlow {
                share_index: 0,
                flow_index: 1
            })
        ));
    }

    #[test]
    fn test_percentages_must_sum_to_full() {
        let alloc = allocation(vec![Flow::new(1000, 100, Timestamp::new(0))]);
        assert!(matches!(
            plan_split(&alloc, &[bps(5_000), bps(4_000)], BasisPoints::ZERO),
            Err(LedgerError::PercentagesDoNotSumToOneHundred(9_000))
        ));
        assert!(matches!(
            plan_split(&alloc, &[], BasisPoints::ZERO),
            Err(LedgerError::PercentagesDoNotSumToOneHundred(0))
        ));
        assert!(matches!(
            plan_split(&alloc, &[bps(10_000), bps(0)], BasisPoints::ZERO),
            Err(LedgerError::ZeroedFlow {
                share_index: 1,
                flow_index: 0
            })
        ));
    }

    #[test]
    fn test_fee_is_taken_before_distribution() {
        let alloc = allocation(vec![Flow::with_claimed(10_000, 100, Timestamp::new(0), 5_000)]);
        let plan = plan_split(&alloc, &[bps(5_000), bps(5_000)], bps(200)).unwrap();
        assert_eq!(plan.fee, 100);
        assert_eq!(plan.base[0].amount, 9_900);
        assert_eq!(plan.children[0][0].amount, 4_950);
        assert_eq!(plan.children[0][0].claimed_amount(), 2_500);
    }
}
