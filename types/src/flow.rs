//! Vesting flows: one independent schedule inside a certificate.

use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Claim progress of a flow.
///
/// The tagged form makes "fully claimed" a variant rather than a flag, so a
/// settled flow can never carry a claimed amount different from its amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    /// Partially claimed; `claimed` is strictly below the flow amount.
    Open { claimed: u128 },
    /// Fully claimed.
    Settled,
}

/// A single vesting flow: `amount` tokens released linearly over
/// `vesting_period` seconds starting at `vesting_start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub amount: u128,
    pub vesting_period: u64,
    pub vesting_start: Timestamp,
    pub state: FlowState,
}

impl Flow {
    /// A fresh, unclaimed flow. A zero-amount flow is settled from the start.
    pub fn new(amount: u128, vesting_period: u64, vesting_start: Timestamp) -> Self {
        Self::with_claimed(amount, vesting_period, vesting_start, 0)
    }

    /// Build a flow with a given claimed amount.
    ///
    /// `claimed >= amount` yields a settled flow; the claimed amount is clamped
    /// to `amount` so `claimed_amount() <= amount` always holds.
    pub fn with_claimed(
        amount: u128,
        vesting_period: u64,
        vesting_start: Timestamp,
        claimed: u128,
    ) -> Self {
        let state = if claimed >= amount {
            FlowState::Settled
        } else {
            FlowState::Open { claimed }
        };
        Self {
            amount,
            vesting_period,
            vesting_start,
            state,
        }
    }

    /// Amount claimed so far.
    pub fn claimed_amount(&self) -> u128 {
        match self.state {
            FlowState::Open { claimed } => claimed,
            FlowState::Settled => self.amount,
        }
    }

    /// Whether the flow is fully claimed.
    pub fn is_claimed(&self) -> bool {
        matches!(self.state, FlowState::Settled)
    }

    /// Amount still owed to the holder.
    pub fn unclaimed(&self) -> u128 {
        self.amount - self.claimed_amount()
    }

    /// Timestamp at which the whole amount has vested.
    pub fn vesting_end(&self) -> Timestamp {
        self.vesting_start.saturating_add(self.vesting_period)
    }

    /// Record `delta` more tokens as claimed, settling the flow once the
    /// claimed amount reaches the flow amount. Returns `None` if `delta`
    /// exceeds what is still unclaimed.
    pub fn record_claim(&mut self, delta: u128) -> Option<()> {
        let claimed = self.claimed_amount().checked_add(delta)?;
        if claimed > self.amount {
            return None;
        }
        *self = Self::with_claimed(self.amount, self.vesting_period, self.vesting_start, claimed);
        Some(())
    }
}

/// The per-flow part of a grant handed over by the grant-issuance subsystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantFlow {
    pub amount: u128,
    pub vesting_period: u64,
    pub vesting_start: Timestamp,
}

impl GrantFlow {
    pub fn new(amount: u128, vesting_period: u64, vesting_start: Timestamp) -> Self {
        Self {
            amount,
            vesting_period,
            vesting_start,
        }
    }
}

impl From<GrantFlow> for Flow {
    fn from(grant: GrantFlow) -> Self {
        Flow::new(grant.amount, grant.vesting_period, grant.vesting_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_claimed_settles_at_amount() {
        let flow = Flow::with_claimed(100, 10, Timestamp::EPOCH, 100);
        assert!(flow.is_claimed());
        assert_eq!(flow.claimed_amount(), 100);

        let over = Flow::with_claimed(100, 10, Timestamp::EPOCH, 150);
        assert!(over.is_claimed());
        assert_eq!(over.claimed_amount(), 100);
    }

    #[test]
    fn test_zero_amount_flow_is_settled() {
        assert!(Flow::new(0, 10, Timestamp::EPOCH).is_claimed());
    }

    #[test]
    fn test_record_claim_settles_and_rejects_overclaim() {
        let mut flow = Flow::new(100, 10, Timestamp::EPOCH);
        flow.record_claim(60).unwrap();
        assert_eq!(flow.state, FlowState::Open { claimed: 60 });
        assert!(flow.record_claim(41).is_none());
        flow.record_claim(40).unwrap();
        assert!(flow.is_claimed());
        assert_eq!(flow.unclaimed(), 0);
    }
}
