//! Linear vesting math.
//!
//! `vested(t) = floor((t − start) × amount / period)` for `start <= t < start + period`,
//! `0` before `start` and `amount` from `start + period` onwards. All values are
//! integers; the truncation under-pays by at most one unit per claim per flow
//! and never over-pays.

use crate::error::LedgerError;
use vesta_types::{Flow, Timestamp};

/// Amount of a flow vested at `now`, ignoring what has been claimed.
pub fn vested(
    amount: u128,
    vesting_start: Timestamp,
    vesting_period: u64,
    now: Timestamp,
) -> Result<u128, LedgerError> {
    if now < vesting_start {
        return Ok(0);
    }
    let elapsed = vesting_start.elapsed_since(now);
    if elapsed >= vesting_period {
        return Ok(amount);
    }
    // elapsed < vesting_period, so the period is non-zero. Whole periods and
    // the remainder are scaled separately so neither product can overflow.
    let period = vesting_period as u128;
    let elapsed = elapsed as u128;
    let whole = (amount / period)
        .checked_mul(elapsed)
        .ok_or(LedgerError::ArithmeticOverflow)?;
    let partial = (amount % period) * elapsed / period;
    whole
        .checked_add(partial)
        .ok_or(LedgerError::ArithmeticOverflow)
}

/// Amount a holder may claim from a flow at `now`.
///
/// A claimed amount above the linear accrual (possible after a split rounds
/// claimed shares up) yields zero rather than underflowing.
pub fn claimable(
    amount: u128,
    vesting_start: Timestamp,
    vesting_period: u64,
    claimed_so_far: u128,
    now: Timestamp,
) -> Result<u128, LedgerError> {
    let vested = vested(amount, vesting_start, vesting_period, now)?;
    Ok(vested.saturating_sub(claimed_so_far))
}

/// [`claimable`] for a stored flow. Settled flows always yield zero.
pub fn claimable_from(flow: &Flow, now: Timestamp) -> Result<u128, LedgerError> {
    if flow.is_claimed() {
        return Ok(0);
    }
    claimable(
        flow.amount,
        flow.vesting_start,
        flow.vesting_period,
        flow.claimed_amount(),
        now,
    )
}
