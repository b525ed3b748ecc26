use proptest::prelude::*;

use vesta_types::{Allocation, BasisPoints, CertId, Flow, Provenance, Timestamp, TokenId};

proptest! {
    /// Flows built from any claimed amount keep `claimed_amount <= amount`
    /// and are settled exactly when the two are equal.
    #[test]
    fn flow_claimed_never_exceeds_amount(amount in 0u128..1_000_000_000, claimed in 0u128..2_000_000_000) {
        let flow = Flow::with_claimed(amount, 100, Timestamp::new(0), claimed);
        prop_assert!(flow.claimed_amount() <= flow.amount);
        prop_assert_eq!(flow.is_claimed(), flow.claimed_amount() == flow.amount);
    }

    /// Rounding up never yields less than rounding down, and never by more than one unit.
    #[test]
    fn ceil_is_floor_or_floor_plus_one(value in 0u128..u64::MAX as u128, bps in 0u32..=10_000) {
        let p = BasisPoints::new(bps).unwrap();
        let floor = p.apply_floor(value).unwrap();
        let ceil = p.apply_ceil(value).unwrap();
        prop_assert!(ceil >= floor);
        prop_assert!(ceil - floor <= 1);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta.elapsed_since(tb), b.saturating_sub(a));
    }

    /// Allocation bincode serialization roundtrip preserves every flow.
    #[test]
    fn allocation_bincode_roundtrip(
        amounts in prop::collection::vec((1u128..1_000_000, 0u128..1_000_000), 0..8),
    ) {
        let mut alloc = Allocation::new(CertId::new(9), TokenId::new("TKN"), Provenance::new(1, false, 3));
        for (amount, claimed) in amounts {
            alloc.flows.push(Flow::with_claimed(amount, 60, Timestamp::new(5), claimed));
        }
        let encoded = bincode::serialize(&alloc).unwrap();
        let decoded: Allocation = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, alloc);
    }
}
