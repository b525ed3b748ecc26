//! Allocation ledger entries: appending grant flows and summarising balances.

use crate::error::LedgerError;
use vesta_types::{Allocation, CertId, Flow, GrantFlow, Provenance, TokenId, MAX_FLOWS};

/// Append one grant flow to a certificate's allocation, creating it if needed.
///
/// Token and provenance are overwritten on every call (last writer wins). The
/// flow cap is enforced here so oversized certificates are rejected when they
/// are built rather than when they are later merged or split.
pub fn append_flow(
    existing: Option<Allocation>,
    cert_id: CertId,
    grant: GrantFlow,
    token: TokenId,
    provenance: Provenance,
) -> Result<Allocation, LedgerError> {
    let mut allocation =
        existing.unwrap_or_else(|| Allocation::new(cert_id, token.clone(), provenance));
    let count = allocation.flow_count() + 1;
    if count > MAX_FLOWS {
        return Err(LedgerError::TooManyFlows {
            count,
            max: MAX_FLOWS,
        });
    }
    allocation.token = token;
    allocation.provenance = provenance;
    allocation.flows.push(Flow::from(grant));
    Ok(allocation)
}

/// Sum of unclaimed balances over the allocations backed by `token`.
pub fn outstanding<'a>(
    allocations: impl IntoIterator<Item = &'a Allocation>,
    token: &TokenId,
) -> Result<u128, LedgerError> {
    allocations
        .into_iter()
        .filter(|a| a.token == *token)
        .try_fold(0u128, |acc, a| {
            a.outstanding()
                .and_then(|owed| acc.checked_add(owed))
                .ok_or(LedgerError::ArithmeticOverflow)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use vesta_types::{ProjectKind, Timestamp};

    fn grant(amount: u128) -> GrantFlow {
        GrantFlow::new(amount, 1_000, Timestamp::new(0))
    }

    #[test]
    fn test_append_creates_then_grows() {
        let id = CertId::new(1);
        let first = append_flow(None, id, grant(100), TokenId::new("A"), Provenance::new(1, true, 0)).unwrap();
        assert_eq!(first.flow_count(), 1);

        let second =
            append_flow(Some(first), id, grant(50), TokenId::new("A"), Provenance::new(2, false, 9)).unwrap();
        assert_eq!(second.flow_count(), 2);
        assert_eq!(second.total_amount(), Some(150));
        assert_eq!(second.provenance.project_id, 2);
        assert_eq!(second.provenance.kind, ProjectKind::Reward);
    }

    #[test]
    fn test_append_rejects_flow_beyond_cap() {
        let id = CertId::new(1);
        let mut alloc = None;
        for _ in 0..MAX_FLOWS {
            alloc = Some(
                append_flow(alloc, id, grant(1), TokenId::new("A"), Provenance::new(1, true, 0)).unwrap(),
            );
        }
        let result = append_flow(alloc, id, grant(1), TokenId::new("A"), Provenance::new(1, true, 0));
        assert!(matches!(result, Err(LedgerError::TooManyFlows { count: 65, max: 64 })));
    }

    #[test]
    fn test_outstanding_filters_by_token() {
        let a = append_flow(None, CertId::new(1), grant(100), TokenId::new("A"), Provenance::new(1, true, 0)).unwrap();
        let b = append_flow(None, CertId::new(2), grant(40), TokenId::new("B"), Provenance::new(1, true, 0)).unwrap();
        assert_eq!(outstanding([&a, &b], &TokenId::new("A")).unwrap(), 100);
    }
}
