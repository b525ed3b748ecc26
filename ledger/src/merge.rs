//! Merge planning: concatenating several certificates' flows into one.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::LedgerError;
use crate::fee::apply_fee;
use vesta_types::{Allocation, BasisPoints, CertId, Flow, MAX_FLOWS};

/// What a committed merge produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MergeReceipt {
    pub merged: CertId,
    pub sources: Vec<CertId>,
    pub fee: u128,
}

/// The destination's flows and the fee charged on them.
#[derive(Clone, Debug)]
pub struct MergePlan {
    pub flows: Vec<Flow>,
    pub fee: u128,
}

/// At least two certificates, none listed twice.
pub fn validate_merge_ids(cert_ids: &[CertId]) -> Result<(), LedgerError> {
    if cert_ids.len() < 2 {
        return Err(LedgerError::NotEnoughCertificatesToMerge);
    }
    let mut seen = HashSet::with_capacity(cert_ids.len());
    for id in cert_ids {
        if !seen.insert(*id) {
            return Err(LedgerError::DuplicateCertificate(*id));
        }
    }
    Ok(())
}

/// Fail with `DifferentTokens` unless every source is backed by the first one's token.
pub fn ensure_same_token(sources: &[Allocation]) -> Result<(), LedgerError> {
    if let Some(first) = sources.first() {
        if sources.iter().any(|a| a.token != first.token) {
            return Err(LedgerError::DifferentTokens);
        }
    }
    Ok(())
}

/// Concatenate the sources' flows in input order and charge `fee_rate`.
///
/// The flow cap is checked on the full concatenation; a merge never truncates.
pub fn plan_merge(sources: &[Allocation], fee_rate: BasisPoints) -> Result<MergePlan, LedgerError> {
    if sources.len() < 2 {
        return Err(LedgerError::NotEnoughCertificatesToMerge);
    }
    ensure_same_token(sources)?;

    let count: usize = sources.iter().map(Allocation::flow_count).sum();
    if count > MAX_FLOWS {
        return Err(LedgerError::TooManyFlows {
            count,
            max: MAX_FLOWS,
        });
    }

    let mut flows = Vec::with_capacity(count);
    for source in sources {
        flows.extend_from_slice(&source.flows);
    }
    let fee = apply_fee(&mut flows, fee_rate)?;
    Ok(MergePlan { flows, fee })
}
