//! The vesting engine: serialized, all-or-nothing access to the ledger.
//!
//! Every public operation takes the engine lock once and holds it until the
//! operation has either committed (and its events have been published) or
//! been fully rolled back. Holder operations are planned first against a
//! snapshot, with every precondition checked before the first side effect.

use std::sync::{Mutex, MutexGuard};

use vesta_store::{AllocationStore, CertificateRegistry, Clock, SystemClock, TokenVault};
use vesta_types::{
    Address, Allocation, BasisPoints, CertId, GrantFlow, Provenance, Timestamp, TokenId,
};

use crate::allocation::{append_flow, outstanding};
use crate::claim::{plan_claim, quote, ClaimQuote, ClaimReceipt};
use crate::config::EngineConfig;
use crate::error::LedgerError;
use crate::event::{EngineEvent, EventBus};
use crate::fee::FeeSchedule;
use crate::gate::{AccessGate, WriterCapability};
use crate::journal::Journal;
use crate::merge::{ensure_same_token, plan_merge, validate_merge_ids, MergeReceipt};
use crate::split::{plan_split, SplitReceipt};

struct EngineState<S, R, V> {
    store: S,
    registry: R,
    vault: V,
    gate: AccessGate,
    fees: FeeSchedule,
    treasury: Address,
    events: EventBus,
}

/// The vesting-certificate ledger engine.
///
/// Holder operations read time from `C`; the `*_at` variants take an
/// explicit timestamp instead.
pub struct VestingEngine<S, R, V, C = SystemClock> {
    state: Mutex<EngineState<S, R, V>>,
    clock: C,
}

impl<S, R, V> VestingEngine<S, R, V, SystemClock>
where
    S: AllocationStore,
    R: CertificateRegistry,
    V: TokenVault,
{
    /// Build an engine on wall-clock time, plus the writer capability for the
    /// grant-issuance subsystem.
    pub fn new(
        config: &EngineConfig,
        store: S,
        registry: R,
        vault: V,
    ) -> Result<(Self, WriterCapability), LedgerError> {
        Self::with_clock(config, store, registry, vault, SystemClock)
    }
}

impl<S, R, V, C> VestingEngine<S, R, V, C>
where
    S: AllocationStore,
    R: CertificateRegistry,
    V: TokenVault,
    C: Clock,
{
    /// Build an engine reading time from `clock`.
    pub fn with_clock(
        config: &EngineConfig,
        store: S,
        registry: R,
        vault: V,
        clock: C,
    ) -> Result<(Self, WriterCapability), LedgerError> {
        config.validate()?;
        let fees = config.fee_schedule()?;
        let (gate, capability) = AccessGate::new(config.admin.clone());
        let state = EngineState {
            store,
            registry,
            vault,
            gate,
            fees,
            treasury: config.treasury.clone(),
            events: EventBus::new(),
        };
        tracing::info!(
            admin = %config.admin,
            treasury = %config.treasury,
            split_fee = %fees.split,
            merge_fee = %fees.merge,
            "vesting engine initialised"
        );
        Ok((
            Self {
                state: Mutex::new(state),
                clock,
            },
            capability,
        ))
    }

    fn lock(&self) -> MutexGuard<'_, EngineState<S, R, V>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an event listener. Listeners run while the engine lock is held.
    pub fn subscribe(&self, listener: Box<dyn Fn(&EngineEvent) + Send + Sync>) {
        self.lock().events.subscribe(listener);
    }

    // ── Allocation ledger ───────────────────────────────────────────────

    /// Append one flow to `cert_id`, creating its allocation on first use.
    pub fn create_or_append(
        &self,
        capability: &WriterCapability,
        cert_id: CertId,
        grant: GrantFlow,
        token: TokenId,
        provenance: Provenance,
    ) -> Result<Allocation, LedgerError> {
        let mut state = self.lock();
        state.gate.ensure_writer(capability)?;

        let existing = state.store.get(cert_id)?;
        let allocation = append_flow(existing, cert_id, grant, token, provenance)?;
        state.store.put(&allocation)?;

        let flow_index = allocation.flow_count() - 1;
        tracing::info!(
            %cert_id,
            token = %allocation.token,
            flow_index,
            amount = grant.amount,
            "allocation flow appended"
        );
        state.publish(EngineEvent::AllocationAppended {
            cert_id,
            token: allocation.token.clone(),
            flow_index,
            flow: allocation.flows[flow_index],
        });
        Ok(allocation)
    }

    /// Snapshot of a certificate's allocation, `None` if it is not live.
    pub fn read(&self, cert_id: CertId) -> Result<Option<Allocation>, LedgerError> {
        Ok(self.lock().store.get(cert_id)?)
    }

    /// Ids of every live allocation.
    pub fn certificates(&self) -> Result<Vec<CertId>, LedgerError> {
        Ok(self
            .lock()
            .store
            .iter()?
            .into_iter()
            .map(|a| a.cert_id)
            .collect())
    }

    // ── Holder operations ───────────────────────────────────────────────

    /// Pay out everything vested on `cert_id` to its owner.
    pub fn claim(&self, cert_id: CertId, caller: &Address) -> Result<ClaimReceipt, LedgerError> {
        self.claim_at(cert_id, caller, self.clock.now())
    }

    /// [`claim`](Self::claim) at an explicit time.
    pub fn claim_at(
        &self,
        cert_id: CertId,
        caller: &Address,
        now: Timestamp,
    ) -> Result<ClaimReceipt, LedgerError> {
        let mut state = self.lock();
        state.gate.ensure_live()?;
        state.ensure_no_approvals(cert_id)?;
        state.ensure_owner(cert_id, caller)?;
        let allocation = state.load(cert_id)?;

        let plan = plan_claim(&allocation, now)?;
        let token = allocation.token.clone();

        state.atomically(|state, journal| {
            if plan.fully_claimed {
                journal.delete(&state.store, cert_id)?;
            } else {
                journal.put(&state.store, &plan.updated)?;
            }
            if plan.total > 0 {
                journal.transfer(&mut state.vault, &token, caller, plan.total)?;
            }
            if plan.fully_claimed {
                state.registry.burn(&[cert_id])?;
            }
            Ok(())
        })?;

        tracing::info!(
            %cert_id,
            owner = %caller,
            %token,
            total = plan.total,
            fully_claimed = plan.fully_claimed,
            "claim committed"
        );
        for (flow_index, delta) in plan.deltas.iter().enumerate().filter(|(_, d)| **d > 0) {
            tracing::debug!(%cert_id, flow_index, delta, "flow claimed");
        }
        state.publish(EngineEvent::Claimed {
            cert_id,
            owner: caller.clone(),
            token,
            deltas: plan.deltas.clone(),
            total: plan.total,
            fully_claimed: plan.fully_claimed,
            timestamp: now,
        });

        Ok(ClaimReceipt {
            cert_id,
            total: plan.total,
            deltas: plan.deltas,
            fully_claimed: plan.fully_claimed,
        })
    }

    /// Replace `cert_id` by one certificate per percentage, each holding that
    /// share of every flow.
    pub fn split(
        &self,
        cert_id: CertId,
        percentages: &[BasisPoints],
        caller: &Address,
    ) -> Result<SplitReceipt, LedgerError> {
        self.split_at(cert_id, percentages, caller, self.clock.now())
    }

    pub fn split_at(
        &self,
        cert_id: CertId,
        percentages: &[BasisPoints],
        caller: &Address,
        now: Timestamp,
    ) -> Result<SplitReceipt, LedgerError> {
        let mut state = self.lock();
        state.gate.ensure_live()?;
        state.ensure_owner(cert_id, caller)?;
        let source = state.load(cert_id)?;

        let plan = plan_split(&source, percentages, state.fees.split)?;
        let treasury = state.treasury.clone();

        let children = state.atomically(|state, journal| {
            let mut minted = Vec::with_capacity(plan.children.len());
            for _ in &plan.children {
                minted.push(journal.mint(&mut state.registry, caller)?);
            }
            journal.delete(&state.store, cert_id)?;
            for (child_id, flows) in minted.iter().zip(&plan.children) {
                let child = Allocation {
                    cert_id: *child_id,
                    token: source.token.clone(),
                    provenance: source.provenance,
                    flows: flows.clone(),
                };
                journal.put(&state.store, &child)?;
            }
            if plan.fee > 0 {
                journal.transfer(&mut state.vault, &source.token, &treasury, plan.fee)?;
            }
            state.registry.burn(&[cert_id])?;
            Ok(minted)
        })?;

        tracing::info!(
            %cert_id,
            owner = %caller,
            token = %source.token,
            children = children.len(),
            fee = plan.fee,
            "split committed"
        );
        state.publish(EngineEvent::Split {
            source: cert_id,
            owner: caller.clone(),
            children: children.iter().copied().zip(plan.children).collect(),
            fee: plan.fee,
            timestamp: now,
        });

        Ok(SplitReceipt {
            source: cert_id,
            children,
            fee: plan.fee,
        })
    }

    /// Combine the flows of `cert_ids` into a single new certificate.
    pub fn merge(&self, cert_ids: &[CertId], caller: &Address) -> Result<MergeReceipt, LedgerError> {
        self.merge_at(cert_ids, caller, self.clock.now())
    }

    pub fn merge_at(
        &self,
        cert_ids: &[CertId],
        caller: &Address,
        now: Timestamp,
    ) -> Result<MergeReceipt, LedgerError> {
        validate_merge_ids(cert_ids)?;
        let mut state = self.lock();
        state.gate.ensure_live()?;
        let mut sources = Vec::with_capacity(cert_ids.len());
        for id in cert_ids {
            state.ensure_owner(*id, caller)?;
            sources.push(state.load(*id)?);
        }
        ensure_same_token(&sources)?;
        for id in cert_ids {
            state.ensure_no_approvals(*id)?;
        }

        let plan = plan_merge(&sources, state.fees.merge)?;
        let first = &sources[0];
        let token = first.token.clone();
        let treasury = state.treasury.clone();

        let merged = state.atomically(|state, journal| {
            let merged = journal.mint(&mut state.registry, caller)?;
            for id in cert_ids {
                journal.delete(&state.store, *id)?;
            }
            let destination = Allocation {
                cert_id: merged,
                token: token.clone(),
                provenance: first.provenance,
                flows: plan.flows.clone(),
            };
            journal.put(&state.store, &destination)?;
            if plan.fee > 0 {
                journal.transfer(&mut state.vault, &token, &treasury, plan.fee)?;
            }
            state.registry.burn(cert_ids)?;
            Ok(merged)
        })?;

        tracing::info!(
            %merged,
            owner = %caller,
            %token,
            sources = cert_ids.len(),
            flows = plan.flows.len(),
            fee = plan.fee,
            "merge committed"
        );
        state.publish(EngineEvent::Merged {
            merged,
            sources: cert_ids.to_vec(),
            owner: caller.clone(),
            flows: plan.flows,
            fee: plan.fee,
            timestamp: now,
        });

        Ok(MergeReceipt {
            merged,
            sources: cert_ids.to_vec(),
            fee: plan.fee,
        })
    }

    // ── Queries ─────────────────────────────────────────────────────────

    /// What a claim on `cert_id` would pay right now. No owner or pause checks.
    pub fn quote(&self, cert_id: CertId) -> Result<ClaimQuote, LedgerError> {
        self.quote_at(cert_id, self.clock.now())
    }

    pub fn quote_at(&self, cert_id: CertId, now: Timestamp) -> Result<ClaimQuote, LedgerError> {
        let state = self.lock();
        let allocation = state.load(cert_id)?;
        quote(&allocation, now)
    }

    /// Total unclaimed balance owed across live certificates backed by `token`.
    pub fn outstanding(&self, token: &TokenId) -> Result<u128, LedgerError> {
        let state = self.lock();
        outstanding(&state.store.iter()?, token)
    }

    /// Check that custody holds at least what the ledger owes in `token`.
    pub fn audit(&self, token: &TokenId) -> Result<(), LedgerError> {
        let state = self.lock();
        let owed = outstanding(&state.store.iter()?, token)?;
        let custody = state.vault.custodial_balance(token);
        if owed > custody {
            tracing::error!(%token, owed, custody, "conservation invariant violated");
            return Err(LedgerError::ConservationViolated {
                token: token.clone(),
                outstanding: owed,
                custody,
            });
        }
        Ok(())
    }

    pub fn is_paused(&self) -> bool {
        self.lock().gate.is_paused()
    }

    pub fn fees(&self) -> FeeSchedule {
        self.lock().fees
    }

    pub fn treasury(&self) -> Address {
        self.lock().treasury.clone()
    }

    /// Run `f` against the certificate registry under the engine lock.
    ///
    /// The engine owns its registry, so this is how the grant-issuance
    /// subsystem mints certificates before appending flows to them, and how
    /// transfers and approvals reach the registry without racing an operation.
    pub fn with_registry<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(&mut self.lock().registry)
    }

    /// Run `f` against the token vault under the engine lock.
    ///
    /// Used to fund custody for new grants and to read balances.
    pub fn with_vault<T>(&self, f: impl FnOnce(&mut V) -> T) -> T {
        f(&mut self.lock().vault)
    }

    // ── Administration ──────────────────────────────────────────────────

    pub fn pause(&self, caller: &Address) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.gate.pause(caller).inspect_err(|e| {
            tracing::warn!(%caller, error = %e, "pause rejected");
        })?;
        tracing::info!(%caller, "engine paused");
        state.publish(EngineEvent::Paused);
        Ok(())
    }

    pub fn unpause(&self, caller: &Address) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.gate.unpause(caller).inspect_err(|e| {
            tracing::warn!(%caller, error = %e, "unpause rejected");
        })?;
        tracing::info!(%caller, "engine unpaused");
        state.publish(EngineEvent::Unpaused);
        Ok(())
    }

    pub fn set_treasury(&self, caller: &Address, treasury: Address) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.gate.ensure_admin(caller).inspect_err(|_| {
            tracing::warn!(%caller, "treasury change rejected");
        })?;
        state.treasury = treasury.clone();
        tracing::info!(%treasury, "treasury changed");
        state.publish(EngineEvent::TreasuryChanged { treasury });
        Ok(())
    }

    pub fn set_fee_rates(
        &self,
        caller: &Address,
        split_bps: u32,
        merge_bps: u32,
    ) -> Result<(), LedgerError> {
        let mut state = self.lock();
        state.gate.ensure_admin(caller).inspect_err(|_| {
            tracing::warn!(%caller, "fee change rejected");
        })?;
        let fees = FeeSchedule::new(split_bps, merge_bps)?;
        state.fees = fees;
        tracing::info!(split = %fees.split, merge = %fees.merge, "fee rates changed");
        state.publish(EngineEvent::FeeRatesChanged { fees });
        Ok(())
    }
}

impl<S, R, V> EngineState<S, R, V>
where
    S: AllocationStore,
    R: CertificateRegistry,
    V: TokenVault,
{
    fn load(&self, cert_id: CertId) -> Result<Allocation, LedgerError> {
        self.store
            .get(cert_id)?
            .ok_or(LedgerError::CertificateNotFound(cert_id))
    }

    fn ensure_owner(&self, cert_id: CertId, caller: &Address) -> Result<(), LedgerError> {
        match self.registry.owner_of(cert_id) {
            None => Err(LedgerError::CertificateNotFound(cert_id)),
            Some(owner) if owner == *caller => Ok(()),
            Some(_) => Err(LedgerError::NotOwner {
                cert_id,
                caller: caller.clone(),
            }),
        }
    }

    fn ensure_no_approvals(&self, cert_id: CertId) -> Result<(), LedgerError> {
        if !self.registry.has_zero_approvals(cert_id) {
            return Err(LedgerError::HasOutstandingApprovals(cert_id));
        }
        Ok(())
    }

    /// Run `op`, unwinding every journaled effect if it fails.
    fn atomically<T>(
        &mut self,
        op: impl FnOnce(&mut Self, &mut Journal) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut journal = Journal::new();
        match op(self, &mut journal) {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::warn!(%error, "operation failed, rolling back");
                journal.rollback(&self.store, &mut self.registry, &mut self.vault);
                Err(error)
            }
        }
    }

    fn publish(&self, event: EngineEvent) {
        if tracing::enabled!(tracing::Level::TRACE) {
            if let Ok(json) = serde_json::to_string(&event) {
                tracing::trace!(event = %json, "publishing event");
            }
        }
        self.events.emit(&event);
    }
}
