//! Events emitted after every committed mutation.

use serde::Serialize;
use vesta_types::{Address, CertId, Flow, Timestamp, TokenId};

use crate::fee::FeeSchedule;

/// Engine-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// The trusted writer appended a flow to a certificate.
    AllocationAppended {
        cert_id: CertId,
        token: TokenId,
        flow_index: usize,
        flow: Flow,
    },
    /// A holder claimed vested tokens.
    Claimed {
        cert_id: CertId,
        owner: Address,
        token: TokenId,
        /// Amount claimed from each flow, index-parallel to the certificate's flows.
        deltas: Vec<u128>,
        total: u128,
        /// Every flow is settled and the certificate was burned.
        fully_claimed: bool,
        timestamp: Timestamp,
    },
    /// A certificate was split; each child is listed with its full flow list.
    Split {
        source: CertId,
        owner: Address,
        children: Vec<(CertId, Vec<Flow>)>,
        /// Fee paid to the treasury, zero when fees are off.
        fee: u128,
        timestamp: Timestamp,
    },
    /// Several certificates were merged into one.
    Merged {
        merged: CertId,
        sources: Vec<CertId>,
        owner: Address,
        flows: Vec<Flow>,
        fee: u128,
        timestamp: Timestamp,
    },
    Paused,
    Unpaused,
    TreasuryChanged {
        treasury: Address,
    },
    FeeRatesChanged {
        fees: FeeSchedule,
    },
}

/// Synchronous fan-out event bus for engine events.
///
/// Listeners are invoked inline on the emitting thread while the engine lock
/// is held; keep handlers fast and never call back into the engine.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&EngineEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&EngineEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &EngineEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
