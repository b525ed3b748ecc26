//! Nullable clock for deterministic vesting time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use vesta_store::Clock;
use vesta_types::Timestamp;

/// A settable clock.
///
/// Clones share one time value, so a test keeps a handle after handing a
/// clone to the engine and moves vesting time forward from outside.
#[derive(Clone, Debug, Default)]
pub struct NullClock {
    secs: Arc<AtomicU64>,
}

impl NullClock {
    pub fn new(initial_secs: u64) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(initial_secs)),
        }
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }
}

impl Clock for NullClock {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.secs.load(Ordering::SeqCst))
    }
}
