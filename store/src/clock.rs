//! Time source for the ledger engine.

use vesta_types::Timestamp;

/// Where the engine reads "now" from when a holder operation does not
/// supply an explicit time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time from the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}
