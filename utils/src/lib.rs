//! Shared utilities for the Vesta vesting ledger.

pub mod logging;

pub use logging::{init_logging, init_tracing, LogFormat};
