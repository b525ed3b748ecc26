//! Nullable infrastructure for deterministic testing.
//!
//! The ledger engine talks to its collaborators (certificate registry, token
//! vault) only through the traits in `vesta-store`. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically, including injected failures
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod registry;
pub mod vault;

pub use clock::NullClock;
pub use registry::NullRegistry;
pub use vault::NullVault;
