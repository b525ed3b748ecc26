//! Vesting-certificate ledger.
//!
//! Certificates carry one or more linear vesting flows of a single token.
//! Holders claim vested tokens, split a certificate into proportional children
//! or merge several into one; an administrator can pause holder operations and
//! set the fees charged on splits and merges.

pub mod allocation;
pub mod claim;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod fee;
pub mod gate;
mod journal;
pub mod merge;
pub mod split;
pub mod vesting;

pub use claim::{ClaimQuote, ClaimReceipt};
pub use config::EngineConfig;
pub use engine::VestingEngine;
pub use error::LedgerError;
pub use event::{EngineEvent, EventBus};
pub use fee::{FeeSchedule, MAX_FEE_RATE};
pub use gate::{AccessGate, WriterCapability};
pub use merge::MergeReceipt;
pub use split::SplitReceipt;
