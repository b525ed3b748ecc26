//! Fundamental types for the Vesta vesting ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! addresses, certificate and token identifiers, timestamps, basis points,
//! vesting flows and the per-certificate allocation record.

pub mod address;
pub mod allocation;
pub mod bps;
pub mod error;
pub mod flow;
pub mod id;
pub mod provenance;
pub mod time;

pub use address::Address;
pub use allocation::{Allocation, MAX_FLOWS};
pub use bps::{BasisPoints, BASIS_POINT};
pub use error::TypesError;
pub use flow::{Flow, FlowState, GrantFlow};
pub use id::{CertId, TokenId};
pub use provenance::{ProjectKind, Provenance};
pub use time::Timestamp;
