//! Abstract storage and collaborator traits for the Vesta vesting ledger.
//!
//! The ledger engine depends only on these traits: the allocation store it
//! persists certificates into, the certificate registry that owns the
//! ownership certificates, the token vault that holds custody of the
//! vesting assets, and the clock it reads time from. [`MemoryStore`] is the
//! in-process allocation backend.

pub mod allocation;
pub mod clock;
pub mod error;
pub mod memory;
pub mod registry;
pub mod vault;

pub use allocation::AllocationStore;
pub use clock::{Clock, SystemClock};
pub use error::{RegistryError, StoreError, VaultError};
pub use memory::MemoryStore;
pub use registry::CertificateRegistry;
pub use vault::TokenVault;
