//! # Adapters
//!
//! - `repository`: typed, key-prefixed JSON access over any [`WorldState`](crate::ports::WorldState)
//! - `memory_ledger`: transactional in-memory runtime implementing every outbound port

pub mod memory_ledger;
pub mod repository;

pub use memory_ledger::{InMemoryLedger, LedgerTransaction, TransferRecord};
pub use repository::EntityRepository;
