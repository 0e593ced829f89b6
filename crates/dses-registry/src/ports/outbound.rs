//! # Driven Ports (SPI - Outbound)
//!
//! Interfaces the registry consumes from the ledger runtime:
//! - World state (key-value reads and writes inside the current transaction)
//! - Invoker identity
//! - Token transfers
//!
//! All three are scoped to one invocation. Writes become visible to other
//! invocations only when the runtime commits the enclosing transaction.

use crate::domain::{Address, IdentityError, LedgerError, TransferError, U256};
use async_trait::async_trait;

// =============================================================================
// WORLD STATE
// =============================================================================

/// Transactional key-value access.
#[async_trait]
pub trait WorldState: Send + Sync {
    /// Read a value.
    ///
    /// # Returns
    ///
    /// * `Some(bytes)` - If the key holds a value
    /// * `None` - If the key is absent
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write a value.
    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Delete a value. Deleting an absent key is not an error.
    async fn delete_state(&self, key: &str) -> Result<(), LedgerError>;

    /// Scan `[start, end)` in key order. An empty bound is unbounded.
    async fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Resolves who is invoking the current transaction.
#[async_trait]
pub trait InvokerIdentity: Send + Sync {
    /// Address of the current invoker.
    async fn invoker_address(&self) -> Result<Address, IdentityError>;
}

// =============================================================================
// TOKEN TRANSFER
// =============================================================================

/// Moves token units from the invoker's account.
#[async_trait]
pub trait TokenTransfer: Send + Sync {
    /// Transfer `amount` units of `token` from the invoker to `to`.
    async fn transfer(&self, to: &Address, token: &str, amount: U256)
        -> Result<(), TransferError>;
}
