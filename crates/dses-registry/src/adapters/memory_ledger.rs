//! # In-Memory Ledger
//!
//! A transactional key-value ledger with token balances, used as the runtime
//! for tests and for the chaincode simulator.
//!
//! [`InMemoryLedger::begin`] opens a [`LedgerTransaction`] that implements all
//! three outbound ports. Writes, deletes and transfers are buffered in the
//! transaction and reach the committed state only on
//! [`LedgerTransaction::commit`]; dropping the transaction discards them.
//!
//! Every committed key carries a version. A transaction remembers the
//! version of each committed key it reads, and its commit fails with
//! [`LedgerError::Conflict`] if any of them has moved on since. Keys that
//! appear in the committed state after a range read are not detected.

use crate::config::RegistryConfig;
use crate::domain::{Address, IdentityError, LedgerError, TransferError, U256};
use crate::handler::{ChaincodeHandler, Response};
use crate::ports::{InvokerIdentity, TokenTransfer, WorldState};
use crate::service::RegistryService;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

type BalanceKey = (Address, String);

/// A committed token movement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferRecord {
    /// Transaction that carried the transfer.
    pub tx_id: Uuid,
    /// Paying account (the invoker).
    pub from: Address,
    /// Receiving account.
    pub to: Address,
    /// Token moved.
    pub token: String,
    /// Units moved.
    pub amount: U256,
}

/// Committed key space plus per-key commit versions.
#[derive(Debug, Default)]
struct Committed {
    entries: BTreeMap<String, Vec<u8>>,
    /// Bumped on every committed write or delete; absent means 0.
    versions: HashMap<String, u64>,
}

impl Committed {
    fn version(&self, key: &str) -> u64 {
        self.versions.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
struct LedgerInner {
    state: RwLock<Committed>,
    balances: RwLock<HashMap<BalanceKey, U256>>,
    transfers: RwLock<Vec<TransferRecord>>,
    unavailable: AtomicBool,
}

impl LedgerInner {
    fn balance(&self, address: &Address, token: &str) -> U256 {
        self.balances
            .read()
            .get(&(address.clone(), token.to_string()))
            .copied()
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), LedgerError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(LedgerError::Unavailable)
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// LEDGER
// =============================================================================

/// Shared handle to an in-memory ledger. Clones see the same state.
#[derive(Clone, Debug, Default)]
pub struct InMemoryLedger {
    inner: Arc<LedgerInner>,
    config: RegistryConfig,
}

impl InMemoryLedger {
    /// Create an empty ledger with the default registry configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty ledger running the registry with `config`.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            inner: Arc::default(),
            config,
        }
    }

    /// Open a transaction for `invoker`.
    pub fn begin(&self, invoker: impl Into<Address>) -> LedgerTransaction {
        LedgerTransaction::new(Arc::clone(&self.inner), Some(invoker.into()))
    }

    /// Open a transaction with no resolvable invoker.
    #[must_use]
    pub fn begin_anonymous(&self) -> LedgerTransaction {
        LedgerTransaction::new(Arc::clone(&self.inner), None)
    }

    /// Run one chaincode invocation in its own transaction.
    ///
    /// The transaction is committed only when the response is OK.
    pub async fn invoke<A: AsRef<str>>(
        &self,
        invoker: impl Into<Address>,
        function: &str,
        args: &[A],
    ) -> Response {
        let tx = Arc::new(self.begin(invoker));
        let args: Vec<String> = args.iter().map(|a| a.as_ref().to_string()).collect();

        let service = RegistryService::new(
            Arc::clone(&tx),
            Arc::clone(&tx),
            Arc::clone(&tx),
            self.config.clone(),
        );
        let response = ChaincodeHandler::new(service).invoke(function, &args).await;

        if !response.is_ok() {
            debug!(tx_id = %tx.id(), function, "invocation failed, discarding transaction");
            return response;
        }

        match tx.commit() {
            Ok(()) => response,
            Err(e) => {
                warn!(tx_id = %tx.id(), function, error = %e, "commit failed");
                Response::error(e.to_string())
            }
        }
    }

    /// Credit `amount` of `token` to `address` outside any transaction.
    pub fn mint(&self, address: impl Into<Address>, token: &str, amount: U256) {
        let mut balances = self.inner.balances.write();
        let entry = balances
            .entry((address.into(), token.to_string()))
            .or_default();
        *entry = entry.saturating_add(amount);
    }

    /// Committed balance.
    #[must_use]
    pub fn balance(&self, address: impl Into<Address>, token: &str) -> U256 {
        self.inner.balance(&address.into(), token)
    }

    /// Every committed transfer, in commit order.
    #[must_use]
    pub fn transfers(&self) -> Vec<TransferRecord> {
        self.inner.transfers.read().clone()
    }

    /// Committed value at `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.state.read().entries.get(key).cloned()
    }

    /// Committed keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.inner.state.read().entries.keys().cloned().collect()
    }

    /// Make every world-state call fail with [`LedgerError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

#[derive(Clone, Debug)]
struct PendingTransfer {
    from: Address,
    to: Address,
    token: String,
    amount: U256,
}

/// One open transaction. Implements [`WorldState`], [`InvokerIdentity`] and
/// [`TokenTransfer`] for the registry.
#[derive(Debug)]
pub struct LedgerTransaction {
    tx_id: Uuid,
    ledger: Arc<LedgerInner>,
    invoker: Option<Address>,
    /// `None` marks a delete.
    writes: RwLock<BTreeMap<String, Option<Vec<u8>>>>,
    /// Committed version of every key read, taken at first read.
    reads: RwLock<HashMap<String, u64>>,
    transfers: RwLock<Vec<PendingTransfer>>,
}

impl LedgerTransaction {
    fn new(ledger: Arc<LedgerInner>, invoker: Option<Address>) -> Self {
        Self {
            tx_id: Uuid::new_v4(),
            ledger,
            invoker,
            writes: RwLock::new(BTreeMap::new()),
            reads: RwLock::new(HashMap::new()),
            transfers: RwLock::new(Vec::new()),
        }
    }

    /// Transaction identifier, for logs.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.tx_id
    }

    /// Number of buffered writes and deletes.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.writes.read().len()
    }

    fn observe(&self, key: &str, version: u64) {
        self.reads.write().entry(key.to_string()).or_insert(version);
    }

    /// Balance as seen from inside this transaction.
    fn effective_balance(&self, address: &Address, token: &str) -> Result<U256, TransferError> {
        let mut balance = self.ledger.balance(address, token);
        for t in self.transfers.read().iter().filter(|t| t.token == token) {
            if t.to == *address {
                balance = balance.checked_add(t.amount).ok_or(TransferError::Overflow)?;
            }
            if t.from == *address {
                balance = balance.saturating_sub(t.amount);
            }
        }
        Ok(balance)
    }

    /// Apply every buffered write, delete and transfer to the ledger.
    ///
    /// Buffers are drained; committing twice applies nothing the second time.
    /// Fails with [`LedgerError::Conflict`], applying nothing, when a key this
    /// transaction read was committed by another transaction in the meantime.
    pub fn commit(&self) -> Result<(), LedgerError> {
        self.ledger.check_available()?;

        let writes = std::mem::take(&mut *self.writes.write());
        let transfers = std::mem::take(&mut *self.transfers.write());
        let reads = std::mem::take(&mut *self.reads.write());

        // Held until the writes land so no other commit interleaves.
        let mut state = self.ledger.state.write();
        if let Some((key, _)) = reads.iter().find(|(key, seen)| state.version(key) != **seen) {
            warn!(tx_id = %self.tx_id, key = %key, "stale read, rejecting commit");
            return Err(LedgerError::Conflict(key.clone()));
        }

        // Validate balances before mutating anything.
        let mut balances = self.ledger.balances.write();
        let mut next: HashMap<BalanceKey, U256> = HashMap::new();
        for t in &transfers {
            let from_key = (t.from.clone(), t.token.clone());
            let from = *next
                .entry(from_key.clone())
                .or_insert_with(|| balances.get(&from_key).copied().unwrap_or_default());
            let debited = from.checked_sub(t.amount).ok_or_else(|| {
                LedgerError::Other(format!("insufficient {} balance for {}", t.token, t.from))
            })?;
            next.insert(from_key, debited);

            let to_key = (t.to.clone(), t.token.clone());
            let to = *next
                .entry(to_key.clone())
                .or_insert_with(|| balances.get(&to_key).copied().unwrap_or_default());
            let credited = to
                .checked_add(t.amount)
                .ok_or_else(|| LedgerError::Other(format!("{} balance overflow", t.token)))?;
            next.insert(to_key, credited);
        }
        balances.extend(next);
        drop(balances);

        for (key, value) in &writes {
            match value {
                Some(bytes) => {
                    state.entries.insert(key.clone(), bytes.clone());
                }
                None => {
                    state.entries.remove(key);
                }
            }
            *state.versions.entry(key.clone()).or_insert(0) += 1;
        }
        drop(state);

        let mut log = self.ledger.transfers.write();
        log.extend(transfers.into_iter().map(|t| TransferRecord {
            tx_id: self.tx_id,
            from: t.from,
            to: t.to,
            token: t.token,
            amount: t.amount,
        }));

        info!(tx_id = %self.tx_id, writes = writes.len(), "transaction committed");
        Ok(())
    }
}

fn in_range(key: &str, start: &str, end: &str) -> bool {
    (start.is_empty() || key >= start) && (end.is_empty() || key < end)
}

#[async_trait]
impl WorldState for LedgerTransaction {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.ledger.check_available()?;
        if let Some(pending) = self.writes.read().get(key) {
            return Ok(pending.clone());
        }
        let state = self.ledger.state.read();
        self.observe(key, state.version(key));
        Ok(state.entries.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.ledger.check_available()?;
        self.writes.write().insert(key.to_string(), Some(value));
        Ok(())
    }

    async fn delete_state(&self, key: &str) -> Result<(), LedgerError> {
        self.ledger.check_available()?;
        self.writes.write().insert(key.to_string(), None);
        Ok(())
    }

    async fn get_state_by_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        self.ledger.check_available()?;
        let lower = if start.is_empty() {
            Bound::Unbounded
        } else {
            Bound::Included(start.to_string())
        };

        let state = self.ledger.state.read();
        let mut merged: BTreeMap<String, Vec<u8>> = state
            .entries
            .range((lower, Bound::Unbounded))
            .take_while(|(key, _)| end.is_empty() || key.as_str() < end)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        for key in merged.keys() {
            self.observe(key, state.version(key));
        }
        drop(state);

        for (key, value) in self.writes.read().iter() {
            if !in_range(key, start, end) {
                continue;
            }
            match value {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }

        Ok(merged.into_iter().collect())
    }
}

#[async_trait]
impl InvokerIdentity for LedgerTransaction {
    async fn invoker_address(&self) -> Result<Address, IdentityError> {
        self.invoker.clone().ok_or(IdentityError::Unresolved)
    }
}

#[async_trait]
impl TokenTransfer for LedgerTransaction {
    async fn transfer(&self, to: &Address, token: &str, amount: U256) -> Result<(), TransferError> {
        let from = self
            .invoker
            .clone()
            .ok_or_else(|| TransferError::Rejected("no invoker identity".to_string()))?;

        let available = self.effective_balance(&from, token)?;
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                token: token.to_string(),
                required: amount,
                available,
            });
        }
        if from != *to {
            self.effective_balance(to, token)?
                .checked_add(amount)
                .ok_or(TransferError::Overflow)?;
        }

        debug!(tx_id = %self.tx_id, from = %from, to = %to, token, amount = %amount, "transfer buffered");
        self.transfers.write().push(PendingTransfer {
            from,
            to: to.clone(),
            token: token.to_string(),
            amount,
        });
        Ok(())
    }
}
