//! DSES-Sim: scripted chaincode invocations against an in-memory ledger.
//!
//! A script seeds token balances and then lists invocations in order:
//!
//! ```json
//! {
//!   "balances": [{ "address": "addr-m", "token": "INK", "amount": "100" }],
//!   "invocations": [
//!     { "invoker": "addr-a", "function": "registerUser", "args": ["alice", "weather"] }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use dses_registry::domain::parse_amount;
use dses_registry::{InMemoryLedger, Response};
use dses_telemetry::log_invocation;

/// Initial balance credited before any invocation runs.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceEntry {
    /// Holder address.
    pub address: String,
    /// Token name.
    pub token: String,
    /// Decimal amount.
    pub amount: String,
}

/// One scripted chaincode call.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    /// Address the call is submitted from.
    pub invoker: String,
    /// Chaincode function name.
    pub function: String,
    /// Positional string arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

/// A full simulation script.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Balances minted up front.
    #[serde(default)]
    pub balances: Vec<BalanceEntry>,
    /// Calls executed in order.
    #[serde(default)]
    pub invocations: Vec<Invocation>,
}

impl Script {
    /// Read and parse a script file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse script {}", path.display()))
    }
}

/// Printed outcome of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Function that was called.
    pub function: String,
    /// 200 or 500.
    pub status: i32,
    /// Error message, empty on success.
    pub message: String,
    /// Payload decoded as UTF-8.
    pub payload: String,
}

impl Outcome {
    fn new(function: &str, response: &Response) -> Self {
        Self {
            function: function.to_string(),
            status: response.status,
            message: response.message.clone(),
            payload: response.payload_str(),
        }
    }
}

/// Seed the ledger and run every invocation.
pub async fn run(ledger: &InMemoryLedger, script: &Script) -> Result<Vec<Outcome>> {
    for entry in &script.balances {
        let amount = parse_amount(&entry.amount).with_context(|| {
            format!("bad balance for {} / {}", entry.address, entry.token)
        })?;
        ledger.mint(entry.address.as_str(), &entry.token, amount);
    }

    let mut outcomes = Vec::with_capacity(script.invocations.len());
    for (step, call) in script.invocations.iter().enumerate() {
        let response = ledger
            .invoke(call.invoker.as_str(), &call.function, &call.args)
            .await;
        if response.is_ok() {
            log_invocation!(info, call.function, call.invoker, response.status, step);
        } else {
            log_invocation!(
                warn,
                call.function,
                call.invoker,
                response.status,
                step,
                error = %response.message
            );
        }
        outcomes.push(Outcome::new(&call.function, &response));
    }
    Ok(outcomes)
}
