//! # DSES Registry
//!
//! User/service registry and developer incentive chaincode for the
//! Decentralized Service Eco-System.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): records, value objects, invariants, errors
//!   - `User`, `Service` (plain services and mashups), `Token`
//!   - `RegistryError` with its seven failure categories
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `ServiceRegistryApi`: Driving port (inbound API)
//!   - `WorldState`, `InvokerIdentity`, `TokenTransfer`: Driven ports
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `AuthorizationGuard`, `UserRegistry`, `ServiceCatalog`,
//!     `CompositionResolver`, `IncentiveEngine`
//!   - `RegistryService`: Implements `ServiceRegistryApi`
//!
//! - **Handler Layer** (`handler/`): function-name dispatch
//!   - `ChaincodeHandler`: positional string arguments in, `Response` out
//!
//! - **Adapters Layer** (`adapters/`)
//!   - `EntityRepository`: key prefixing + JSON encoding
//!   - `InMemoryLedger`: transactional runtime for tests and simulation
//!
//! ## Ledger Layout
//!
//! | Record | Key |
//! |--------|-----|
//! | User | `USER_<name>` |
//! | Service / mashup | `SER_<name>` |
//! | Token | `<tokenName>` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use dses_registry::InMemoryLedger;
//! use dses_registry::U256;
//!
//! let ledger = InMemoryLedger::new();
//! ledger.mint("addr-m", "INK", U256::from(100));
//!
//! ledger.invoke("addr-a", "registerUser", &["alice", "weather APIs"]).await;
//! ledger.invoke("addr-a", "registerService", &["forecast", "rest", "7-day", "alice"]).await;
//! let response = ledger
//!     .invoke("addr-m", "createMashup", &["trip", "app", "planner", "forecast"])
//!     .await;
//! assert!(response.is_ok());
//! ```

#![warn(missing_docs)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod handler;
pub mod ports;
pub mod service;

// Re-export main types
pub use adapters::{EntityRepository, InMemoryLedger, LedgerTransaction, TransferRecord};
pub use config::{IncentiveAction, IncentivePolicy, RegistryConfig};
pub use domain::{
    Address, EditableField, EntityKind, ErrorCategory, IdentityError, LedgerError, RangeRecord,
    RegistryError, RegistryResult, Service, ServiceStatus, Token, TokenStatus, TransferError, User,
    U256,
};
pub use handler::{ChaincodeHandler, Function, Response};
pub use ports::{InvokerIdentity, ServiceRegistryApi, TokenTransfer, WorldState};
pub use service::{
    AuthorizationGuard, CompositionResolver, IncentiveEngine, RegistryService,
    ResolvedComposition, ServiceCatalog, UserRegistry,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
