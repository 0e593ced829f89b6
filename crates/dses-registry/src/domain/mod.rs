//! # Domain Layer
//!
//! Pure records, value objects, invariants and errors. No I/O.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use entities::{EditableField, RangeRecord, Service, ServiceStatus, Token, TokenStatus, User};
pub use errors::{
    EntityKind, ErrorCategory, IdentityError, LedgerError, RegistryError, RegistryResult,
    TransferError,
};
pub use value_objects::{
    ledger_timestamp, parse_amount, service_key, token_key, user_key, Address, DecimalU256, U256,
};
