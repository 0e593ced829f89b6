//! # Domain Errors
//!
//! Error types for the registry and its outbound ports.
//!
//! Every failure is fatal to the invocation that produced it: the operation
//! aborts, the enclosing transaction is discarded and the `Display` text is
//! returned to the caller.

use super::value_objects::{Address, U256};
use std::fmt;
use thiserror::Error;

// =============================================================================
// ENTITY KINDS
// =============================================================================

/// The kind of record a lookup was aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A registered user.
    User,
    /// A plain service or a mashup.
    Service,
    /// An issued token.
    Token,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Service => f.write_str("service"),
            Self::Token => f.write_str("token"),
        }
    }
}

// =============================================================================
// PORT ERRORS
// =============================================================================

/// Failures reported by the world-state port.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The ledger could not be reached.
    #[error("ledger unavailable")]
    Unavailable,

    /// Stored data could not be read back.
    #[error("ledger corruption detected at key {0}")]
    Corrupted(String),

    /// A key read by the transaction was committed by another one since.
    #[error("write conflict on key {0}")]
    Conflict(String),

    /// Any other ledger failure, verbatim.
    #[error("ledger error: {0}")]
    Other(String),
}

/// Failures reported by the token transfer primitive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The paying account does not hold enough of the token.
    #[error("insufficient {token} balance: required {required}, available {available}")]
    InsufficientBalance {
        /// Token being moved.
        token: String,
        /// Amount requested.
        required: U256,
        /// Amount held by the payer.
        available: U256,
    },

    /// Crediting the recipient would overflow 256 bits.
    #[error("balance overflow")]
    Overflow,

    /// The runtime refused the transfer.
    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Failures resolving the invoking identity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The runtime attached no identity to this invocation.
    #[error("fail to get the sender's address")]
    Unresolved,
}

// =============================================================================
// REGISTRY ERRORS
// =============================================================================

/// The seven failure categories an operation can end in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Referenced user/service/token absent.
    NotFound,
    /// Duplicate create.
    AlreadyExists,
    /// Invoker does not match the bound address.
    Unauthorized,
    /// Malformed argument.
    InvalidArgument,
    /// Token re-issuance mismatch.
    ConsistencyConflict,
    /// Transfer primitive refused.
    TransferFailure,
    /// Underlying ledger or decode failure.
    RepositoryFailure,
}

/// Errors returned by registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A referenced record does not exist.
    #[error("this {kind} does not exist: {name}")]
    NotFound {
        /// Kind of record.
        kind: EntityKind,
        /// Name that was looked up.
        name: String,
    },

    /// A record with the same name already exists.
    #[error("this {kind} already exists: {name}")]
    AlreadyExists {
        /// Kind of record.
        kind: EntityKind,
        /// Colliding name.
        name: String,
    },

    /// The invoker is not the address bound to the record.
    #[error("authority error: invoker {invoker} is not the bound address {expected}")]
    Unauthorized {
        /// Resolved invoker address.
        invoker: Address,
        /// Address bound to the developer/owner.
        expected: Address,
    },

    /// The invoker's identity could not be resolved.
    #[error("authority error: {0}")]
    Identity(#[from] IdentityError),

    /// Malformed or unrecognized argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Token re-issuance does not match the stored record.
    #[error("consistency conflict: {0}")]
    ConsistencyConflict(String),

    /// The transfer primitive rejected a payment.
    #[error("transfer failure: {0}")]
    TransferFailure(#[from] TransferError),

    /// The world state failed.
    #[error("repository failure: {0}")]
    RepositoryFailure(#[from] LedgerError),

    /// A stored record could not be encoded or decoded.
    #[error("repository failure: cannot decode {key}: {reason}")]
    Serialization {
        /// Ledger key involved.
        key: String,
        /// Decoder message.
        reason: String,
    },
}

impl RegistryError {
    /// Shorthand for a missing record.
    pub fn not_found(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Shorthand for a duplicate record.
    pub fn already_exists(kind: EntityKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            name: name.into(),
        }
    }

    /// Maps the error onto its failure category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::AlreadyExists { .. } => ErrorCategory::AlreadyExists,
            Self::Unauthorized { .. } | Self::Identity(_) => ErrorCategory::Unauthorized,
            Self::InvalidArgument(_) => ErrorCategory::InvalidArgument,
            Self::ConsistencyConflict(_) => ErrorCategory::ConsistencyConflict,
            Self::TransferFailure(_) => ErrorCategory::TransferFailure,
            Self::RepositoryFailure(_) | Self::Serialization { .. } => {
                ErrorCategory::RepositoryFailure
            }
        }
    }
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
