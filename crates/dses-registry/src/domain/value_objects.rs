//! # Value Objects
//!
//! Immutable domain primitives for the registry: chain addresses, token
//! amounts, ledger key namespaces and ledger timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export U256 from primitive-types for token amounts
pub use primitive_types::U256;

// =============================================================================
// ADDRESS
// =============================================================================

/// A chain identity as resolved by the runtime for the current invocation.
///
/// Addresses are opaque strings; authorization compares them byte for byte.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from its textual form.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the textual form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// =============================================================================
// KEY NAMESPACES
// =============================================================================

/// Key prefix for user records.
pub const USER_PREFIX: &str = "USER_";

/// Key prefix for service and mashup records (shared namespace).
pub const SERVICE_PREFIX: &str = "SER_";

/// Ledger key of a user record.
#[must_use]
pub fn user_key(name: &str) -> String {
    format!("{USER_PREFIX}{name}")
}

/// Ledger key of a service or mashup record.
#[must_use]
pub fn service_key(name: &str) -> String {
    format!("{SERVICE_PREFIX}{name}")
}

/// Ledger key of a token record. Tokens live under their bare name.
#[must_use]
pub fn token_key(name: &str) -> String {
    name.to_string()
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Unix `date(1)` layout, UTC, day space-padded: `Mon Jan  2 15:04:05 UTC 2006`.
pub const LEDGER_TIME_FORMAT: &str = "%a %b %e %H:%M:%S UTC %Y";

/// Formats a timestamp the way service records store it.
#[must_use]
pub fn ledger_timestamp(at: DateTime<Utc>) -> String {
    at.format(LEDGER_TIME_FORMAT).to_string()
}

// =============================================================================
// AMOUNTS
// =============================================================================

/// Parses a base-10 token amount. Returns `None` for anything that is not a
/// plain non-negative decimal integer fitting in 256 bits.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<U256> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    U256::from_dec_str(raw).ok()
}

/// Serde adapter storing a `U256` as a decimal string.
///
/// `U256`'s own serde and `FromStr` impls use hex, which is not what the
/// ledger records carry.
pub mod u256_decimal {
    use super::U256;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serialize as a decimal string.
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserialize from a decimal string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_amount(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid decimal amount: {raw}")))
    }
}

/// `serde_with` adapter for decimal `U256` values nested in containers.
pub struct DecimalU256;

impl serde_with::SerializeAs<U256> for DecimalU256 {
    fn serialize_as<S: serde::Serializer>(source: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        u256_decimal::serialize(source, serializer)
    }
}

impl<'de> serde_with::DeserializeAs<'de, U256> for DecimalU256 {
    fn deserialize_as<D: serde::Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        u256_decimal::deserialize(deserializer)
    }
}

// =============================================================================
// TESTS
// =============================================================================
