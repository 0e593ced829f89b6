//! # Domain Entities
//!
//! Ledger records managed by the registry. Each record is stored as a
//! field-named JSON document under a namespaced key (see
//! [`value_objects`](super::value_objects)).

use super::value_objects::{u256_decimal, Address, U256};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// USER
// =============================================================================

/// A registered user.
///
/// The address is bound once at registration time from the invoker identity
/// and is the anchor for every later authorization check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user name.
    pub name: String,
    /// Free-text introduction.
    pub introduction: String,
    /// Chain identity bound at registration.
    pub address: Address,
    /// Reserved; never mutated by the registry.
    pub contribution: i64,
    /// Reputation counter credited by service-related actions.
    pub developer_token: u64,
}

impl User {
    /// Creates a fresh user with zeroed counters.
    pub fn new(name: impl Into<String>, introduction: impl Into<String>, address: Address) -> Self {
        Self {
            name: name.into(),
            introduction: introduction.into(),
            address,
            contribution: 0,
            developer_token: 0,
        }
    }

    /// Adds `delta` to the developer token counter.
    pub fn credit(&mut self, delta: u64) {
        self.developer_token = self.developer_token.saturating_add(delta);
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// Lifecycle status of a service or mashup.
///
/// Status is a freely re-settable attribute: any state may be set from any
/// other state by the bound developer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Registered, not yet published.
    #[default]
    Created,
    /// Published.
    Available,
    /// Withdrawn.
    Invalid,
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Available => f.write_str("available"),
            Self::Invalid => f.write_str("invalid"),
        }
    }
}

/// A plain service or a mashup. Both share the `SER_` namespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Unique service name.
    pub name: String,
    /// Free-form category.
    #[serde(rename = "type")]
    pub service_type: String,
    /// Owning user's name (plain services) or the creator's address (mashups).
    pub developer: String,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp.
    pub created_time: String,
    /// Last edit timestamp, empty until the first edit.
    pub updated_time: String,
    /// Lifecycle status.
    pub status: ServiceStatus,
    /// Whether this record is a mashup.
    pub is_mashup: bool,
    /// Invoked services for a mashup; empty for a plain service.
    #[serde(default)]
    pub composition: BTreeMap<String, u32>,
}

impl Service {
    /// Creates a plain service owned by `developer`.
    pub fn new_service(
        name: impl Into<String>,
        service_type: impl Into<String>,
        description: impl Into<String>,
        developer: impl Into<String>,
        created_time: String,
    ) -> Self {
        Self {
            name: name.into(),
            service_type: service_type.into(),
            developer: developer.into(),
            description: description.into(),
            created_time,
            updated_time: String::new(),
            status: ServiceStatus::Created,
            is_mashup: false,
            composition: BTreeMap::new(),
        }
    }

    /// Creates a mashup over an already resolved composition.
    pub fn new_mashup(
        name: impl Into<String>,
        service_type: impl Into<String>,
        description: impl Into<String>,
        developer: impl Into<String>,
        created_time: String,
        composition: BTreeMap<String, u32>,
    ) -> Self {
        Self {
            is_mashup: true,
            composition,
            ..Self::new_service(name, service_type, description, developer, created_time)
        }
    }

    /// Assigns `value` to an editable field.
    pub fn apply_edit(&mut self, field: EditableField, value: impl Into<String>) {
        match field {
            EditableField::Type => self.service_type = value.into(),
            EditableField::Description => self.description = value.into(),
        }
    }
}

/// Fields a developer may change through `editService`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditableField {
    /// The `type` field.
    Type,
    /// The `description` field.
    Description,
}

impl FromStr for EditableField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Type" => Ok(Self::Type),
            "Description" => Ok(Self::Description),
            other => Err(format!("error field name: {other}")),
        }
    }
}

// =============================================================================
// TOKEN
// =============================================================================

/// Issuance status of a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStatus {
    /// Recorded; issuance may be repeated with identical parameters.
    #[default]
    #[serde(rename = "created")]
    Created,
    /// Issued to its target address.
    #[serde(rename = "issued")]
    Delivered,
    /// Withdrawn.
    #[serde(rename = "invalidated")]
    Invalidated,
}

/// An issued token, keyed by its bare name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Token name, also the ledger key.
    #[serde(rename = "tokenName")]
    pub name: String,
    /// Total supply, stored as a decimal string.
    #[serde(with = "u256_decimal")]
    pub total_supply: U256,
    /// Issuance target.
    pub address: Address,
    /// Issuance status.
    pub status: TokenStatus,
    /// Display decimals; recorded, never compared.
    pub decimals: u32,
}

impl Token {
    /// Creates a token record in the `Created` state.
    pub fn new(name: impl Into<String>, total_supply: U256, decimals: u32, address: Address) -> Self {
        Self {
            name: name.into(),
            total_supply,
            address,
            status: TokenStatus::Created,
            decimals,
        }
    }
}

// =============================================================================
// RANGE QUERY RESULT
// =============================================================================

/// One element of the numbered range-query payload.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeRecord {
    /// 1-based position in the result, written as a decimal string.
    #[serde(rename = "Number")]
    #[serde_as(as = "DisplayFromStr")]
    pub number: u64,
    /// The stored record, verbatim.
    #[serde(rename = "Record")]
    pub record: serde_json::Value,
}
