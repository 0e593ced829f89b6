//! # Domain Invariants
//!
//! Checks that must hold before the registry writes to the ledger.

use super::entities::{Token, TokenStatus};
use super::value_objects::{Address, U256};

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// Authorization anchor: the invoker must be byte-equal to the bound address.
#[must_use]
pub fn check_bound_address_invariant(invoker: &Address, bound: &Address) -> bool {
    invoker.as_str().as_bytes() == bound.as_str().as_bytes()
}

/// Token lifecycle: an existing token may only be issued again while it is
/// still `Created`.
#[must_use]
pub fn check_issuable_invariant(existing: &Token) -> bool {
    existing.status == TokenStatus::Created
}

/// Token re-issuance: a repeated issuance must target the same address with
/// the same total supply. Decimals are not part of the check.
#[must_use]
pub fn check_reissue_invariant(existing: &Token, address: &Address, total_supply: U256) -> bool {
    existing.address == *address && existing.total_supply == total_supply
}

/// Composition: every referenced service is counted at most once.
#[must_use]
pub fn check_composition_invariant<'a>(counts: impl IntoIterator<Item = &'a u32>) -> bool {
    counts.into_iter().all(|count| *count == 1)
}
