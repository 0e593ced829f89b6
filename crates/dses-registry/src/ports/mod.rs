//! Ports layer: the inbound registry API and the outbound runtime traits.

pub mod inbound;
pub mod outbound;

pub use inbound::ServiceRegistryApi;
pub use outbound::{InvokerIdentity, TokenTransfer, WorldState};
