//! Service layer: the registry components and the [`RegistryService`] that
//! wires them to the outbound ports.

pub mod authorization;
pub mod composition;
pub mod incentives;
pub mod registry_service;
pub mod services;
pub mod users;

pub use authorization::AuthorizationGuard;
pub use composition::{CompositionResolver, ResolvedComposition};
pub use incentives::{IncentiveEngine, INVOCATION_CREDIT, REWARD_CREDIT};
pub use registry_service::RegistryService;
pub use services::ServiceCatalog;
pub use users::UserRegistry;
