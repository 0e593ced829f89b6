//! # Service Catalog
//!
//! Service registration, status changes, field edits and queries.
//!
//! ## Status
//!
//! ```text
//!            publish                 invalidate
//!   Created ─────────▶ Available ◀───────────────▶ Invalid
//!      │                  ▲  publish / invalidate     ▲
//!      └──────────────────┴───────────────────────────┘
//! ```
//!
//! Every status may be set from every other status, including itself. The
//! only gate is the developer's authorization.

use super::authorization::AuthorizationGuard;
use super::users::UserRegistry;
use crate::adapters::EntityRepository;
use crate::domain::{
    ledger_timestamp, EditableField, EntityKind, RangeRecord, RegistryError, RegistryResult,
    Service, ServiceStatus,
};
use crate::ports::{InvokerIdentity, WorldState};
use chrono::Utc;
use tracing::{debug, info, instrument, warn};

/// Service operations for one invocation.
pub struct ServiceCatalog<'a, S: ?Sized, I: ?Sized> {
    repo: EntityRepository<'a, S>,
    guard: AuthorizationGuard<'a, S, I>,
    users: UserRegistry<'a, S, I>,
}

impl<'a, S, I> ServiceCatalog<'a, S, I>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
{
    /// Create a catalog over the invocation's ports.
    pub fn new(repo: EntityRepository<'a, S>, identity: &'a I) -> Self {
        Self {
            repo,
            guard: AuthorizationGuard::new(repo, identity),
            users: UserRegistry::new(repo, identity),
        }
    }

    /// Register a plain service owned by `owner`.
    ///
    /// The owner must be the invoker and is credited one developer token.
    #[instrument(skip_all, fields(service = %name, developer = %owner))]
    pub async fn register(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        owner: &str,
    ) -> RegistryResult<Service> {
        self.guard.authorize_developer(owner).await?;

        if self.repo.service_exists(name).await? {
            warn!("service already registered");
            return Err(RegistryError::already_exists(EntityKind::Service, name));
        }

        self.users.credit_developer_token(owner, 1).await?;

        let service = Service::new_service(
            name,
            service_type,
            description,
            owner,
            ledger_timestamp(Utc::now()),
        );
        self.repo.put_service(&service).await?;
        info!("service registered");
        Ok(service)
    }

    /// Set the status of `name` unconditionally.
    #[instrument(skip_all, fields(service = %name, status = %status))]
    pub async fn set_status(&self, name: &str, status: ServiceStatus) -> RegistryResult<Service> {
        let mut service = self.repo.service(name).await?;
        self.guard.authorize_developer(&service.developer).await?;

        let previous = service.status;
        service.status = status;
        self.repo.put_service(&service).await?;
        info!(previous = %previous, "service status set");
        Ok(service)
    }

    /// Change `Type` or `Description` of `name`.
    ///
    /// An unknown field name fails after authorization and writes nothing.
    #[instrument(skip_all, fields(service = %name, field = %field))]
    pub async fn edit(&self, name: &str, field: &str, value: &str) -> RegistryResult<Service> {
        let mut service = self.repo.service(name).await?;
        self.guard.authorize_developer(&service.developer).await?;

        service.updated_time = ledger_timestamp(Utc::now());
        let field = field.parse::<EditableField>().map_err(|reason| {
            warn!(%reason, "edit rejected");
            RegistryError::InvalidArgument(reason)
        })?;
        service.apply_edit(field, value);

        self.repo.put_service(&service).await?;
        info!(updated_time = %service.updated_time, "service edited");
        Ok(service)
    }

    /// Fetch a service or mashup.
    pub async fn query(&self, name: &str) -> RegistryResult<Service> {
        self.repo.service(name).await
    }

    /// Every stored record, numbered from 1 in key order.
    ///
    /// The bounds are accepted but the whole key space is always listed.
    #[instrument(skip_all, fields(start = %start, end = %end))]
    pub async fn query_by_range(&self, start: &str, end: &str) -> RegistryResult<Vec<RangeRecord>> {
        if !start.is_empty() || !end.is_empty() {
            debug!("range bounds ignored, listing full key space");
        }

        let entries = self.repo.scan("", "").await?;
        entries
            .into_iter()
            .zip(1u64..)
            .map(|((key, bytes), number)| {
                serde_json::from_slice(&bytes)
                    .map(|record| RangeRecord { number, record })
                    .map_err(|e| RegistryError::Serialization {
                        key,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}
