//! # Authorization Guard
//!
//! Decides whether the current invoker may mutate a record: the invoker's
//! resolved address must be byte-equal to the address bound to the owning
//! user.

use crate::adapters::EntityRepository;
use crate::domain::invariants::check_bound_address_invariant;
use crate::domain::{Address, RegistryError, RegistryResult, User};
use crate::ports::{InvokerIdentity, WorldState};
use tracing::{instrument, warn};

/// Identity-bound authorization checks for one invocation.
pub struct AuthorizationGuard<'a, S: ?Sized, I: ?Sized> {
    repo: EntityRepository<'a, S>,
    identity: &'a I,
}

impl<'a, S, I> AuthorizationGuard<'a, S, I>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
{
    /// Create a guard over the invocation's ports.
    pub fn new(repo: EntityRepository<'a, S>, identity: &'a I) -> Self {
        Self { repo, identity }
    }

    /// The current invoker's address.
    pub async fn invoker(&self) -> RegistryResult<Address> {
        self.identity.invoker_address().await.map_err(|e| {
            warn!(error = %e, "invoker identity unresolved");
            RegistryError::from(e)
        })
    }

    /// Require the invoker to be `bound`. Returns the invoker's address.
    pub async fn authorize_invoker(&self, bound: &Address) -> RegistryResult<Address> {
        let invoker = self.invoker().await?;
        if check_bound_address_invariant(&invoker, bound) {
            Ok(invoker)
        } else {
            warn!(invoker = %invoker, expected = %bound, "authorization rejected");
            Err(RegistryError::Unauthorized {
                invoker,
                expected: bound.clone(),
            })
        }
    }

    /// Require the invoker to be the address bound to user `developer`.
    /// Returns the developer's record.
    #[instrument(skip_all, fields(developer = %developer))]
    pub async fn authorize_developer(&self, developer: &str) -> RegistryResult<User> {
        let user = self.repo.user(developer).await?;
        self.authorize_invoker(&user.address).await?;
        Ok(user)
    }
}
