//! # User Registry
//!
//! User creation, removal and lookup, plus the developer-token counter.

use super::authorization::AuthorizationGuard;
use crate::adapters::EntityRepository;
use crate::domain::{EntityKind, RegistryError, RegistryResult, User};
use crate::ports::{InvokerIdentity, WorldState};
use tracing::{info, instrument, warn};

/// User operations for one invocation.
pub struct UserRegistry<'a, S: ?Sized, I: ?Sized> {
    repo: EntityRepository<'a, S>,
    guard: AuthorizationGuard<'a, S, I>,
}

impl<'a, S, I> UserRegistry<'a, S, I>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
{
    /// Create a registry over the invocation's ports.
    pub fn new(repo: EntityRepository<'a, S>, identity: &'a I) -> Self {
        Self {
            repo,
            guard: AuthorizationGuard::new(repo, identity),
        }
    }

    /// Register `name`, bound to the invoker's address.
    #[instrument(skip_all, fields(user = %name))]
    pub async fn register(&self, name: &str, introduction: &str) -> RegistryResult<User> {
        let address = self.guard.invoker().await?;

        if self.repo.find_user(name).await?.is_some() {
            warn!("user already registered");
            return Err(RegistryError::already_exists(EntityKind::User, name));
        }

        let user = User::new(name, introduction, address);
        self.repo.put_user(&user).await?;
        info!(address = %user.address, "user registered");
        Ok(user)
    }

    /// Hard-delete `name`.
    ///
    /// Any invoker may remove any user.
    #[instrument(skip_all, fields(user = %name))]
    pub async fn remove(&self, name: &str) -> RegistryResult<()> {
        self.repo.user(name).await?;
        self.repo.delete_user(name).await?;
        info!("user removed");
        Ok(())
    }

    /// Fetch `name`.
    pub async fn lookup(&self, name: &str) -> RegistryResult<User> {
        self.repo.user(name).await
    }

    /// Add `delta` to the developer token of `name`.
    #[instrument(skip_all, fields(user = %name))]
    pub async fn credit_developer_token(&self, name: &str, delta: u64) -> RegistryResult<User> {
        let mut user = self.repo.user(name).await?;
        user.credit(delta);
        self.repo.put_user(&user).await?;
        info!(
            developer_token = user.developer_token,
            "developer token credited"
        );
        Ok(user)
    }
}
