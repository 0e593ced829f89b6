//! # Registry Service
//!
//! Implements [`ServiceRegistryApi`] over the three outbound ports. Each call
//! builds the components it needs on top of the invocation's ports and runs
//! them to completion; nothing is cached between calls.

use super::composition::CompositionResolver;
use super::incentives::IncentiveEngine;
use super::services::ServiceCatalog;
use super::users::UserRegistry;
use crate::adapters::EntityRepository;
use crate::config::RegistryConfig;
use crate::domain::{Address, RangeRecord, RegistryResult, Service, ServiceStatus, Token, User, U256};
use crate::ports::{InvokerIdentity, ServiceRegistryApi, TokenTransfer, WorldState};
use async_trait::async_trait;
use std::sync::Arc;

/// Registry service bound to one invocation's ports.
pub struct RegistryService<S: ?Sized, I: ?Sized, T: ?Sized> {
    state: Arc<S>,
    identity: Arc<I>,
    transfer: Arc<T>,
    config: RegistryConfig,
}

impl<S, I, T> RegistryService<S, I, T>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
    T: TokenTransfer + ?Sized,
{
    /// Create a service over the given ports.
    pub fn new(state: Arc<S>, identity: Arc<I>, transfer: Arc<T>, config: RegistryConfig) -> Self {
        Self {
            state,
            identity,
            transfer,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    fn repo(&self) -> EntityRepository<'_, S> {
        EntityRepository::new(self.state.as_ref())
    }

    fn users(&self) -> UserRegistry<'_, S, I> {
        UserRegistry::new(self.repo(), self.identity.as_ref())
    }

    fn catalog(&self) -> ServiceCatalog<'_, S, I> {
        ServiceCatalog::new(self.repo(), self.identity.as_ref())
    }

    fn engine(&self) -> IncentiveEngine<'_, S, I, T> {
        IncentiveEngine::new(
            self.repo(),
            self.identity.as_ref(),
            self.transfer.as_ref(),
            &self.config,
        )
    }

    /// Resolve a mashup's references without creating it.
    pub async fn resolve_composition(
        &self,
        referenced: &[String],
    ) -> RegistryResult<super::ResolvedComposition> {
        CompositionResolver::new(self.repo()).resolve(referenced).await
    }
}

#[async_trait]
impl<S, I, T> ServiceRegistryApi for RegistryService<S, I, T>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
    T: TokenTransfer + ?Sized,
{
    async fn register_user(&self, name: &str, introduction: &str) -> RegistryResult<User> {
        self.users().register(name, introduction).await
    }

    async fn remove_user(&self, name: &str) -> RegistryResult<()> {
        self.users().remove(name).await
    }

    async fn query_user(&self, name: &str) -> RegistryResult<User> {
        self.users().lookup(name).await
    }

    async fn init_account(
        &self,
        token_name: &str,
        total_supply: U256,
        decimals: u32,
        address: Address,
    ) -> RegistryResult<Token> {
        self.engine()
            .issue_initial_supply(token_name, total_supply, decimals, address)
            .await
    }

    async fn register_service(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        owner: &str,
    ) -> RegistryResult<Service> {
        self.catalog()
            .register(name, service_type, description, owner)
            .await
    }

    async fn invalidate_service(&self, name: &str) -> RegistryResult<Service> {
        self.catalog().set_status(name, ServiceStatus::Invalid).await
    }

    async fn publish_service(&self, name: &str) -> RegistryResult<Service> {
        self.catalog().set_status(name, ServiceStatus::Available).await
    }

    async fn query_service(&self, name: &str) -> RegistryResult<Service> {
        self.catalog().query(name).await
    }

    async fn edit_service(&self, name: &str, field: &str, value: &str) -> RegistryResult<Service> {
        self.catalog().edit(name, field, value).await
    }

    async fn create_mashup(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        referenced: &[String],
    ) -> RegistryResult<Service> {
        self.engine()
            .create_mashup(name, service_type, description, referenced)
            .await
    }

    async fn query_service_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> RegistryResult<Vec<RangeRecord>> {
        self.catalog().query_by_range(start_key, end_key).await
    }

    async fn reward_service(
        &self,
        service_name: &str,
        reward_type: &str,
        amount: U256,
    ) -> RegistryResult<User> {
        self.engine()
            .fixed_reward(service_name, reward_type, amount)
            .await
    }

    async fn gives_token(
        &self,
        reward_type: &str,
        user_name: &str,
        policy_code: &str,
    ) -> RegistryResult<U256> {
        self.engine()
            .grant_by_policy(reward_type, user_name, policy_code)
            .await
    }

    async fn invoke_service(&self, service_name: &str) -> RegistryResult<User> {
        self.engine().record_invocation(service_name).await
    }
}
