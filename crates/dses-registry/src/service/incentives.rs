//! # Incentive Engine
//!
//! Token issuance, fixed rewards, usage credits, policy-table grants and
//! the mashup fan-out that pays every contributing developer once.
//!
//! All payments go through [`TokenTransfer`] and are drawn from the
//! invoker's account.

use super::authorization::AuthorizationGuard;
use super::composition::CompositionResolver;
use super::users::UserRegistry;
use crate::adapters::EntityRepository;
use crate::config::RegistryConfig;
use crate::domain::invariants::{check_issuable_invariant, check_reissue_invariant};
use crate::domain::{
    ledger_timestamp, Address, EntityKind, RegistryError, RegistryResult, Service, Token, User,
    U256,
};
use crate::ports::{InvokerIdentity, TokenTransfer, WorldState};
use chrono::Utc;
use tracing::{error, info, instrument, warn};

/// Developer-token credit for a paid reward or a mashup contribution.
pub const REWARD_CREDIT: u64 = 1;

/// Developer-token credit for one recorded invocation.
pub const INVOCATION_CREDIT: u64 = 2;

/// Incentive operations for one invocation.
pub struct IncentiveEngine<'a, S: ?Sized, I: ?Sized, T: ?Sized> {
    repo: EntityRepository<'a, S>,
    guard: AuthorizationGuard<'a, S, I>,
    users: UserRegistry<'a, S, I>,
    resolver: CompositionResolver<'a, S>,
    transfer: &'a T,
    config: &'a RegistryConfig,
}

impl<'a, S, I, T> IncentiveEngine<'a, S, I, T>
where
    S: WorldState + ?Sized,
    I: InvokerIdentity + ?Sized,
    T: TokenTransfer + ?Sized,
{
    /// Create an engine over the invocation's ports.
    pub fn new(
        repo: EntityRepository<'a, S>,
        identity: &'a I,
        transfer: &'a T,
        config: &'a RegistryConfig,
    ) -> Self {
        Self {
            repo,
            guard: AuthorizationGuard::new(repo, identity),
            users: UserRegistry::new(repo, identity),
            resolver: CompositionResolver::new(repo),
            transfer,
            config,
        }
    }

    async fn pay(&self, to: &Address, token: &str, amount: U256) -> RegistryResult<()> {
        self.transfer.transfer(to, token, amount).await.map_err(|e| {
            error!(to = %to, token, amount = %amount, error = %e, "transfer failed");
            RegistryError::from(e)
        })
    }

    /// Issue `total_supply` of `token_name` to `address`.
    ///
    /// A repeated issuance with the same address and supply passes and
    /// transfers again. The stored status stays `Created`.
    #[instrument(skip_all, fields(token = %token_name, amount = %total_supply, to = %address))]
    pub async fn issue_initial_supply(
        &self,
        token_name: &str,
        total_supply: U256,
        decimals: u32,
        address: Address,
    ) -> RegistryResult<Token> {
        let token = match self.repo.find_token(token_name).await? {
            None => Token::new(token_name, total_supply, decimals, address.clone()),
            Some(existing) => {
                if !check_issuable_invariant(&existing) {
                    warn!(status = ?existing.status, "token not in created status");
                    return Err(RegistryError::ConsistencyConflict(format!(
                        "token {token_name} is not in created status"
                    )));
                }
                if !check_reissue_invariant(&existing, &address, total_supply) {
                    warn!(
                        stored_address = %existing.address,
                        stored_supply = %existing.total_supply,
                        "token re-issuance mismatch"
                    );
                    return Err(RegistryError::ConsistencyConflict(format!(
                        "token {token_name} info does not match the stored record"
                    )));
                }
                existing
            }
        };

        self.pay(&address, token_name, total_supply).await?;
        self.repo.put_token(&token).await?;
        info!("token issued");
        Ok(token)
    }

    /// Pay `amount` of `reward_type` to the developer of `service_name`.
    #[instrument(skip_all, fields(service = %service_name, token = %reward_type, amount = %amount))]
    pub async fn fixed_reward(
        &self,
        service_name: &str,
        reward_type: &str,
        amount: U256,
    ) -> RegistryResult<User> {
        let service = self.repo.service(service_name).await?;
        let developer = self.users.lookup(&service.developer).await?;

        self.pay(&developer.address, reward_type, amount).await?;
        let developer = self
            .users
            .credit_developer_token(&developer.name, REWARD_CREDIT)
            .await?;
        info!(developer = %developer.name, "service rewarded");
        Ok(developer)
    }

    /// Credit the developer of `service_name` for one usage. No payment.
    #[instrument(skip_all, fields(service = %service_name))]
    pub async fn record_invocation(&self, service_name: &str) -> RegistryResult<User> {
        let service = self.repo.service(service_name).await?;
        let developer = self
            .users
            .credit_developer_token(&service.developer, INVOCATION_CREDIT)
            .await?;
        info!(developer = %developer.name, "service invocation recorded");
        Ok(developer)
    }

    /// Pay the policy-table amount for `policy_code` to `user_name`.
    #[instrument(skip_all, fields(user = %user_name, token = %reward_type, code = %policy_code))]
    pub async fn grant_by_policy(
        &self,
        reward_type: &str,
        user_name: &str,
        policy_code: &str,
    ) -> RegistryResult<U256> {
        let amount = self.config.policy.amount_for_code(policy_code).map_err(|e| {
            warn!(error = %e, "unknown incentive code");
            e
        })?;
        let user = self.users.lookup(user_name).await?;

        self.pay(&user.address, reward_type, amount).await?;
        info!(amount = %amount, "policy reward granted");
        Ok(amount)
    }

    /// Create mashup `name` over `referenced` and pay each unique
    /// contributing developer the mashup incentive once.
    ///
    /// Developers are paid in lexicographic order. Any failure aborts the
    /// whole operation.
    #[instrument(skip_all, fields(mashup = %name, references = referenced.len()))]
    pub async fn create_mashup(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        referenced: &[String],
    ) -> RegistryResult<Service> {
        let creator = self.guard.invoker().await?;
        let resolved = self.resolver.resolve(referenced).await?;

        if self.repo.service_exists(name).await? {
            warn!("mashup name already registered");
            return Err(RegistryError::already_exists(EntityKind::Service, name));
        }

        let token = self.config.incentive_token.as_str();
        let amount = self.config.mashup_incentive;
        for developer_name in &resolved.developers {
            let developer = self
                .repo
                .find_user(developer_name)
                .await?
                .ok_or_else(|| RegistryError::not_found(EntityKind::User, developer_name.as_str()))?;

            self.pay(&developer.address, token, amount).await?;
            self.users
                .credit_developer_token(&developer.name, REWARD_CREDIT)
                .await?;
            info!(developer = %developer.name, token, amount = %amount, "mashup incentive paid");
        }

        let mashup = Service::new_mashup(
            name,
            service_type,
            description,
            creator.as_str(),
            ledger_timestamp(Utc::now()),
            resolved.composition,
        );
        self.repo.put_service(&mashup).await?;
        info!(
            developers = resolved.developers.len(),
            "mashup registered"
        );
        Ok(mashup)
    }
}
