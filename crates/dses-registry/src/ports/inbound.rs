//! Inbound Ports (Driving Ports)
//!
//! The operations the registry exposes to the invocation dispatcher. Each
//! call is one all-or-nothing unit of work inside the runtime's transaction.

use async_trait::async_trait;

use crate::domain::{Address, RangeRecord, RegistryResult, Service, Token, User, U256};

/// Primary registry API (Driving Port)
#[async_trait]
pub trait ServiceRegistryApi: Send + Sync {
    /// Register a user bound to the invoker's address.
    async fn register_user(&self, name: &str, introduction: &str) -> RegistryResult<User>;

    /// Hard-delete a user.
    async fn remove_user(&self, name: &str) -> RegistryResult<()>;

    /// Fetch a user.
    async fn query_user(&self, name: &str) -> RegistryResult<User>;

    /// Issue `total_supply` units of `token_name` to `address`.
    ///
    /// Repeating the call with identical address and supply issues again.
    async fn init_account(
        &self,
        token_name: &str,
        total_supply: U256,
        decimals: u32,
        address: Address,
    ) -> RegistryResult<Token>;

    /// Register a plain service owned by `owner`, who must be the invoker.
    async fn register_service(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        owner: &str,
    ) -> RegistryResult<Service>;

    /// Set a service's status to `invalid`.
    async fn invalidate_service(&self, name: &str) -> RegistryResult<Service>;

    /// Set a service's status to `available`.
    async fn publish_service(&self, name: &str) -> RegistryResult<Service>;

    /// Fetch a service or mashup.
    async fn query_service(&self, name: &str) -> RegistryResult<Service>;

    /// Edit `Type` or `Description` and refresh the update time.
    ///
    /// Returns the record as stored after the edit, not the pre-edit
    /// bytes. Any other field name fails with
    /// [`RegistryError::InvalidArgument`](crate::domain::RegistryError::InvalidArgument)
    /// and writes nothing.
    async fn edit_service(&self, name: &str, field: &str, value: &str)
        -> RegistryResult<Service>;

    /// Create a mashup over existing services and pay their developers.
    async fn create_mashup(
        &self,
        name: &str,
        service_type: &str,
        description: &str,
        referenced: &[String],
    ) -> RegistryResult<Service>;

    /// Numbered listing of every stored record. The bounds are accepted
    /// but not applied.
    async fn query_service_by_range(
        &self,
        start_key: &str,
        end_key: &str,
    ) -> RegistryResult<Vec<RangeRecord>>;

    /// Pay `amount` of `reward_type` to a service's developer.
    async fn reward_service(
        &self,
        service_name: &str,
        reward_type: &str,
        amount: U256,
    ) -> RegistryResult<User>;

    /// Pay the policy-table amount for `policy_code` to a user.
    async fn gives_token(
        &self,
        reward_type: &str,
        user_name: &str,
        policy_code: &str,
    ) -> RegistryResult<U256>;

    /// Record a usage of a service (developer token +2, no payment).
    async fn invoke_service(&self, service_name: &str) -> RegistryResult<User>;
}
