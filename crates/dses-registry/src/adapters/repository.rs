//! # Entity Repository
//!
//! Typed access to registry records on top of [`WorldState`]: key prefixing
//! and JSON encoding. No retries; ledger and decode failures surface as-is.

use crate::domain::{
    service_key, token_key, user_key, EntityKind, RegistryError, RegistryResult, Service, Token,
    User,
};
use crate::ports::WorldState;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// Borrowing view over the world state of one invocation.
pub struct EntityRepository<'a, S: ?Sized> {
    state: &'a S,
}

impl<S: ?Sized> Clone for EntityRepository<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: ?Sized> Copy for EntityRepository<'_, S> {}

impl<'a, S: WorldState + ?Sized> EntityRepository<'a, S> {
    /// Wraps a world-state handle.
    pub fn new(state: &'a S) -> Self {
        Self { state }
    }

    // =========================================================================
    // RAW ACCESS
    // =========================================================================

    /// Raw bytes at `key`.
    pub async fn get_raw(&self, key: &str) -> RegistryResult<Option<Vec<u8>>> {
        self.state.get_state(key).await.map_err(|e| {
            error!(key, error = %e, "ledger read failed");
            RegistryError::from(e)
        })
    }

    /// Whether `key` holds a value.
    pub async fn exists(&self, key: &str) -> RegistryResult<bool> {
        Ok(self.get_raw(key).await?.is_some())
    }

    /// Ordered `[start, end)` scan.
    pub async fn scan(&self, start: &str, end: &str) -> RegistryResult<Vec<(String, Vec<u8>)>> {
        self.state.get_state_by_range(start, end).await.map_err(|e| {
            error!(start, end, error = %e, "ledger range scan failed");
            RegistryError::from(e)
        })
    }

    async fn get<T: DeserializeOwned>(&self, key: &str) -> RegistryResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| RegistryError::Serialization {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn put<T: Serialize + Sync>(&self, key: &str, record: &T) -> RegistryResult<()> {
        let bytes = serde_json::to_vec(record).map_err(|e| RegistryError::Serialization {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
        debug!(key, len = bytes.len(), "put state");
        self.state.put_state(key, bytes).await.map_err(|e| {
            error!(key, error = %e, "ledger write failed");
            RegistryError::from(e)
        })
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// User by name, if registered.
    pub async fn find_user(&self, name: &str) -> RegistryResult<Option<User>> {
        self.get(&user_key(name)).await
    }

    /// User by name, `NotFound` if absent.
    pub async fn user(&self, name: &str) -> RegistryResult<User> {
        self.find_user(name)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::User, name))
    }

    /// Store a user under its name.
    pub async fn put_user(&self, user: &User) -> RegistryResult<()> {
        self.put(&user_key(&user.name), user).await
    }

    /// Delete a user record.
    pub async fn delete_user(&self, name: &str) -> RegistryResult<()> {
        let key = user_key(name);
        self.state.delete_state(&key).await.map_err(|e| {
            error!(key = %key, error = %e, "ledger delete failed");
            RegistryError::from(e)
        })
    }

    // =========================================================================
    // SERVICES
    // =========================================================================

    /// Service or mashup by name, if registered.
    pub async fn find_service(&self, name: &str) -> RegistryResult<Option<Service>> {
        self.get(&service_key(name)).await
    }

    /// Service or mashup by name, `NotFound` if absent.
    pub async fn service(&self, name: &str) -> RegistryResult<Service> {
        self.find_service(name)
            .await?
            .ok_or_else(|| RegistryError::not_found(EntityKind::Service, name))
    }

    /// Whether the shared service namespace already holds `name`.
    pub async fn service_exists(&self, name: &str) -> RegistryResult<bool> {
        self.exists(&service_key(name)).await
    }

    /// Store a service or mashup under its name.
    pub async fn put_service(&self, service: &Service) -> RegistryResult<()> {
        self.put(&service_key(&service.name), service).await
    }

    // =========================================================================
    // TOKENS
    // =========================================================================

    /// Token by name, if issued.
    pub async fn find_token(&self, name: &str) -> RegistryResult<Option<Token>> {
        self.get(&token_key(name)).await
    }

    /// Store a token under its bare name.
    pub async fn put_token(&self, token: &Token) -> RegistryResult<()> {
        self.put(&token_key(&token.name), token).await
    }
}
