// In memory implementation of the UserRepository port.
//
// Purpose
// - Support use case tests and local development without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::users::core::user::{IdentityClaims, NewUser, User};
use crate::modules::users::ports::{IdentitySource, UserRepository, UserRepositoryError};
use crate::shared::core::permission::PermissionSet;

pub struct InMemoryUserStore {
    inner: RwLock<HashMap<Uuid, User>>,
    offline: AtomicBool,
    fail_identity_updates: AtomicBool,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            fail_identity_updates: AtomicBool::new(false),
        }
    }

    /// Fault switch for tests: every call fails with a backend error.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Fault switch for tests: only identity updates fail.
    pub fn toggle_identity_update_failure(&self) {
        self.fail_identity_updates.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), UserRepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(UserRepositoryError::Backend("user store offline".into()));
        }
        Ok(())
    }

    /// Seed a user row directly, bypassing registration. Test setup only.
    pub async fn insert(&self, user: User) {
        self.inner.write().await.insert(user.id, user);
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn get_by_external_id(
        &self,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<User>, UserRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        Ok(guard
            .values()
            .find(|u| u.external_id == external_id && u.provider == provider)
            .cloned())
    }

    async fn save_new_user(&self, new_user: NewUser) -> Result<User, UserRepositoryError> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        if guard
            .values()
            .any(|u| u.external_id == new_user.external_id && u.provider == new_user.provider)
        {
            return Err(UserRepositoryError::DuplicateExternalId);
        }
        let user = User {
            id: Uuid::now_v7(),
            external_id: new_user.external_id,
            provider: new_user.provider,
            name: new_user.name,
            email: new_user.email,
            permissions: new_user.permissions,
        };
        guard.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_user_identity(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<(), UserRepositoryError> {
        self.check_online()?;
        if self.fail_identity_updates.load(Ordering::SeqCst) {
            return Err(UserRepositoryError::Backend("identity update failed".into()));
        }
        let mut guard = self.inner.write().await;
        let user = guard.get_mut(&user_id).ok_or(UserRepositoryError::NotFound)?;
        user.name = name.to_string();
        user.email = email.to_string();
        Ok(())
    }

    async fn admin_exists(&self) -> Result<bool, UserRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        Ok(guard.values().any(|u| u.permissions.is_full()))
    }

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        let mut users: Vec<User> = guard.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError> {
        self.check_online()?;
        Ok(self.inner.read().await.get(&user_id).cloned())
    }

    async fn update_permissions(
        &self,
        user_id: Uuid,
        permissions: PermissionSet,
    ) -> Result<(), UserRepositoryError> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        let user = guard.get_mut(&user_id).ok_or(UserRepositoryError::NotFound)?;
        user.permissions = permissions;
        Ok(())
    }
}

/// Fixed identity claims, the in memory stand-in for the auth middleware.
pub struct StaticIdentitySource {
    claims: Option<IdentityClaims>,
}

impl StaticIdentitySource {
    pub fn anonymous() -> Self {
        Self { claims: None }
    }

    pub fn with_claims(claims: IdentityClaims) -> Self {
        Self {
            claims: Some(claims),
        }
    }
}

impl IdentitySource for StaticIdentitySource {
    fn claims(&self) -> Option<IdentityClaims> {
        self.claims.clone()
    }
}

#[cfg(test)]
mod in_memory_user_store_tests {
    use super::*;
    use rstest::rstest;

    fn make_new_user(external_id: &str) -> NewUser {
        NewUser {
            external_id: external_id.to_string(),
            provider: "github".to_string(),
            name: "Alex".to_string(),
            email: "alex@example.com".to_string(),
            permissions: PermissionSet::entries_only(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_save_and_find_a_user_by_external_id() {
        let store = InMemoryUserStore::new();
        let saved = store.save_new_user(make_new_user("ext-1")).await.unwrap();
        let found = store.get_by_external_id("ext-1", "github").await.unwrap();
        assert_eq!(found, Some(saved));
        let missing = store.get_by_external_id("ext-1", "gitlab").await.unwrap();
        assert_eq!(missing, None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_duplicate_external_id() {
        let store = InMemoryUserStore::new();
        store.save_new_user(make_new_user("ext-1")).await.unwrap();
        let result = store.save_new_user(make_new_user("ext-1")).await;
        assert_eq!(result.unwrap_err(), UserRepositoryError::DuplicateExternalId);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_update_identity_fields_in_place() {
        let store = InMemoryUserStore::new();
        let saved = store.save_new_user(make_new_user("ext-1")).await.unwrap();
        store
            .update_user_identity(saved.id, "Alexandra", "alexandra@example.com")
            .await
            .unwrap();
        let found = store.get_user(saved.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Alexandra");
        assert_eq!(found.email, "alexandra@example.com");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_detect_whether_an_admin_exists() {
        let store = InMemoryUserStore::new();
        store.save_new_user(make_new_user("ext-1")).await.unwrap();
        assert!(!store.admin_exists().await.unwrap());
        let mut admin = make_new_user("ext-2");
        admin.permissions = PermissionSet::full();
        store.save_new_user(admin).await.unwrap();
        assert!(store.admin_exists().await.unwrap());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_every_call_while_offline() {
        let store = InMemoryUserStore::new();
        store.toggle_offline();
        let result = store.get_by_external_id("ext-1", "github").await;
        assert!(matches!(result, Err(UserRepositoryError::Backend(_))));
    }
}
