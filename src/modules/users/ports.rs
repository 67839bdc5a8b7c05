// Ports define what the users module needs from the outside world, without implementing it.
//
// Responsibilities
// - Keep the use cases independent of any database or auth middleware by coding against traits.
//
// Testing guidance
// - In memory implementations live in `adapters::in_memory`.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::users::core::user::{IdentityClaims, NewUser, User};
use crate::shared::core::permission::PermissionSet;

/// Exposes the ambient identity claims of the current request, if any.
pub trait IdentitySource: Send + Sync {
    fn claims(&self) -> Option<IdentityClaims>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum UserRepositoryError {
    #[default]
    #[error("unknown user repository error")]
    Unknown,

    #[error("user not found")]
    NotFound,

    #[error("a user with this external id already exists")]
    DuplicateExternalId,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_external_id(
        &self,
        external_id: &str,
        provider: &str,
    ) -> Result<Option<User>, UserRepositoryError>;

    async fn save_new_user(&self, new_user: NewUser) -> Result<User, UserRepositoryError>;

    /// Best-effort identity refresh when the external name/e-mail drifted.
    async fn update_user_identity(
        &self,
        user_id: Uuid,
        name: &str,
        email: &str,
    ) -> Result<(), UserRepositoryError>;

    /// Whether any user holds `ReadAndModify` on all four axes.
    async fn admin_exists(&self) -> Result<bool, UserRepositoryError>;

    async fn list_users(&self) -> Result<Vec<User>, UserRepositoryError>;

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, UserRepositoryError>;

    async fn update_permissions(
        &self,
        user_id: Uuid,
        permissions: PermissionSet,
    ) -> Result<(), UserRepositoryError>;
}
