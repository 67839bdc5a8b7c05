// Shared test fixtures: stub resolvers and entity builders used across the
// use case test modules.

use async_trait::async_trait;
use uuid::Uuid;

use crate::modules::users::core::user::{ResolvedUser, User};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, ResolveUserError};
use crate::shared::core::permission::PermissionSet;

/// Resolver stub that always yields the same user.
pub struct FixedResolver {
    user: ResolvedUser,
}

impl FixedResolver {
    pub fn for_user(id: Uuid, permissions: PermissionSet) -> Self {
        Self {
            user: ResolvedUser {
                id,
                name: "Alex".to_string(),
                email: "alex@example.com".to_string(),
                permissions,
            },
        }
    }

    pub fn with_permissions(permissions: PermissionSet) -> Self {
        Self::for_user(Uuid::now_v7(), permissions)
    }

    pub fn admin() -> Self {
        Self::with_permissions(PermissionSet::full())
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

#[async_trait]
impl ResolveUser for FixedResolver {
    async fn resolve(&self) -> Result<ResolvedUser, ResolveUserError> {
        Ok(self.user.clone())
    }
}

/// Resolver stub that always fails.
pub struct FailingResolver {
    error: ResolveUserError,
}

impl FailingResolver {
    pub fn unauthenticated() -> Self {
        Self {
            error: ResolveUserError::UserNotAuthenticated,
        }
    }

    pub fn unknown() -> Self {
        Self {
            error: ResolveUserError::Unknown,
        }
    }
}

#[async_trait]
impl ResolveUser for FailingResolver {
    async fn resolve(&self) -> Result<ResolvedUser, ResolveUserError> {
        Err(self.error.clone())
    }
}

pub fn make_user(name: &str) -> User {
    User {
        id: Uuid::now_v7(),
        external_id: format!("ext-{}", name.to_lowercase()),
        provider: "github".to_string(),
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        permissions: PermissionSet::entries_only(),
    }
}
