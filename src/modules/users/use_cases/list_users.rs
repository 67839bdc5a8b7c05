// List all registered users, for the administration screens that assign
// users to projects and manage permissions.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::modules::users::core::user::User;
use crate::modules::users::ports::UserRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ListUsersError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not read users")]
    UnauthorizedUser,
}

pub struct ListUsersUseCase<R>
where
    R: UserRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    users: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, users: Arc<R>) -> Self {
        Self { resolver, users }
    }

    pub async fn execute(&self) -> Result<Vec<User>, ListUsersError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                ListUsersError::UnauthenticatedUser,
                ListUsersError::Unknown,
            )
        })?;
        if !caller.permissions.users.can_read() {
            return Err(ListUsersError::UnauthorizedUser);
        }
        self.users.list_users().await.map_err(|e| {
            error!(error = %e, "listing users failed");
            ListUsersError::Unknown
        })
    }
}
