// Change another user's permission set.
//
// Rules
// - Requires `ReadAndModify` on the Users axis.
// - A user can never change their own permissions, whatever the values.
// - Granting project modification without user read access is rejected:
//   assigning users to a project requires being able to list users.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::users::ports::{UserRepository, UserRepositoryError};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};
use crate::shared::core::permission::PermissionSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum UpdateUserPermissionsError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify users")]
    UnauthorizedUser,

    #[error("users may not modify their own permissions")]
    CannotModifyPermissionsOfSelf,

    #[error("project modification requires user read access")]
    IncompatibleUserPermissionsCombination,

    #[error("no user with this id")]
    UnknownUserId,
}

pub struct UpdateUserPermissionsUseCase<R>
where
    R: UserRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    users: Arc<R>,
}

impl<R> UpdateUserPermissionsUseCase<R>
where
    R: UserRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, users: Arc<R>) -> Self {
        Self { resolver, users }
    }

    pub async fn execute(
        &self,
        user_id: Uuid,
        permissions: PermissionSet,
    ) -> Result<(), UpdateUserPermissionsError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                UpdateUserPermissionsError::UnauthenticatedUser,
                UpdateUserPermissionsError::Unknown,
            )
        })?;
        if !caller.permissions.users.can_modify() {
            return Err(UpdateUserPermissionsError::UnauthorizedUser);
        }
        if caller.id == user_id {
            return Err(UpdateUserPermissionsError::CannotModifyPermissionsOfSelf);
        }
        if permissions.projects.can_modify() && !permissions.users.can_read() {
            return Err(UpdateUserPermissionsError::IncompatibleUserPermissionsCombination);
        }

        self.users
            .update_permissions(user_id, permissions)
            .await
            .map_err(|e| match e {
                UserRepositoryError::NotFound => UpdateUserPermissionsError::UnknownUserId,
                other => {
                    error!(error = %other, %user_id, "permission update failed");
                    UpdateUserPermissionsError::Unknown
                }
            })
    }
}

#[cfg(test)]
mod update_user_permissions_tests {
    use super::*;
    use crate::modules::users::adapters::in_memory::InMemoryUserStore;
    use crate::shared::core::permission::UserPermission;
    use crate::test_support::fixtures::{FailingResolver, FixedResolver, make_user};
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> Arc<InMemoryUserStore> {
        Arc::new(InMemoryUserStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_update_the_permissions_of_another_user(
        before_each: Arc<InMemoryUserStore>,
    ) {
        let store = before_each;
        let target = make_user("Billie");
        store.insert(target.clone()).await;
        let use_case =
            UpdateUserPermissionsUseCase::new(Arc::new(FixedResolver::admin()), store.clone());
        let requested = PermissionSet {
            entries: UserPermission::ReadAndModify,
            exports: UserPermission::Read,
            projects: UserPermission::None,
            users: UserPermission::None,
        };
        use_case.execute(target.id, requested).await.unwrap();
        let row = store.get_user(target.id).await.unwrap().unwrap();
        assert_eq!(row.permissions, requested);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_caller_without_users_modify(before_each: Arc<InMemoryUserStore>) {
        let store = before_each;
        let target = make_user("Billie");
        store.insert(target.clone()).await;
        let mut permissions = PermissionSet::full();
        permissions.users = UserPermission::Read;
        let use_case = UpdateUserPermissionsUseCase::new(
            Arc::new(FixedResolver::with_permissions(permissions)),
            store,
        );
        assert_eq!(
            use_case.execute(target.id, PermissionSet::full()).await,
            Err(UpdateUserPermissionsError::UnauthorizedUser)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_always_block_a_self_change(before_each: Arc<InMemoryUserStore>) {
        let resolver = FixedResolver::admin();
        let own_id = resolver.user_id();
        let use_case = UpdateUserPermissionsUseCase::new(Arc::new(resolver), before_each);
        for requested in [
            PermissionSet::full(),
            PermissionSet::entries_only(),
            PermissionSet::default(),
        ] {
            assert_eq!(
                use_case.execute(own_id, requested).await,
                Err(UpdateUserPermissionsError::CannotModifyPermissionsOfSelf)
            );
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_project_modify_without_user_read(
        before_each: Arc<InMemoryUserStore>,
    ) {
        let store = before_each;
        let target = make_user("Billie");
        store.insert(target.clone()).await;
        let use_case = UpdateUserPermissionsUseCase::new(Arc::new(FixedResolver::admin()), store);
        let requested = PermissionSet {
            entries: UserPermission::None,
            exports: UserPermission::None,
            projects: UserPermission::ReadAndModify,
            users: UserPermission::None,
        };
        assert_eq!(
            use_case.execute(target.id, requested).await,
            Err(UpdateUserPermissionsError::IncompatibleUserPermissionsCombination)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_surface_an_unknown_target(before_each: Arc<InMemoryUserStore>) {
        let use_case =
            UpdateUserPermissionsUseCase::new(Arc::new(FixedResolver::admin()), before_each);
        assert_eq!(
            use_case
                .execute(Uuid::now_v7(), PermissionSet::entries_only())
                .await,
            Err(UpdateUserPermissionsError::UnknownUserId)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_map_unauthenticated_resolution(before_each: Arc<InMemoryUserStore>) {
        let use_case = UpdateUserPermissionsUseCase::new(
            Arc::new(FailingResolver::unauthenticated()),
            before_each,
        );
        assert_eq!(
            use_case
                .execute(Uuid::now_v7(), PermissionSet::entries_only())
                .await,
            Err(UpdateUserPermissionsError::UnauthenticatedUser)
        );
    }
}
