// List all projects with their members and invoice items.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::modules::projects::core::project::Project;
use crate::modules::projects::ports::ProjectRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ListProjectsError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not read projects")]
    UnauthorizedUser,
}

pub struct ListProjectsUseCase<P>
where
    P: ProjectRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
}

impl<P> ListProjectsUseCase<P>
where
    P: ProjectRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, projects: Arc<P>) -> Self {
        Self { resolver, projects }
    }

    pub async fn execute(&self) -> Result<Vec<Project>, ListProjectsError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                ListProjectsError::UnauthenticatedUser,
                ListProjectsError::Unknown,
            )
        })?;
        if !caller.permissions.projects.can_read() {
            return Err(ListProjectsError::UnauthorizedUser);
        }
        self.projects.list().await.map_err(|e| {
            error!(error = %e, "listing projects failed");
            ListProjectsError::Unknown
        })
    }
}

#[cfg(test)]
mod list_projects_tests {
    use super::*;
    use crate::modules::projects::adapters::in_memory::InMemoryProjectStore;
    use crate::shared::core::permission::{PermissionSet, UserPermission};
    use crate::test_support::fixtures::{FailingResolver, FixedResolver};
    use rstest::{fixture, rstest};

    #[fixture]
    fn before_each() -> Arc<InMemoryProjectStore> {
        Arc::new(InMemoryProjectStore::new())
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_list_projects_for_a_reader(before_each: Arc<InMemoryProjectStore>) {
        let permissions = PermissionSet {
            projects: UserPermission::Read,
            ..PermissionSet::default()
        };
        let use_case = ListProjectsUseCase::new(
            Arc::new(FixedResolver::with_permissions(permissions)),
            before_each,
        );
        assert_eq!(use_case.execute().await.unwrap(), vec![]);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_caller_without_projects_read(
        before_each: Arc<InMemoryProjectStore>,
    ) {
        let use_case = ListProjectsUseCase::new(
            Arc::new(FixedResolver::with_permissions(PermissionSet::entries_only())),
            before_each,
        );
        assert_eq!(
            use_case.execute().await,
            Err(ListProjectsError::UnauthorizedUser)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_map_unauthenticated_resolution(before_each: Arc<InMemoryProjectStore>) {
        let use_case =
            ListProjectsUseCase::new(Arc::new(FailingResolver::unauthenticated()), before_each);
        assert_eq!(
            use_case.execute().await,
            Err(ListProjectsError::UnauthenticatedUser)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_collapse_store_failures_to_unknown(before_each: Arc<InMemoryProjectStore>) {
        let store = before_each;
        store.toggle_offline();
        let use_case = ListProjectsUseCase::new(Arc::new(FixedResolver::admin()), store);
        assert_eq!(use_case.execute().await, Err(ListProjectsError::Unknown));
    }
}
