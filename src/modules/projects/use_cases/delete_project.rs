// Delete a project and everything logged under it.
//
// Cascades are explicit: entries and customizations tied to the project's
// invoice items are removed here before the project row goes.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::customizations::ports::CustomizationRepository;
use crate::modules::entries::ports::EntryRepository;
use crate::modules::projects::ports::{ProjectRepository, ProjectRepositoryError};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum DeleteProjectError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify projects")]
    UnauthorizedUser,

    #[error("no project with this id")]
    UnknownProjectId,
}

pub struct DeleteProjectUseCase<P, E, C>
where
    P: ProjectRepository + 'static,
    E: EntryRepository + 'static,
    C: CustomizationRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
    entries: Arc<E>,
    customizations: Arc<C>,
}

impl<P, E, C> DeleteProjectUseCase<P, E, C>
where
    P: ProjectRepository + 'static,
    E: EntryRepository + 'static,
    C: CustomizationRepository + 'static,
{
    pub fn new(
        resolver: Arc<dyn ResolveUser>,
        projects: Arc<P>,
        entries: Arc<E>,
        customizations: Arc<C>,
    ) -> Self {
        Self {
            resolver,
            projects,
            entries,
            customizations,
        }
    }

    pub async fn execute(&self, project_id: Uuid) -> Result<(), DeleteProjectError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                DeleteProjectError::UnauthenticatedUser,
                DeleteProjectError::Unknown,
            )
        })?;
        if !caller.permissions.projects.can_modify() {
            return Err(DeleteProjectError::UnauthorizedUser);
        }

        let project = self
            .projects
            .get(project_id)
            .await
            .map_err(|e| {
                error!(error = %e, %project_id, "loading project failed");
                DeleteProjectError::Unknown
            })?
            .ok_or(DeleteProjectError::UnknownProjectId)?;

        let item_ids: Vec<Uuid> = project.invoice_items.iter().map(|i| i.id).collect();
        if !item_ids.is_empty() {
            self.entries
                .delete_for_invoice_items(&item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "entry cascade failed");
                    DeleteProjectError::Unknown
                })?;
            self.customizations
                .delete_for_invoice_items(&item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "customization cascade failed");
                    DeleteProjectError::Unknown
                })?;
        }

        self.projects.delete(project_id).await.map_err(|e| match e {
            ProjectRepositoryError::NotFound => DeleteProjectError::UnknownProjectId,
            other => {
                error!(error = %other, %project_id, "project delete failed");
                DeleteProjectError::Unknown
            }
        })
    }
}
