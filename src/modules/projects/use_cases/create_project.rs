// Create a project with its initial members and invoice items.
//
// Order is fixed: authenticate, authorize, validate, persist. The repository
// is never touched before authorization and validation pass.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::modules::projects::core::project::{NewProject, Project, name_is_valid};
use crate::modules::projects::ports::{ProjectRepository, ProjectRepositoryError};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum CreateProjectError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify projects")]
    UnauthorizedUser,

    #[error("project name is blank or too long")]
    InvalidProjectName,

    #[error("a project with this name already exists")]
    DuplicateProjectName,

    #[error("the same user appears twice")]
    DuplicateUserId,

    #[error("an invoice item name is blank or too long")]
    InvalidInvoiceItemName,

    #[error("the same invoice item name appears twice")]
    DuplicateInvoiceItemName,

    #[error("a referenced user id does not exist")]
    UnknownUserId,
}

pub struct CreateProjectUseCase<P>
where
    P: ProjectRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
}

impl<P> CreateProjectUseCase<P>
where
    P: ProjectRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, projects: Arc<P>) -> Self {
        Self { resolver, projects }
    }

    pub async fn execute(&self, input: NewProject) -> Result<Project, CreateProjectError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                CreateProjectError::UnauthenticatedUser,
                CreateProjectError::Unknown,
            )
        })?;
        if !caller.permissions.projects.can_modify() {
            return Err(CreateProjectError::UnauthorizedUser);
        }

        validate_new_project(&input)?;

        self.projects.save_new(input).await.map_err(|e| match e {
            ProjectRepositoryError::DuplicateName => CreateProjectError::DuplicateProjectName,
            ProjectRepositoryError::UnknownUserId => CreateProjectError::UnknownUserId,
            other => {
                error!(error = %other, "saving project failed");
                CreateProjectError::Unknown
            }
        })
    }
}

fn validate_new_project(input: &NewProject) -> Result<(), CreateProjectError> {
    if !name_is_valid(&input.name) {
        return Err(CreateProjectError::InvalidProjectName);
    }
    let mut seen_users = HashSet::new();
    if !input.users.iter().all(|u| seen_users.insert(*u)) {
        return Err(CreateProjectError::DuplicateUserId);
    }
    let mut seen_names = HashSet::new();
    for item in &input.invoice_items {
        if !name_is_valid(&item.name) {
            return Err(CreateProjectError::InvalidInvoiceItemName);
        }
        if !seen_names.insert(item.name.as_str()) {
            return Err(CreateProjectError::DuplicateInvoiceItemName);
        }
    }
    Ok(())
}
