// Ports define what the projects module needs from storage, without implementing it.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::projects::core::project::{
    InvoiceItem, NewInvoiceItem, NewProject, Project, UserInvoiceItem,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum ProjectRepositoryError {
    #[default]
    #[error("unknown project repository error")]
    Unknown,

    #[error("project not found")]
    NotFound,

    #[error("a project with this name already exists")]
    DuplicateName,

    #[error("a referenced user id does not exist")]
    UnknownUserId,

    #[error("backend error: {0}")]
    Backend(String),
}

/// Membership and invoice item deltas computed by the update use case.
/// The repository applies them as given; the diffing itself is use case logic.
#[derive(Debug, Clone)]
pub struct ProjectChanges {
    pub name: String,
    pub enabled: bool,
    pub users_to_add: Vec<Uuid>,
    pub users_to_remove: Vec<Uuid>,
    pub items_to_add: Vec<NewInvoiceItem>,
    pub items_to_update: Vec<InvoiceItem>,
    pub item_ids_to_remove: Vec<Uuid>,
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError>;

    async fn get(&self, project_id: Uuid) -> Result<Option<Project>, ProjectRepositoryError>;

    async fn save_new(&self, project: NewProject) -> Result<Project, ProjectRepositoryError>;

    async fn apply_update(
        &self,
        project_id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Project, ProjectRepositoryError>;

    async fn delete(&self, project_id: Uuid) -> Result<(), ProjectRepositoryError>;

    /// Invoice items of enabled projects the user is a member of.
    async fn user_invoice_items(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserInvoiceItem>, ProjectRepositoryError>;
}
