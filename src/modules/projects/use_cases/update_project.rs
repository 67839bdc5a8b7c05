// Replace a project's name, state, membership and invoice items.
//
// The payload carries the desired full state; this use case diffs it against
// the stored project (additions = new minus old, removals = old minus new)
// and drives the cascades itself: entries and customizations tied to removed
// invoice items or removed members are deleted here, not by a storage
// trigger, so behavior is identical across backends.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::customizations::ports::CustomizationRepository;
use crate::modules::entries::ports::EntryRepository;
use crate::modules::projects::core::project::{
    InvoiceItem, NewInvoiceItem, Project, ProjectUpdate, name_is_valid,
};
use crate::modules::projects::ports::{
    ProjectChanges, ProjectRepository, ProjectRepositoryError,
};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum UpdateProjectError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify projects")]
    UnauthorizedUser,

    #[error("no project with this id")]
    UnknownProjectId,

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

    #[error("the same invoice item id appears twice")]
    DuplicateInvoiceItemId,

    #[error("a referenced invoice item id does not belong to this project")]
    UnknownInvoiceItemId,

    #[error("a referenced user id does not exist")]
    UnknownUserId,
}

pub struct UpdateProjectUseCase<P, E, C>
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

impl<P, E, C> UpdateProjectUseCase<P, E, C>
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

    pub async fn execute(
        &self,
        project_id: Uuid,
        input: ProjectUpdate,
    ) -> Result<Project, UpdateProjectError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                UpdateProjectError::UnauthenticatedUser,
                UpdateProjectError::Unknown,
            )
        })?;
        if !caller.permissions.projects.can_modify() {
            return Err(UpdateProjectError::UnauthorizedUser);
        }

        validate_update(&input)?;

        let current = self
            .projects
            .get(project_id)
            .await
            .map_err(|e| {
                error!(error = %e, %project_id, "loading project failed");
                UpdateProjectError::Unknown
            })?
            .ok_or(UpdateProjectError::UnknownProjectId)?;

        let changes = diff_project(&current, &input)?;
        let removed_item_ids = changes.item_ids_to_remove.clone();
        let removed_users = changes.users_to_remove.clone();

        // The row change goes first: the repository can still reject it
        // (duplicate name, unknown user), and a rejected update must leave
        // every entry and customization in place.
        let updated = self
            .projects
            .apply_update(project_id, changes)
            .await
            .map_err(|e| match e {
                ProjectRepositoryError::NotFound => UpdateProjectError::UnknownProjectId,
                ProjectRepositoryError::DuplicateName => UpdateProjectError::DuplicateProjectName,
                ProjectRepositoryError::UnknownUserId => UpdateProjectError::UnknownUserId,
                other => {
                    error!(error = %other, %project_id, "project update failed");
                    UpdateProjectError::Unknown
                }
            })?;

        // Cascades after the update lands: rows tied to removed items or
        // removed members must not survive the membership change.
        if !removed_item_ids.is_empty() {
            self.entries
                .delete_for_invoice_items(&removed_item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "entry cascade failed");
                    UpdateProjectError::Unknown
                })?;
            self.customizations
                .delete_for_invoice_items(&removed_item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "customization cascade failed");
                    UpdateProjectError::Unknown
                })?;
        }
        if !removed_users.is_empty() {
            let remaining_item_ids: Vec<Uuid> = current
                .invoice_items
                .iter()
                .map(|item| item.id)
                .filter(|id| !removed_item_ids.contains(id))
                .collect();
            self.entries
                .delete_for_users_on_items(&removed_users, &remaining_item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "entry cascade failed");
                    UpdateProjectError::Unknown
                })?;
            self.customizations
                .delete_for_users_on_items(&removed_users, &remaining_item_ids)
                .await
                .map_err(|e| {
                    error!(error = %e, %project_id, "customization cascade failed");
                    UpdateProjectError::Unknown
                })?;
        }

        Ok(updated)
    }
}

fn validate_update(input: &ProjectUpdate) -> Result<(), UpdateProjectError> {
    if !name_is_valid(&input.name) {
        return Err(UpdateProjectError::InvalidProjectName);
    }
    let mut seen_users = HashSet::new();
    if !input.users.iter().all(|u| seen_users.insert(*u)) {
        return Err(UpdateProjectError::DuplicateUserId);
    }
    let mut seen_names = HashSet::new();
    let mut seen_ids = HashSet::new();
    for item in &input.invoice_items {
        if !name_is_valid(&item.name) {
            return Err(UpdateProjectError::InvalidInvoiceItemName);
        }
        if !seen_names.insert(item.name.as_str()) {
            return Err(UpdateProjectError::DuplicateInvoiceItemName);
        }
        if let Some(id) = item.id
            && !seen_ids.insert(id)
        {
            return Err(UpdateProjectError::DuplicateInvoiceItemId);
        }
    }
    Ok(())
}

/// Explicit old-set/new-set comparison, per side: members and items present in
/// the payload but absent from the store are added, the reverse are removed.
fn diff_project(
    current: &Project,
    input: &ProjectUpdate,
) -> Result<ProjectChanges, UpdateProjectError> {
    let old_users: HashSet<Uuid> = current.users.iter().copied().collect();
    let new_users: HashSet<Uuid> = input.users.iter().copied().collect();
    let users_to_add: Vec<Uuid> = new_users.difference(&old_users).copied().collect();
    let users_to_remove: Vec<Uuid> = old_users.difference(&new_users).copied().collect();

    let old_item_ids: HashSet<Uuid> = current.invoice_items.iter().map(|i| i.id).collect();
    let mut items_to_add = Vec::new();
    let mut items_to_update = Vec::new();
    let mut kept_ids = HashSet::new();
    for item in &input.invoice_items {
        match item.id {
            Some(id) => {
                if !old_item_ids.contains(&id) {
                    return Err(UpdateProjectError::UnknownInvoiceItemId);
                }
                kept_ids.insert(id);
                items_to_update.push(InvoiceItem {
                    id,
                    project_id: current.id,
                    name: item.name.clone(),
                    ordinal: item.ordinal,
                });
            }
            None => items_to_add.push(NewInvoiceItem {
                name: item.name.clone(),
                ordinal: item.ordinal,
            }),
        }
    }
    let item_ids_to_remove: Vec<Uuid> = old_item_ids.difference(&kept_ids).copied().collect();

    Ok(ProjectChanges {
        name: input.name.clone(),
        enabled: input.enabled,
        users_to_add,
        users_to_remove,
        items_to_add,
        items_to_update,
        item_ids_to_remove,
    })
}
