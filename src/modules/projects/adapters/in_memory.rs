// In memory implementation of the ProjectRepository port.
//
// Purpose
// - Support use case tests and local development without a database.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::projects::core::project::{
    InvoiceItem, NewProject, Project, UserInvoiceItem,
};
use crate::modules::projects::ports::{ProjectChanges, ProjectRepository, ProjectRepositoryError};

pub struct InMemoryProjectStore {
    inner: RwLock<HashMap<Uuid, Project>>,
    /// When non-empty, membership user ids are validated against this set.
    known_users: RwLock<HashSet<Uuid>>,
    offline: AtomicBool,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            known_users: RwLock::new(HashSet::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Fault switch for tests: every call fails with a backend error.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Enables user id validation for the given ids (mirrors the foreign key
    /// a real store would enforce).
    pub async fn set_known_users(&self, users: impl IntoIterator<Item = Uuid>) {
        *self.known_users.write().await = users.into_iter().collect();
    }

    /// Seed a project row directly. Test setup only.
    pub async fn insert(&self, project: Project) {
        self.inner.write().await.insert(project.id, project);
    }

    fn check_online(&self) -> Result<(), ProjectRepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ProjectRepositoryError::Backend("project store offline".into()));
        }
        Ok(())
    }

    async fn check_users_known(&self, users: &[Uuid]) -> Result<(), ProjectRepositoryError> {
        let known = self.known_users.read().await;
        if known.is_empty() {
            return Ok(());
        }
        if users.iter().any(|u| !known.contains(u)) {
            return Err(ProjectRepositoryError::UnknownUserId);
        }
        Ok(())
    }
}

impl Default for InMemoryProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectStore {
    async fn list(&self) -> Result<Vec<Project>, ProjectRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        let mut projects: Vec<Project> = guard.values().cloned().collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn get(&self, project_id: Uuid) -> Result<Option<Project>, ProjectRepositoryError> {
        self.check_online()?;
        Ok(self.inner.read().await.get(&project_id).cloned())
    }

    async fn save_new(&self, project: NewProject) -> Result<Project, ProjectRepositoryError> {
        self.check_online()?;
        self.check_users_known(&project.users).await?;
        let mut guard = self.inner.write().await;
        if guard.values().any(|p| p.name == project.name) {
            return Err(ProjectRepositoryError::DuplicateName);
        }
        let project_id = Uuid::now_v7();
        let invoice_items = project
            .invoice_items
            .into_iter()
            .map(|item| InvoiceItem {
                id: Uuid::now_v7(),
                project_id,
                name: item.name,
                ordinal: item.ordinal,
            })
            .collect();
        let row = Project {
            id: project_id,
            name: project.name,
            enabled: project.enabled,
            users: project.users,
            invoice_items,
        };
        guard.insert(project_id, row.clone());
        Ok(row)
    }

    async fn apply_update(
        &self,
        project_id: Uuid,
        changes: ProjectChanges,
    ) -> Result<Project, ProjectRepositoryError> {
        self.check_online()?;
        self.check_users_known(&changes.users_to_add).await?;
        let mut guard = self.inner.write().await;
        if guard
            .values()
            .any(|p| p.id != project_id && p.name == changes.name)
        {
            return Err(ProjectRepositoryError::DuplicateName);
        }
        let project = guard
            .get_mut(&project_id)
            .ok_or(ProjectRepositoryError::NotFound)?;

        project.name = changes.name;
        project.enabled = changes.enabled;
        project.users.retain(|u| !changes.users_to_remove.contains(u));
        project.users.extend(changes.users_to_add);
        project
            .invoice_items
            .retain(|item| !changes.item_ids_to_remove.contains(&item.id));
        for updated in changes.items_to_update {
            if let Some(item) = project
                .invoice_items
                .iter_mut()
                .find(|item| item.id == updated.id)
            {
                item.name = updated.name;
                item.ordinal = updated.ordinal;
            }
        }
        for added in changes.items_to_add {
            project.invoice_items.push(InvoiceItem {
                id: Uuid::now_v7(),
                project_id,
                name: added.name,
                ordinal: added.ordinal,
            });
        }
        Ok(project.clone())
    }

    async fn delete(&self, project_id: Uuid) -> Result<(), ProjectRepositoryError> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        guard
            .remove(&project_id)
            .map(|_| ())
            .ok_or(ProjectRepositoryError::NotFound)
    }

    async fn user_invoice_items(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserInvoiceItem>, ProjectRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        let mut items: Vec<UserInvoiceItem> = guard
            .values()
            .filter(|p| p.enabled && p.users.contains(&user_id))
            .flat_map(|p| {
                p.invoice_items.iter().map(|item| UserInvoiceItem {
                    id: item.id,
                    name: item.name.clone(),
                    ordinal: item.ordinal,
                    project_id: p.id,
                    project_name: p.name.clone(),
                })
            })
            .collect();
        items.sort_by(|a, b| {
            a.project_name
                .cmp(&b.project_name)
                .then(a.ordinal.cmp(&b.ordinal))
        });
        Ok(items)
    }
}
