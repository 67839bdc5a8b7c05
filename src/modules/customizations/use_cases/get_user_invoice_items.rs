// The caller's accessible invoice items merged with their customizations.
// This feeds the week grid's item picker.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::modules::customizations::core::customization::InvoiceItemCustomization;
use crate::modules::customizations::ports::CustomizationRepository;
use crate::modules::projects::core::project::UserInvoiceItem;
use crate::modules::projects::ports::ProjectRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum GetUserInvoiceItemsError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not read entries")]
    UnauthorizedUser,
}

/// An accessible invoice item with its per-user gate applied. The gate is the
/// stored customization, or the always-open default when none exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomizedInvoiceItem {
    pub item: UserInvoiceItem,
    pub customization: InvoiceItemCustomization,
}

pub struct GetUserInvoiceItemsUseCase<P, C>
where
    P: ProjectRepository + 'static,
    C: CustomizationRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
    customizations: Arc<C>,
}

impl<P, C> GetUserInvoiceItemsUseCase<P, C>
where
    P: ProjectRepository + 'static,
    C: CustomizationRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, projects: Arc<P>, customizations: Arc<C>) -> Self {
        Self {
            resolver,
            projects,
            customizations,
        }
    }

    pub async fn execute(&self) -> Result<Vec<CustomizedInvoiceItem>, GetUserInvoiceItemsError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                GetUserInvoiceItemsError::UnauthenticatedUser,
                GetUserInvoiceItemsError::Unknown,
            )
        })?;
        if !caller.permissions.entries.can_read() {
            return Err(GetUserInvoiceItemsError::UnauthorizedUser);
        }

        let items = self.projects.user_invoice_items(caller.id).await.map_err(|e| {
            error!(error = %e, user_id = %caller.id, "loading invoice items failed");
            GetUserInvoiceItemsError::Unknown
        })?;
        let customizations = self.customizations.for_user(caller.id).await.map_err(|e| {
            error!(error = %e, user_id = %caller.id, "loading customizations failed");
            GetUserInvoiceItemsError::Unknown
        })?;

        Ok(merge_items(caller.id, items, customizations))
    }
}

/// Joins the accessible items with their customization rows; items without a
/// row get the open default.
pub fn merge_items(
    user_id: uuid::Uuid,
    items: Vec<UserInvoiceItem>,
    customizations: Vec<InvoiceItemCustomization>,
) -> Vec<CustomizedInvoiceItem> {
    items
        .into_iter()
        .map(|item| {
            let customization = customizations
                .iter()
                .find(|c| c.invoice_item_id == item.id)
                .cloned()
                .unwrap_or_else(|| InvoiceItemCustomization::default_for(user_id, item.id));
            CustomizedInvoiceItem {
                item,
                customization,
            }
        })
        .collect()
}
