// Upsert the caller's customization of one invoice item: color and the
// enabled/active-range gate entries are validated against.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::customizations::core::customization::InvoiceItemCustomization;
use crate::modules::customizations::ports::CustomizationRepository;
use crate::modules::projects::ports::ProjectRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};
use crate::shared::core::color::Color;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum UpdateCustomizationError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify entries")]
    UnauthorizedUser,

    #[error("active-from must lie strictly before active-to")]
    InvalidActiveDateRange,

    #[error("no such invoice item for this user")]
    UnknownUserInvoiceItem,
}

#[derive(Debug, Clone)]
pub struct CustomizationInput {
    pub invoice_item_id: Uuid,
    pub color: Color,
    pub enabled: bool,
    pub active_from: Option<NaiveDate>,
    pub active_to: Option<NaiveDate>,
}

pub struct UpdateCustomizationUseCase<P, C>
where
    P: ProjectRepository + 'static,
    C: CustomizationRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
    customizations: Arc<C>,
}

impl<P, C> UpdateCustomizationUseCase<P, C>
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

    pub async fn execute(&self, input: CustomizationInput) -> Result<(), UpdateCustomizationError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                UpdateCustomizationError::UnauthenticatedUser,
                UpdateCustomizationError::Unknown,
            )
        })?;
        if !caller.permissions.entries.can_modify() {
            return Err(UpdateCustomizationError::UnauthorizedUser);
        }
        if let (Some(from), Some(to)) = (input.active_from, input.active_to)
            && from >= to
        {
            return Err(UpdateCustomizationError::InvalidActiveDateRange);
        }

        // An item outside the caller's accessible set reads as nonexistent,
        // whether it belongs to another user's project or to nobody.
        let accessible = self
            .projects
            .user_invoice_items(caller.id)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %caller.id, "loading invoice items failed");
                UpdateCustomizationError::Unknown
            })?;
        if !accessible.iter().any(|item| item.id == input.invoice_item_id) {
            return Err(UpdateCustomizationError::UnknownUserInvoiceItem);
        }

        self.customizations
            .upsert(InvoiceItemCustomization {
                user_id: caller.id,
                invoice_item_id: input.invoice_item_id,
                color: input.color,
                enabled: input.enabled,
                active_from: input.active_from,
                active_to: input.active_to,
            })
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %caller.id, "saving customization failed");
                UpdateCustomizationError::Unknown
            })
    }
}
