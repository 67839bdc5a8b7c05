// Remove the caller's customization of one invoice item, reverting it to the
// open default. A row owned by another user is indistinguishable from a
// missing one.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::customizations::ports::{
    CustomizationRepository, CustomizationRepositoryError,
};
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum DeleteCustomizationError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify entries")]
    UnauthorizedUser,

    #[error("no such invoice item for this user")]
    UnknownUserInvoiceItem,
}

pub struct DeleteCustomizationUseCase<C>
where
    C: CustomizationRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    customizations: Arc<C>,
}

impl<C> DeleteCustomizationUseCase<C>
where
    C: CustomizationRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, customizations: Arc<C>) -> Self {
        Self {
            resolver,
            customizations,
        }
    }

    pub async fn execute(&self, invoice_item_id: Uuid) -> Result<(), DeleteCustomizationError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                DeleteCustomizationError::UnauthenticatedUser,
                DeleteCustomizationError::Unknown,
            )
        })?;
        if !caller.permissions.entries.can_modify() {
            return Err(DeleteCustomizationError::UnauthorizedUser);
        }

        // Keyed by (caller, item), so another user's row can never match.
        self.customizations
            .delete(caller.id, invoice_item_id)
            .await
            .map_err(|e| match e {
                CustomizationRepositoryError::NotFound => {
                    DeleteCustomizationError::UnknownUserInvoiceItem
                }
                other => {
                    error!(error = %other, user_id = %caller.id, "deleting customization failed");
                    DeleteCustomizationError::Unknown
                }
            })
    }
}
