// Ports for per-user invoice item customizations.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::customizations::core::customization::InvoiceItemCustomization;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum CustomizationRepositoryError {
    #[default]
    #[error("unknown customization repository error")]
    Unknown,

    #[error("customization not found")]
    NotFound,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait CustomizationRepository: Send + Sync {
    async fn for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InvoiceItemCustomization>, CustomizationRepositoryError>;

    async fn upsert(
        &self,
        customization: InvoiceItemCustomization,
    ) -> Result<(), CustomizationRepositoryError>;

    async fn delete(
        &self,
        user_id: Uuid,
        invoice_item_id: Uuid,
    ) -> Result<(), CustomizationRepositoryError>;

    /// Cascade hook: drop every customization of the given invoice items.
    async fn delete_for_invoice_items(
        &self,
        invoice_item_ids: &[Uuid],
    ) -> Result<(), CustomizationRepositoryError>;

    /// Cascade hook: drop the given users' customizations of the given items.
    async fn delete_for_users_on_items(
        &self,
        user_ids: &[Uuid],
        invoice_item_ids: &[Uuid],
    ) -> Result<(), CustomizationRepositoryError>;
}
