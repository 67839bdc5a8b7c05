// In memory implementation of the CustomizationRepository port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::customizations::core::customization::InvoiceItemCustomization;
use crate::modules::customizations::ports::{
    CustomizationRepository, CustomizationRepositoryError,
};

pub struct InMemoryCustomizationStore {
    inner: RwLock<HashMap<(Uuid, Uuid), InvoiceItemCustomization>>,
    offline: AtomicBool,
}

impl InMemoryCustomizationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Fault switch for tests: every call fails with a backend error.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), CustomizationRepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(CustomizationRepositoryError::Backend(
                "customization store offline".into(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryCustomizationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomizationRepository for InMemoryCustomizationStore {
    async fn for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<InvoiceItemCustomization>, CustomizationRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        Ok(guard
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        customization: InvoiceItemCustomization,
    ) -> Result<(), CustomizationRepositoryError> {
        self.check_online()?;
        let key = (customization.user_id, customization.invoice_item_id);
        self.inner.write().await.insert(key, customization);
        Ok(())
    }

    async fn delete(
        &self,
        user_id: Uuid,
        invoice_item_id: Uuid,
    ) -> Result<(), CustomizationRepositoryError> {
        self.check_online()?;
        self.inner
            .write()
            .await
            .remove(&(user_id, invoice_item_id))
            .map(|_| ())
            .ok_or(CustomizationRepositoryError::NotFound)
    }

    async fn delete_for_invoice_items(
        &self,
        invoice_item_ids: &[Uuid],
    ) -> Result<(), CustomizationRepositoryError> {
        self.check_online()?;
        self.inner
            .write()
            .await
            .retain(|(_, item_id), _| !invoice_item_ids.contains(item_id));
        Ok(())
    }

    async fn delete_for_users_on_items(
        &self,
        user_ids: &[Uuid],
        invoice_item_ids: &[Uuid],
    ) -> Result<(), CustomizationRepositoryError> {
        self.check_online()?;
        self.inner.write().await.retain(|(user_id, item_id), _| {
            !(user_ids.contains(user_id) && invoice_item_ids.contains(item_id))
        });
        Ok(())
    }
}
