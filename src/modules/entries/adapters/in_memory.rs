// In memory implementation of the EntryRepository port.
//
// Responsibilities
// - Hold flat date-keyed entry rows.
// - Apply `replace_week` under one write guard, the in memory rendition of a
//   serializable transaction: no reader can observe the deleted-but-not-yet-
//   inserted state.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::modules::entries::core::entry::UserEntry;
use crate::modules::entries::ports::{EntryRepository, EntryRepositoryError};

pub struct InMemoryEntryStore {
    inner: RwLock<Vec<UserEntry>>,
    offline: AtomicBool,
}

impl InMemoryEntryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
            offline: AtomicBool::new(false),
        }
    }

    /// Fault switch for tests: every call fails with a backend error.
    pub fn toggle_offline(&self) {
        self.offline.fetch_xor(true, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), EntryRepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EntryRepositoryError::Backend("entry store offline".into()));
        }
        Ok(())
    }

    /// Seed an entry row directly. Test setup only.
    pub async fn insert(&self, entry: UserEntry) {
        self.inner.write().await.push(entry);
    }

    pub async fn all(&self) -> Vec<UserEntry> {
        self.inner.read().await.clone()
    }
}

impl Default for InMemoryEntryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryRepository for InMemoryEntryStore {
    async fn entries_for_dates(
        &self,
        user_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<UserEntry>, EntryRepositoryError> {
        self.check_online()?;
        let guard = self.inner.read().await;
        Ok(guard
            .iter()
            .filter(|e| e.user_id == user_id && dates.contains(&e.date))
            .cloned()
            .collect())
    }

    async fn replace_week(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        scope_item_ids: &[Uuid],
        new_entries: Vec<UserEntry>,
    ) -> Result<(), EntryRepositoryError> {
        self.check_online()?;
        let mut guard = self.inner.write().await;
        guard.retain(|e| {
            !(e.user_id == user_id
                && e.date >= from
                && e.date <= to
                && scope_item_ids.contains(&e.invoice_item_id))
        });
        guard.extend(new_entries);
        Ok(())
    }

    async fn delete_for_invoice_items(
        &self,
        invoice_item_ids: &[Uuid],
    ) -> Result<(), EntryRepositoryError> {
        self.check_online()?;
        self.inner
            .write()
            .await
            .retain(|e| !invoice_item_ids.contains(&e.invoice_item_id));
        Ok(())
    }

    async fn delete_for_users_on_items(
        &self,
        user_ids: &[Uuid],
        invoice_item_ids: &[Uuid],
    ) -> Result<(), EntryRepositoryError> {
        self.check_online()?;
        self.inner.write().await.retain(|e| {
            !(user_ids.contains(&e.user_id) && invoice_item_ids.contains(&e.invoice_item_id))
        });
        Ok(())
    }
}
