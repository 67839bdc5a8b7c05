// Ports for time entry storage.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::modules::entries::core::entry::UserEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum EntryRepositoryError {
    #[default]
    #[error("unknown entry repository error")]
    Unknown,

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait EntryRepository: Send + Sync {
    async fn entries_for_dates(
        &self,
        user_id: Uuid,
        dates: &[NaiveDate],
    ) -> Result<Vec<UserEntry>, EntryRepositoryError>;

    /// Atomically replaces the user's entries in `from..=to`: existing rows
    /// referencing one of `scope_item_ids` are deleted and `new_entries` are
    /// inserted as one unit. Entries outside the scope (items of projects the
    /// user no longer has access to) survive. A partial delete or insert is
    /// never observable.
    async fn replace_week(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
        scope_item_ids: &[Uuid],
        new_entries: Vec<UserEntry>,
    ) -> Result<(), EntryRepositoryError>;

    /// Cascade hook: drop every entry logged against the given invoice items.
    async fn delete_for_invoice_items(
        &self,
        invoice_item_ids: &[Uuid],
    ) -> Result<(), EntryRepositoryError>;

    /// Cascade hook: drop the given users' entries against the given items.
    async fn delete_for_users_on_items(
        &self,
        user_ids: &[Uuid],
        invoice_item_ids: &[Uuid],
    ) -> Result<(), EntryRepositoryError>;
}
