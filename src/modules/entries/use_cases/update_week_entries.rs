// Replace a full week of the caller's entries.
//
// Every entry of the 7-day payload is validated against the caller's
// accessible invoice items before anything is written; a single bad entry
// fails the whole request and leaves the store untouched. The write itself is
// one atomic replace over the week's date range, scoped to the accessible
// items so entries under projects the caller lost access to survive.
//
// Full-replace-per-week trades a larger write for auditable correctness: no
// stale entry can survive a week update, and there is no per-day diffing.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::modules::customizations::ports::CustomizationRepository;
use crate::modules::customizations::use_cases::get_user_invoice_items::{
    CustomizedInvoiceItem, merge_items,
};
use crate::modules::entries::core::entry::{MAX_REMARK_LENGTH, UserEntry, WeekEntriesInput};
use crate::modules::entries::ports::EntryRepository;
use crate::modules::projects::ports::ProjectRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};
use crate::shared::core::week::week_dates;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum UpdateWeekEntriesError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not modify entries")]
    UnauthorizedUser,

    #[error("the year has no such week")]
    InvalidWeekNumber,

    #[error("an entry references an invoice item the user has no access to")]
    UnknownUserInvoiceItem,

    #[error("an entry references an invoice item that is disabled or inactive on its date")]
    InvalidUserInvoiceItem,

    #[error("minutes must be at least 1")]
    InvalidMinutes,

    #[error("remark exceeds 256 characters")]
    InvalidRemark,
}

pub struct UpdateWeekEntriesUseCase<P, C, E>
where
    P: ProjectRepository + 'static,
    C: CustomizationRepository + 'static,
    E: EntryRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    projects: Arc<P>,
    customizations: Arc<C>,
    entries: Arc<E>,
}

impl<P, C, E> UpdateWeekEntriesUseCase<P, C, E>
where
    P: ProjectRepository + 'static,
    C: CustomizationRepository + 'static,
    E: EntryRepository + 'static,
{
    pub fn new(
        resolver: Arc<dyn ResolveUser>,
        projects: Arc<P>,
        customizations: Arc<C>,
        entries: Arc<E>,
    ) -> Self {
        Self {
            resolver,
            projects,
            customizations,
            entries,
        }
    }

    pub async fn execute(
        &self,
        year: i32,
        week: u32,
        input: WeekEntriesInput,
    ) -> Result<(), UpdateWeekEntriesError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                UpdateWeekEntriesError::UnauthenticatedUser,
                UpdateWeekEntriesError::Unknown,
            )
        })?;
        if !caller.permissions.entries.can_modify() {
            return Err(UpdateWeekEntriesError::UnauthorizedUser);
        }

        let dates = week_dates(year, week).ok_or(UpdateWeekEntriesError::InvalidWeekNumber)?;

        let items = self
            .projects
            .user_invoice_items(caller.id)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %caller.id, "loading invoice items failed");
                UpdateWeekEntriesError::Unknown
            })?;
        let customizations = self.customizations.for_user(caller.id).await.map_err(|e| {
            error!(error = %e, user_id = %caller.id, "loading customizations failed");
            UpdateWeekEntriesError::Unknown
        })?;
        let accessible = merge_items(caller.id, items, customizations);

        // All 7 days validate before a single row is written.
        let mut new_entries = Vec::new();
        for (date, day) in dates.iter().zip(input.days.iter()) {
            for entry in day {
                let item = accessible
                    .iter()
                    .find(|a| a.item.id == entry.invoice_item_id)
                    .ok_or(UpdateWeekEntriesError::UnknownUserInvoiceItem)?;
                // The gate is evaluated against the entry's own date, not
                // against today.
                if !item.customization.allows_entry_on(*date) {
                    return Err(UpdateWeekEntriesError::InvalidUserInvoiceItem);
                }
                if entry.minutes < 1 {
                    return Err(UpdateWeekEntriesError::InvalidMinutes);
                }
                if entry
                    .remark
                    .as_ref()
                    .is_some_and(|r| r.chars().count() > MAX_REMARK_LENGTH)
                {
                    return Err(UpdateWeekEntriesError::InvalidRemark);
                }
                new_entries.push(UserEntry {
                    id: Uuid::now_v7(),
                    user_id: caller.id,
                    invoice_item_id: entry.invoice_item_id,
                    date: *date,
                    minutes: entry.minutes,
                    remark: entry.remark.clone().filter(|r| !r.is_empty()),
                });
            }
        }

        let scope_item_ids: Vec<Uuid> = accessible
            .iter()
            .map(|a: &CustomizedInvoiceItem| a.item.id)
            .collect();
        self.entries
            .replace_week(caller.id, dates[0], dates[6], &scope_item_ids, new_entries)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %caller.id, "replacing week entries failed");
                UpdateWeekEntriesError::Unknown
            })
    }
}
