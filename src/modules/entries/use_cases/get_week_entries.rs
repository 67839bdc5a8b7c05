// Read the caller's week grid: one fetch over the 7 ISO-week dates, bucketed
// by weekday. The read path has no validation branches beyond the week number;
// every repository failure collapses to Unknown.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use crate::modules::entries::core::entry::{DayEntries, WeekEntries};
use crate::modules::entries::ports::EntryRepository;
use crate::modules::users::use_cases::resolve_user::{ResolveUser, map_resolution_error};
use crate::shared::core::week::week_dates;

#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
pub enum GetWeekEntriesError {
    #[default]
    #[error("unknown error")]
    Unknown,

    #[error("user is not authenticated")]
    UnauthenticatedUser,

    #[error("user may not read entries")]
    UnauthorizedUser,

    #[error("the year has no such week")]
    InvalidWeekNumber,
}

pub struct GetWeekEntriesUseCase<E>
where
    E: EntryRepository + 'static,
{
    resolver: Arc<dyn ResolveUser>,
    entries: Arc<E>,
}

impl<E> GetWeekEntriesUseCase<E>
where
    E: EntryRepository + 'static,
{
    pub fn new(resolver: Arc<dyn ResolveUser>, entries: Arc<E>) -> Self {
        Self { resolver, entries }
    }

    pub async fn execute(&self, year: i32, week: u32) -> Result<WeekEntries, GetWeekEntriesError> {
        let caller = self.resolver.resolve().await.map_err(|e| {
            map_resolution_error(
                e,
                GetWeekEntriesError::UnauthenticatedUser,
                GetWeekEntriesError::Unknown,
            )
        })?;
        if !caller.permissions.entries.can_read() {
            return Err(GetWeekEntriesError::UnauthorizedUser);
        }

        let dates = week_dates(year, week).ok_or(GetWeekEntriesError::InvalidWeekNumber)?;
        let rows = self
            .entries
            .entries_for_dates(caller.id, &dates)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %caller.id, "loading week entries failed");
                GetWeekEntriesError::Unknown
            })?;

        let mut days = dates.map(|date| DayEntries {
            date,
            entries: Vec::new(),
        });
        for row in rows {
            // The fetch is keyed on exactly these 7 dates, so the lookup
            // always hits; source order within a day is preserved.
            if let Some(day) = days.iter_mut().find(|d| d.date == row.date) {
                day.entries.push(row);
            }
        }
        Ok(WeekEntries { year, week, days })
    }
}
