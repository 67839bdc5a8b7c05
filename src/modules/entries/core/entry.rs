// Time entry domain types and the transient week grid.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::core::week::DAYS_PER_WEEK;

pub const MAX_REMARK_LENGTH: usize = 256;

/// A logged unit of work: minutes against one invoice item on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invoice_item_id: Uuid,
    pub date: NaiveDate,
    pub minutes: u32,
    pub remark: Option<String>,
}

/// One day of the week grid, entries in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayEntries {
    pub date: NaiveDate,
    pub entries: Vec<UserEntry>,
}

/// The 7-day view the grid renders, Monday first. Never persisted as such;
/// it is assembled from and flattened back into date-keyed rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekEntries {
    pub year: i32,
    pub week: u32,
    pub days: [DayEntries; DAYS_PER_WEEK],
}

/// One entry of a week-update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryInput {
    pub invoice_item_id: Uuid,
    pub minutes: u32,
    pub remark: Option<String>,
}

/// Full replacement payload for a week: 7 slots, Monday first.
#[derive(Debug, Clone, Deserialize)]
pub struct WeekEntriesInput {
    pub days: [Vec<EntryInput>; DAYS_PER_WEEK],
}
