// ISO-8601 week arithmetic.
//
// Purpose
// - Map (year, week) to the Monday..Sunday date range the week grid works on.
//
// Responsibilities
// - Pure functions only, no state. Week 1 is the week containing the year's
//   first Thursday; years have 52 or 53 ISO weeks.

use chrono::{Datelike, NaiveDate, Weekday};

pub const DAYS_PER_WEEK: usize = 7;

/// The seven consecutive dates of an ISO week, Monday first.
/// `None` when the week number does not exist in that ISO year.
pub fn week_dates(year: i32, week: u32) -> Option<[NaiveDate; DAYS_PER_WEEK]> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    let mut dates = [monday; DAYS_PER_WEEK];
    for (offset, slot) in dates.iter_mut().enumerate() {
        *slot = monday + chrono::Days::new(offset as u64);
    }
    Some(dates)
}

/// The (ISO year, ISO week) a date belongs to. Near year boundaries the ISO
/// year can differ from the calendar year.
pub fn week_for_date(date: NaiveDate) -> (i32, u32) {
    let iso = date.iso_week();
    (iso.year(), iso.week())
}

/// Number of ISO weeks in a year: 52, or 53 when December 28 falls in week 53.
pub fn weeks_in_year(year: i32) -> u32 {
    NaiveDate::from_ymd_opt(year, 12, 28)
        .map(|d| d.iso_week().week())
        .unwrap_or(52)
}

/// The week after (year, week), rolling into week 1 of the next year past the
/// last week. `None` when the input week does not exist.
pub fn next_week(year: i32, week: u32) -> Option<(i32, u32)> {
    if week == 0 || week > weeks_in_year(year) {
        return None;
    }
    if week < weeks_in_year(year) {
        Some((year, week + 1))
    } else {
        Some((year + 1, 1))
    }
}

/// The week before (year, week), rolling into the last week of the previous
/// year below week 1. `None` when the input week does not exist.
pub fn previous_week(year: i32, week: u32) -> Option<(i32, u32)> {
    if week == 0 || week > weeks_in_year(year) {
        return None;
    }
    if week > 1 {
        Some((year, week - 1))
    } else {
        Some((year - 1, weeks_in_year(year - 1)))
    }
}
