//! Day-offset arithmetic for laying a schedule over a calendar.
//!
//! Schedules only carry 1-indexed day offsets. A calendar view picks a start date
//! (day 1) and asks, for each date, which entries are active. An entry is active on
//! every day of the inclusive range `[start, end]`.

use chrono::{Duration, NaiveDate};

use crate::planning::ScheduleEntry;

/// 1-indexed offset of `date` relative to `start_date`.
///
/// `start_date` itself is day 1; dates before it give offsets `<= 0`.
pub fn day_offset(start_date: NaiveDate, date: NaiveDate) -> i64 {
    (date - start_date).num_days() + 1
}

/// Calendar date of a 1-indexed day offset.
///
/// Returns `None` if the result falls outside chrono's supported range.
pub fn date_of(start_date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Duration::try_days(offset - 1)?;
    start_date.checked_add_signed(days)
}

/// Whether `entry` runs on the given day offset.
pub fn is_active(entry: &ScheduleEntry, offset: i64) -> bool {
    offset >= entry.start && offset <= entry.end
}

/// Entries active on `date`, in schedule order.
pub fn entries_on<'a>(
    schedule: &'a [ScheduleEntry],
    start_date: NaiveDate,
    date: NaiveDate,
) -> Vec<&'a ScheduleEntry> {
    let offset = day_offset(start_date, date);
    schedule
        .iter()
        .filter(|entry| is_active(entry, offset))
        .collect()
}
