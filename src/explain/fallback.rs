//! Deterministic local explanation, used whenever the explanation service is
//! unconfigured or fails. Pure and total.

use crate::planning::ScheduleEntry;

/// One sentence per entry, in schedule order, joined by single spaces.
///
/// The empty schedule yields the empty string.
pub fn explain(schedule: &[ScheduleEntry]) -> String {
    schedule
        .iter()
        .map(sentence)
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(entry: &ScheduleEntry) -> String {
    format!(
        "La tâche \"{}\" commence au jour {} et se termine au jour {}.",
        entry.task, entry.start, entry.end
    )
}
