//! Planning pipeline: canonical schedule types, normalization and the orchestrator.
//!
//! A plan request flows strictly in sequence:
//!
//! ```text
//!   [TaskSpec] ──▶ Solver ──▶ [RawAssignment] ──normalize──▶ Schedule ──▶ Explanation
//!                                                                 │            │
//!                                                                 └─────┬──────┘
//!                                                                       ▼
//!                                                                PlanningResult
//! ```
//!
//! Nothing is kept between requests.

mod error;
mod orchestrator;

pub use error::PlanningError;
pub use orchestrator::Planner;

use serde::{Deserialize, Serialize};

use crate::solver::SolverError;

/// A task submitted by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskSpec {
    /// Task name (not required to be unique)
    pub name: String,
    /// Duration in days
    pub duration: i64,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, duration: i64) -> Self {
        Self {
            name: name.into(),
            duration,
        }
    }

    /// Check the caller-side constraints: non-blank name and positive duration.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("task name must not be empty".to_string());
        }
        if self.duration <= 0 {
            return Err(format!(
                "task \"{}\" must have a positive duration (got {})",
                self.name, self.duration
            ));
        }
        Ok(())
    }
}

/// One assignment as returned by the solver, after schema validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawAssignment {
    pub task: String,
    pub start: i64,
    pub end: i64,
    /// Ignored; the canonical duration is always derived from `start`/`end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

impl RawAssignment {
    pub fn new(task: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            task: task.into(),
            start,
            end,
            duration: None,
        }
    }

    /// Check day offsets: `start >= 1` and `end >= start`.
    pub fn validate(&self) -> Result<(), String> {
        if self.start < 1 {
            return Err(format!(
                "task \"{}\" starts at day {}, offsets are 1-indexed",
                self.task, self.start
            ));
        }
        if self.end < self.start {
            return Err(format!(
                "task \"{}\" ends at day {} before it starts at day {}",
                self.task, self.end, self.start
            ));
        }
        Ok(())
    }
}

/// A solved task in canonical form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub task: String,
    pub start: i64,
    pub end: i64,
    /// Always `end - start`.
    pub duration: i64,
}

impl ScheduleEntry {
    /// Normalize a raw assignment, recomputing the duration.
    ///
    /// Offsets breaking `end >= start >= 1` are rejected as an invalid solver reply,
    /// whichever solver produced them.
    pub fn from_raw(raw: &RawAssignment) -> Result<Self, SolverError> {
        raw.validate().map_err(SolverError::invalid_response)?;
        Ok(Self {
            task: raw.task.clone(),
            start: raw.start,
            end: raw.end,
            duration: raw.end - raw.start,
        })
    }
}

/// Ordered schedule, in the order the solver returned it.
pub type Schedule = Vec<ScheduleEntry>;

/// Normalize every raw assignment, preserving order. Fails on the first invalid one.
pub fn normalize(raw: &[RawAssignment]) -> Result<Schedule, SolverError> {
    raw.iter().map(ScheduleEntry::from_raw).collect()
}

/// The result of a successful plan request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanningResult {
    pub schedule: Schedule,
    pub explanation: String,
}
