//! Solver gateway: hands the task list to the external constraint solver.
//!
//! The solver's algorithm lives elsewhere; this module only carries the request,
//! bounds the wait and validates the reply.

mod error;
mod http;

pub use error::{classify_http_status, SolverError, SolverErrorKind};
pub use http::HttpSolver;

use async_trait::async_trait;

use crate::planning::{RawAssignment, TaskSpec};

/// Trait for solver backends.
#[async_trait]
pub trait Solver: Send + Sync {
    /// Solve the task list, returning one validated assignment per solved task.
    ///
    /// Exactly one attempt is made.
    async fn solve(&self, tasks: &[TaskSpec]) -> Result<Vec<RawAssignment>, SolverError>;
}
