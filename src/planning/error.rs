//! Errors that fail a whole plan request.
//!
//! Explanation failures never appear here; they are absorbed by the explanation gateway.

use thiserror::Error;

use crate::config::ConfigError;
use crate::solver::SolverError;

#[derive(Debug, Error)]
pub enum PlanningError {
    /// A required endpoint is not configured. Needs operator intervention.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The solver could not be reached, failed, timed out or answered garbage.
    #[error("Solver unavailable: {0}")]
    SolverUnavailable(#[from] SolverError),
}

impl PlanningError {
    /// Message meant for the person using the planner.
    pub fn user_message(&self) -> &'static str {
        match self {
            PlanningError::Configuration(_) => {
                "Erreur lors de la génération du planning : le service n'est pas configuré"
            }
            PlanningError::SolverUnavailable(_) => {
                "Erreur lors de la génération du planning : le solveur est indisponible"
            }
        }
    }

    /// Underlying technical cause, for logs and the `details` field of error responses.
    pub fn details(&self) -> String {
        match self {
            PlanningError::Configuration(e) => e.to_string(),
            PlanningError::SolverUnavailable(e) => e.to_string(),
        }
    }

    /// Short machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlanningError::Configuration(_) => "configuration",
            PlanningError::SolverUnavailable(_) => "solver_unavailable",
        }
    }

    /// Whether the caller may reasonably try the same request again.
    pub fn is_retryable(&self) -> bool {
        match self {
            PlanningError::Configuration(_) => false,
            PlanningError::SolverUnavailable(e) => e.is_transient(),
        }
    }
}
