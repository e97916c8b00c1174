//! API request and response types.
//!
//! The plan request body is a bare JSON array of [`TaskSpec`](crate::planning::TaskSpec)
//! and a successful reply is a [`PlanningResult`](crate::planning::PlanningResult);
//! only the envelopes below are specific to the HTTP layer.

use serde::{Deserialize, Serialize};

use crate::planning::PlanningError;

/// Error body returned by the plan endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Message meant for the end user
    pub error: String,

    /// Technical cause, meant for logs
    pub details: String,

    /// Machine-readable kind ("invalid_request", "configuration", "solver_unavailable")
    pub kind: String,

    /// Whether sending the same request again may succeed
    pub retryable: bool,
}

impl ErrorResponse {
    /// Reply for a task list that breaks the caller-side constraints.
    pub fn invalid_request(details: String) -> Self {
        Self {
            error: "Requête invalide".to_string(),
            details,
            kind: "invalid_request".to_string(),
            retryable: false,
        }
    }
}

impl From<&PlanningError> for ErrorResponse {
    fn from(err: &PlanningError) -> Self {
        Self {
            error: err.user_message().to_string(),
            details: err.details(),
            kind: err.kind().to_string(),
            retryable: err.is_retryable(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,

    /// Whether a solver endpoint is configured (plans fail without one)
    pub solver_configured: bool,

    /// Whether a remote explanation service is configured
    pub explainer_configured: bool,
}
