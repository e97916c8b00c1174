//! HTTP solver client. One bounded attempt per call, no retry.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{Solver, SolverError};
use crate::planning::{RawAssignment, TaskSpec};
use crate::util::truncate_for_log;

/// Solver reached over HTTP: `POST <endpoint>` with the task list as a JSON array.
#[derive(Debug, Clone)]
pub struct HttpSolver {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpSolver {
    /// Create a new solver client with its own connection pool.
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self::with_client(Client::new(), endpoint, timeout)
    }

    /// Create a solver client sharing an existing connection pool.
    pub fn with_client(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    /// Map a transport-level failure into a solver error.
    fn transport_error(&self, e: reqwest::Error) -> SolverError {
        if e.is_timeout() {
            SolverError::timeout(format!(
                "no answer from {} within {:?}: {}",
                self.endpoint, self.timeout, e
            ))
        } else if e.is_connect() {
            SolverError::network_error(format!("Connection failed: {}", e))
        } else {
            SolverError::network_error(format!("Request failed: {}", e))
        }
    }

    /// Decode and validate the reply body.
    fn parse_assignments(body: &str) -> Result<Vec<RawAssignment>, SolverError> {
        let assignments: Vec<RawAssignment> = serde_json::from_str(body).map_err(|e| {
            SolverError::invalid_response(format!(
                "Failed to parse assignments: {}, body: {}",
                e,
                truncate_for_log(body, 500)
            ))
        })?;

        for assignment in &assignments {
            assignment
                .validate()
                .map_err(SolverError::invalid_response)?;
        }

        Ok(assignments)
    }
}

#[async_trait]
impl Solver for HttpSolver {
    async fn solve(&self, tasks: &[TaskSpec]) -> Result<Vec<RawAssignment>, SolverError> {
        tracing::debug!(
            "Sending {} tasks to solver at {}",
            tasks.len(),
            self.endpoint
        );
        let started = Instant::now();

        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(tasks)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(
                "Solver answered HTTP {} after {:?}: {}",
                status.as_u16(),
                started.elapsed(),
                truncate_for_log(&body, 200)
            );
            return Err(SolverError::from_status(
                status.as_u16(),
                &truncate_for_log(&body, 500),
            ));
        }

        let assignments = Self::parse_assignments(&body)?;

        if assignments.len() != tasks.len() {
            tracing::warn!(
                "Solver returned {} assignments for {} tasks, passing through",
                assignments.len(),
                tasks.len()
            );
        } else if let Some(missing) = tasks
            .iter()
            .find(|t| !assignments.iter().any(|a| a.task == t.name))
        {
            tracing::warn!(
                "Solver reply has no assignment named \"{}\", passing through",
                missing.name
            );
        }

        tracing::debug!(
            "Solver returned {} assignments in {:?}",
            assignments.len(),
            started.elapsed()
        );
        Ok(assignments)
    }
}
