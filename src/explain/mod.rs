//! Explanation gateway: turns a schedule into prose.
//!
//! The remote explanation service is optional. Whatever happens on the remote side,
//! [`ExplanationGateway::explain`] always yields text: any failure is replaced by the
//! deterministic [`fallback`] explanation, and the outcome records which path was taken.

pub mod fallback;
mod http;

pub use http::HttpExplainer;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ExplainerConfig;
use crate::planning::ScheduleEntry;

/// Why the remote explanation could not be used.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExplainError {
    #[error("explanation service did not answer in time: {0}")]
    Timeout(String),

    #[error("explanation service unreachable: {0}")]
    Transport(String),

    #[error("explanation service returned HTTP {0}: {1}")]
    Status(u16, String),

    #[error("explanation reply is malformed: {0}")]
    Malformed(String),
}

/// Trait for remote explanation backends.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Ask for prose describing `schedule`. One attempt.
    async fn explain(&self, schedule: &[ScheduleEntry]) -> Result<String, ExplainError>;
}

/// Outcome of the explanation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    /// Text produced by the explanation service
    Explained(String),
    /// Local text; `cause` is `None` when no service is configured
    FallbackUsed {
        text: String,
        cause: Option<ExplainError>,
    },
}

impl Explanation {
    pub fn text(&self) -> &str {
        match self {
            Explanation::Explained(text) => text,
            Explanation::FallbackUsed { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Explanation::Explained(text) => text,
            Explanation::FallbackUsed { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Explanation::FallbackUsed { .. })
    }
}

/// Wraps an optional remote explainer with the local fallback.
#[derive(Clone, Default)]
pub struct ExplanationGateway {
    service: Option<Arc<dyn Explainer>>,
}

impl ExplanationGateway {
    pub fn new(service: Option<Arc<dyn Explainer>>) -> Self {
        Self { service }
    }

    /// Gateway that always uses the local fallback.
    pub fn fallback_only() -> Self {
        Self { service: None }
    }

    /// Build the gateway from configuration, sharing `client`'s connection pool.
    pub fn from_config(config: &ExplainerConfig, client: reqwest::Client) -> Self {
        let service = config.endpoint.clone().map(|endpoint| {
            Arc::new(HttpExplainer::with_client(client, endpoint, config.timeout))
                as Arc<dyn Explainer>
        });
        Self { service }
    }

    pub fn is_remote(&self) -> bool {
        self.service.is_some()
    }

    /// Explain `schedule`. Never fails.
    pub async fn explain(&self, schedule: &[ScheduleEntry]) -> Explanation {
        let Some(service) = &self.service else {
            return Explanation::FallbackUsed {
                text: fallback::explain(schedule),
                cause: None,
            };
        };

        match service.explain(schedule).await {
            Ok(text) => Explanation::Explained(text),
            Err(cause) => Explanation::FallbackUsed {
                text: fallback::explain(schedule),
                cause: Some(cause),
            },
        }
    }
}

impl std::fmt::Debug for ExplanationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplanationGateway")
            .field("remote", &self.is_remote())
            .finish()
    }
}
