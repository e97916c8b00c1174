//! HTTP client for the explanation service.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use super::{ExplainError, Explainer};
use crate::planning::ScheduleEntry;
use crate::util::truncate_for_log;

/// Explanation service reached over HTTP.
///
/// Sends `{"schedule": [...]}` and expects `{"explanation": "..."}` back.
#[derive(Debug, Clone)]
pub struct HttpExplainer {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

#[derive(Serialize)]
struct ExplainRequest<'a> {
    schedule: &'a [ScheduleEntry],
}

impl HttpExplainer {
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Self::with_client(Client::new(), endpoint, timeout)
    }

    pub fn with_client(client: Client, endpoint: Url, timeout: Duration) -> Self {
        Self {
            client,
            endpoint,
            timeout,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> ExplainError {
        if e.is_timeout() {
            ExplainError::Timeout(format!("no answer within {:?}", self.timeout))
        } else {
            ExplainError::Transport(e.to_string())
        }
    }
}

/// Reasoning models wrap their scratchpad in `<think>` tags; it is not part of the answer.
fn strip_reasoning(text: &str) -> String {
    static THINK: OnceLock<Regex> = OnceLock::new();
    let re = THINK.get_or_init(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));
    re.replace_all(text, "").trim().to_string()
}

/// Pull a usable explanation out of the reply body.
fn extract_explanation(body: &str) -> Result<String, ExplainError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        ExplainError::Malformed(format!("{}, body: {}", e, truncate_for_log(body, 200)))
    })?;

    let raw = value
        .get("explanation")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ExplainError::Malformed("missing string field 'explanation'".to_string()))?;

    let text = strip_reasoning(raw);
    if text.is_empty() {
        return Err(ExplainError::Malformed("explanation is empty".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl Explainer for HttpExplainer {
    async fn explain(&self, schedule: &[ScheduleEntry]) -> Result<String, ExplainError> {
        tracing::debug!(
            "Requesting explanation for {} entries from {}",
            schedule.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .timeout(self.timeout)
            .json(&ExplainRequest { schedule })
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(ExplainError::Status(
                status.as_u16(),
                truncate_for_log(&body, 200),
            ));
        }

        extract_explanation(&body)
    }
}
