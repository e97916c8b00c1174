//! Planning orchestrator: the only component that knows both gateways.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ConfigError, PlannerConfig};
use crate::explain::{Explanation, ExplanationGateway};
use crate::solver::{HttpSolver, Solver};

use super::{normalize, PlanningError, PlanningResult, TaskSpec};

/// Runs a plan request: solve, normalize, explain, assemble.
///
/// Holds no per-request state, so one instance is shared by all requests.
#[derive(Clone)]
pub struct Planner {
    solver: Option<Arc<dyn Solver>>,
    explainer: ExplanationGateway,
}

impl Planner {
    /// Create a planner from already-built gateways.
    ///
    /// `solver = None` means the solver endpoint is not configured; every `plan` call
    /// then fails with a configuration error without touching the network.
    pub fn new(solver: Option<Arc<dyn Solver>>, explainer: ExplanationGateway) -> Self {
        Self { solver, explainer }
    }

    /// Build the HTTP gateways described by `config`. Both share one connection pool.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let client = reqwest::Client::new();
        let solver = config.solver.endpoint.clone().map(|endpoint| {
            Arc::new(HttpSolver::with_client(
                client.clone(),
                endpoint,
                config.solver.timeout,
            )) as Arc<dyn Solver>
        });
        let explainer = ExplanationGateway::from_config(&config.explainer, client);
        Self::new(solver, explainer)
    }

    pub fn solver_configured(&self) -> bool {
        self.solver.is_some()
    }

    pub fn explainer_configured(&self) -> bool {
        self.explainer.is_remote()
    }

    /// Plan `tasks`.
    ///
    /// Fails only on a missing solver endpoint or a solver failure; the explanation
    /// step cannot fail the request.
    pub async fn plan(&self, tasks: &[TaskSpec]) -> Result<PlanningResult, PlanningError> {
        let solver = self
            .solver
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("SOLVER_API_URL".to_string()))?;

        let started = Instant::now();
        let assignments = solver.solve(tasks).await.map_err(|e| {
            tracing::error!("Solver call failed: {}", e);
            PlanningError::SolverUnavailable(e)
        })?;

        let schedule = normalize(&assignments).map_err(|e| {
            tracing::error!("Solver reply rejected: {}", e);
            PlanningError::SolverUnavailable(e)
        })?;

        let explanation = match self.explainer.explain(&schedule).await {
            Explanation::Explained(text) => {
                tracing::info!("Explanation provided by remote service");
                text
            }
            Explanation::FallbackUsed { text, cause: None } => text,
            Explanation::FallbackUsed {
                text,
                cause: Some(cause),
            } => {
                tracing::warn!("Using local explanation: {}", cause);
                text
            }
        };

        tracing::info!(
            "Planned {} tasks into {} entries in {:?}",
            tasks.len(),
            schedule.len(),
            started.elapsed()
        );

        Ok(PlanningResult {
            schedule,
            explanation,
        })
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("solver_configured", &self.solver_configured())
            .field("explainer", &self.explainer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explain::fallback;
    use crate::planning::RawAssignment;
    use crate::solver::{SolverError, SolverErrorKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::net::TcpListener;
    use url::Url;

    const SCENARIO_TEXT: &str = "La tâche \"frontend\" commence au jour 1 et se termine au jour 3. \
                                 La tâche \"backend\" commence au jour 3 et se termine au jour 4.";
    const SCENARIO_REPLY: &str =
        r#"[{"task":"frontend","start":1,"end":3},{"task":"backend","start":3,"end":4}]"#;

    /// Solver double that counts calls and returns a fixed reply.
    struct StubSolver {
        reply: Result<Vec<RawAssignment>, SolverError>,
        calls: AtomicUsize,
    }

    impl StubSolver {
        fn new(reply: Result<Vec<RawAssignment>, SolverError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Solver for StubSolver {
        async fn solve(&self, _tasks: &[TaskSpec]) -> Result<Vec<RawAssignment>, SolverError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn scenario_tasks() -> Vec<TaskSpec> {
        vec![TaskSpec::new("frontend", 2), TaskSpec::new("backend", 1)]
    }

    fn endpoint(server: &mockito::ServerGuard, path: &str) -> Url {
        Url::parse(&format!("{}{}", server.url(), path)).unwrap()
    }

    async fn mock_solver(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("POST", "/solve")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn scenario_a_without_explanation_service() {
        let mut server = mockito::Server::new_async().await;
        let solve = mock_solver(&mut server, SCENARIO_REPLY).await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            None,
        ));
        let result = planner.plan(&scenario_tasks()).await.unwrap();

        let durations: Vec<i64> = result.schedule.iter().map(|e| e.duration).collect();
        assert_eq!(durations, vec![2, 1]);
        assert_eq!(result.explanation, SCENARIO_TEXT);
        solve.assert_async().await;
    }

    #[tokio::test]
    async fn scenario_b_explanation_service_times_out() {
        let mut server = mockito::Server::new_async().await;
        let _solve = mock_solver(&mut server, SCENARIO_REPLY).await;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hold = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let mut config = PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            Some(Url::parse(&format!("http://{}/explain", addr)).unwrap()),
        );
        config.explainer.timeout = Duration::from_millis(200);

        let result = Planner::from_config(&config)
            .plan(&scenario_tasks())
            .await
            .unwrap();

        let durations: Vec<i64> = result.schedule.iter().map(|e| e.duration).collect();
        assert_eq!(durations, vec![2, 1]);
        assert_eq!(result.explanation, SCENARIO_TEXT);

        hold.abort();
    }

    #[tokio::test]
    async fn scenario_c_missing_solver_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let explain = server
            .mock("POST", "/explain")
            .expect(0)
            .create_async()
            .await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            None,
            Some(endpoint(&server, "/explain")),
        ));
        let err = planner.plan(&scenario_tasks()).await.unwrap_err();

        assert!(matches!(err, PlanningError::Configuration(_)));
        assert!(err.details().contains("SOLVER_API_URL"));
        explain.assert_async().await;
    }

    #[tokio::test]
    async fn scenario_d_empty_task_list() {
        let mut server = mockito::Server::new_async().await;
        let _solve = mock_solver(&mut server, "[]").await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            None,
        ));
        let result = planner.plan(&[]).await.unwrap();

        assert!(result.schedule.is_empty());
        assert_eq!(result.explanation, "");
    }

    #[tokio::test]
    async fn remote_explanation_is_returned() {
        let mut server = mockito::Server::new_async().await;
        let _solve = mock_solver(&mut server, SCENARIO_REPLY).await;
        let explain = server
            .mock("POST", "/explain")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"explanation":"<think>ok</think>Le frontend d'abord, puis le backend."}"#)
            .create_async()
            .await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            Some(endpoint(&server, "/explain")),
        ));
        let result = planner.plan(&scenario_tasks()).await.unwrap();

        assert_eq!(result.explanation, "Le frontend d'abord, puis le backend.");
        explain.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_explanation_reply_falls_back() {
        let mut server = mockito::Server::new_async().await;
        let _solve = mock_solver(&mut server, SCENARIO_REPLY).await;
        let _explain = server
            .mock("POST", "/explain")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer":"wrong field"}"#)
            .create_async()
            .await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            Some(endpoint(&server, "/explain")),
        ));
        let result = planner.plan(&scenario_tasks()).await.unwrap();

        assert_eq!(result.explanation, fallback::explain(&result.schedule));
    }

    #[tokio::test]
    async fn solver_failure_skips_explanation() {
        let mut server = mockito::Server::new_async().await;
        let _solve = server
            .mock("POST", "/solve")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;
        let explain = server
            .mock("POST", "/explain")
            .expect(0)
            .create_async()
            .await;

        let planner = Planner::from_config(&PlannerConfig::with_endpoints(
            Some(endpoint(&server, "/solve")),
            Some(endpoint(&server, "/explain")),
        ));
        let err = planner.plan(&scenario_tasks()).await.unwrap_err();

        match err {
            PlanningError::SolverUnavailable(cause) => {
                assert_eq!(cause.kind, SolverErrorKind::ServerError);
                assert_eq!(cause.status_code, Some(502));
            }
            other => panic!("expected solver failure, got {:?}", other),
        }
        explain.assert_async().await;
    }

    #[tokio::test]
    async fn durations_are_always_derived() {
        let mut raw = vec![
            RawAssignment::new("a", 1, 1),
            RawAssignment::new("b", 2, 9),
            RawAssignment::new("c", 9, 12),
        ];
        for r in raw.iter_mut() {
            r.duration = Some(1000);
        }
        let solver = StubSolver::new(Ok(raw));
        let planner = Planner::new(
            Some(solver.clone() as Arc<dyn Solver>),
            ExplanationGateway::fallback_only(),
        );

        let tasks = vec![
            TaskSpec::new("a", 1),
            TaskSpec::new("b", 7),
            TaskSpec::new("c", 3),
        ];
        let result = planner.plan(&tasks).await.unwrap();

        assert_eq!(result.schedule.len(), 3);
        for entry in &result.schedule {
            assert!(entry.start >= 1);
            assert!(entry.end >= entry.start);
            assert_eq!(entry.duration, entry.end - entry.start);
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalid_offsets_from_any_solver_are_rejected() {
        let mut server = mockito::Server::new_async().await;
        let explain = server
            .mock("POST", "/explain")
            .expect(0)
            .create_async()
            .await;

        let solver = StubSolver::new(Ok(vec![
            RawAssignment::new("x", 5, 2),
            RawAssignment::new("y", 0, 1),
        ]));
        let explainer = ExplanationGateway::from_config(
            &PlannerConfig::with_endpoints(None, Some(endpoint(&server, "/explain"))).explainer,
            reqwest::Client::new(),
        );
        let planner = Planner::new(Some(solver.clone() as Arc<dyn Solver>), explainer);

        let err = planner.plan(&scenario_tasks()).await.unwrap_err();

        match err {
            PlanningError::SolverUnavailable(cause) => {
                assert_eq!(cause.kind, SolverErrorKind::InvalidResponse);
                assert!(cause.message.contains("\"x\""));
            }
            other => panic!("expected rejected solver reply, got {:?}", other),
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
        explain.assert_async().await;
    }

    #[tokio::test]
    async fn solver_is_called_once_on_failure() {
        let solver = StubSolver::new(Err(SolverError::network_error("reset".to_string())));
        let planner = Planner::new(
            Some(solver.clone() as Arc<dyn Solver>),
            ExplanationGateway::fallback_only(),
        );

        let err = planner.plan(&scenario_tasks()).await.unwrap_err();
        assert!(matches!(err, PlanningError::SolverUnavailable(_)));
        assert_eq!(solver.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_requests_are_independent() {
        let solver = StubSolver::new(Ok(vec![RawAssignment::new("frontend", 1, 3)]));
        let planner = Arc::new(Planner::new(
            Some(solver.clone() as Arc<dyn Solver>),
            ExplanationGateway::fallback_only(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let planner = Arc::clone(&planner);
                tokio::spawn(async move { planner.plan(&[TaskSpec::new("frontend", 2)]).await })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.schedule.len(), 1);
            assert_eq!(result.explanation, fallback::explain(&result.schedule));
        }
        assert_eq!(solver.calls.load(Ordering::SeqCst), 8);
    }
}
