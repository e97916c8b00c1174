//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::planning::{Planner, PlanningError, PlanningResult, TaskSpec};

use super::types::*;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    /// Stateless planner shared by all requests
    pub planner: Planner,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let planner = Planner::from_config(&config.planner);
        Self { config, planner }
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/ajouterplan", post(create_plan))
        .route("/api/plan", post(create_plan))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config.clone()));

    if !state.planner.solver_configured() {
        tracing::warn!("SOLVER_API_URL is not set; plan requests will fail until it is configured");
    }
    if !state.planner.explainer_configured() {
        tracing::info!("No explanation service configured (AI_MODEL_API), using local explanations");
    }

    let app = router(Arc::clone(&state));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        solver_configured: state.planner.solver_configured(),
        explainer_configured: state.planner.explainer_configured(),
    })
}

fn error_status(err: &PlanningError) -> StatusCode {
    match err {
        PlanningError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PlanningError::SolverUnavailable(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        PlanningError::SolverUnavailable(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Plan a task list.
async fn create_plan(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<TaskSpec>>, JsonRejection>,
) -> Result<Json<PlanningResult>, (StatusCode, Json<ErrorResponse>)> {
    let Json(tasks) = body.map_err(|rejection| {
        (
            rejection.status(),
            Json(ErrorResponse::invalid_request(rejection.body_text())),
        )
    })?;

    for task in &tasks {
        task.validate().map_err(|details| {
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_request(details)),
            )
        })?;
    }

    let span = tracing::info_span!("plan", request_id = %Uuid::new_v4(), tasks = tasks.len());
    async move {
        match state.planner.plan(&tasks).await {
            Ok(result) => Ok(Json(result)),
            Err(err) => {
                tracing::error!("Plan request failed: {}", err.details());
                Err((error_status(&err), Json(ErrorResponse::from(&err))))
            }
        }
    }
    .instrument(span)
    .await
}
