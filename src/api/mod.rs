//! HTTP API for the planning service.
//!
//! ## Endpoints
//!
//! - `POST /ajouterplan` - Plan a task list and explain the schedule
//! - `POST /api/plan` - Same as `/ajouterplan`
//! - `GET /api/health` - Health check

mod routes;
pub mod types;

pub use routes::{router, serve, AppState};
pub use types::*;
