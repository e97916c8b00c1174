//! # Pulsia Planner
//!
//! Planning service: takes a list of named tasks with durations, has an external
//! constraint solver place them on day offsets, and returns the schedule together
//! with a natural-language explanation.
//!
//! ## Architecture
//!
//! ```text
//!   POST /ajouterplan
//!          │
//!          ▼
//!   ┌─────────────┐     tasks / assignments     ┌───────────────────┐
//!   │   Planner   │◀──────────────────────────▶│  Solver (HTTP)     │
//!   │             │                             └───────────────────┘
//!   │             │     schedule / prose        ┌───────────────────┐
//!   │             │◀──────────────────────────▶│  Explainer (HTTP)  │
//!   └─────────────┘                             │  or local fallback │
//!                                               └───────────────────┘
//! ```
//!
//! ## Modules
//! - `planning`: canonical types, normalization, error taxonomy and the orchestrator
//! - `solver`: solver gateway
//! - `explain`: explanation gateway and deterministic fallback
//! - `calendar`: day-offset arithmetic for calendar views
//! - `api`: HTTP transport

pub mod api;
pub mod calendar;
pub mod config;
pub mod explain;
pub mod planning;
pub mod solver;
pub mod util;

pub use config::{Config, PlannerConfig};
pub use planning::{Planner, PlanningError, PlanningResult, ScheduleEntry, TaskSpec};
