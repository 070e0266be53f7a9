//! sovnote-ai library interface
//!
//! Exposes the analyzer, its collaborators, and the router for the binary and
//! for integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::services::NoteAnalyzer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only analysis service built at startup
    pub analyzer: Arc<NoteAnalyzer>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(analyzer: NoteAnalyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// CORS is fully permissive (any origin, method, header) so sibling
/// containers and browser front-ends can call the service directly.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::analyze_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
