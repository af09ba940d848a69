pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::dashboard::handlers as dashboard;
use crate::ingest::handlers as ingest;
use crate::report::handlers as report;
use crate::state::AppState;

/// Largest accepted request body (résumé uploads included).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Input draft
        .route(
            "/api/v1/input/job-description",
            put(ingest::handle_set_job_description),
        )
        .route("/api/v1/input/resume", post(ingest::handle_upload_resume))
        .route("/api/v1/input/sample", post(ingest::handle_load_sample))
        // Analysis
        .route(
            "/api/v1/analysis",
            post(analysis::handle_run_analysis)
                .get(analysis::handle_get_analysis)
                .delete(analysis::handle_reset_analysis),
        )
        // Dashboard view
        .route("/api/v1/dashboard", get(dashboard::handle_get_dashboard))
        .route("/api/v1/dashboard/search", put(dashboard::handle_set_search))
        .route("/api/v1/dashboard/focus", put(dashboard::handle_focus_skill))
        .route(
            "/api/v1/dashboard/actions/toggle",
            post(dashboard::handle_toggle_action),
        )
        .route("/api/v1/theme/toggle", post(dashboard::handle_toggle_theme))
        .route(
            "/api/v1/theme",
            axum::routing::delete(dashboard::handle_reset_theme),
        )
        // Export
        .route("/api/v1/report.pdf", get(report::handle_download_report))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
