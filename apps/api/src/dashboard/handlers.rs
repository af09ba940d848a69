use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::dashboard::reducer::DashboardEvent;
use crate::dashboard::view::{build_view, DashboardView};
use crate::errors::AppError;
use crate::store::{clear_theme, save_theme};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchBody {
    pub query: String,
}

#[derive(Deserialize)]
pub struct FocusBody {
    pub skill: String,
}

#[derive(Deserialize)]
pub struct ActionBody {
    pub action: String,
}

/// GET /api/v1/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardQuery>,
) -> Json<DashboardView> {
    let session = state.snapshot().await;
    Json(build_view(&session, params.q.as_deref()))
}

/// PUT /api/v1/dashboard/search
pub async fn handle_set_search(
    State(state): State<AppState>,
    Json(body): Json<SearchBody>,
) -> Json<DashboardView> {
    let session = state
        .dispatch(DashboardEvent::SearchChanged(body.query))
        .await;
    Json(build_view(&session, None))
}

/// PUT /api/v1/dashboard/focus
pub async fn handle_focus_skill(
    State(state): State<AppState>,
    Json(body): Json<FocusBody>,
) -> Result<Json<DashboardView>, AppError> {
    let session = state
        .apply_if(DashboardEvent::SkillFocused(body.skill.clone()), |session| {
            session
                .result
                .as_ref()
                .is_some_and(|r| r.skills.iter().any(|s| s.name == body.skill))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Skill '{}' not found", body.skill)))?;
    Ok(Json(build_view(&session, None)))
}

/// POST /api/v1/dashboard/actions/toggle
pub async fn handle_toggle_action(
    State(state): State<AppState>,
    Json(body): Json<ActionBody>,
) -> Result<Json<DashboardView>, AppError> {
    let session = state
        .apply_if(DashboardEvent::ActionToggled(body.action.clone()), |session| {
            session
                .result
                .as_ref()
                .is_some_and(|r| r.learning_pathway.iter().any(|a| a.action == body.action))
        })
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!("Learning action '{}' not found", body.action))
        })?;
    Ok(Json(build_view(&session, None)))
}

/// POST /api/v1/theme/toggle
pub async fn handle_toggle_theme(State(state): State<AppState>) -> Json<DashboardView> {
    let session = state.dispatch(DashboardEvent::ThemeToggled).await;
    if let Err(e) = save_theme(state.store.as_ref(), session.theme).await {
        warn!("Failed to persist theme: {e}");
    }
    Json(build_view(&session, None))
}

/// DELETE /api/v1/theme
pub async fn handle_reset_theme(State(state): State<AppState>) -> Json<DashboardView> {
    let session = state.dispatch(DashboardEvent::ThemeReset).await;
    if let Err(e) = clear_theme(state.store.as_ref()).await {
        warn!("Failed to clear persisted theme: {e}");
    }
    Json(build_view(&session, None))
}
