use axum::{extract::Multipart, extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::dashboard::reducer::DashboardEvent;
use crate::dashboard::view::InputSummary;
use crate::errors::AppError;
use crate::ingest::{check_extension, ingest_resume};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct JobDescriptionBody {
    pub text: String,
}

/// PUT /api/v1/input/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Json(body): Json<JobDescriptionBody>,
) -> Json<InputSummary> {
    let session = state
        .dispatch(DashboardEvent::JobDescriptionChanged(body.text))
        .await;
    Json(InputSummary::from(&session))
}

/// POST /api/v1/input/resume (multipart, field `file`)
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<InputSummary>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no name".to_string()))?;
        check_extension(&file_name)?;

        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let payload = ingest_resume(&file_name, content_type.as_deref(), &bytes)?;
        info!(
            "Loaded resume {file_name} ({} bytes, {})",
            bytes.len(),
            payload.mime_type
        );

        let session = state
            .dispatch(DashboardEvent::ResumeLoaded { file_name, payload })
            .await;
        return Ok(Json(InputSummary::from(&session)));
    }

    Err(AppError::Validation(
        "Multipart field 'file' is required".to_string(),
    ))
}

/// POST /api/v1/input/sample
pub async fn handle_load_sample(State(state): State<AppState>) -> Json<InputSummary> {
    let session = state.dispatch(DashboardEvent::SampleLoaded).await;
    Json(InputSummary::from(&session))
}
