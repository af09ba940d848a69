use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::report::{generate_report, REPORT_FILE_NAME};
use crate::state::AppState;

/// GET /api/v1/report.pdf
pub async fn handle_download_report(State(state): State<AppState>) -> Result<Response, AppError> {
    let result = state
        .snapshot()
        .await
        .result
        .ok_or_else(|| AppError::NotFound("No analysis result to export".to_string()))?;

    // PDF assembly is CPU-bound and the document type is not Send.
    let bytes = tokio::task::spawn_blocking(move || generate_report(&result))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Report task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
