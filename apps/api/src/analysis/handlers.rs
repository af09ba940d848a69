use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{info, warn};

use crate::dashboard::reducer::{reduce, DashboardEvent, DashboardState};
use crate::errors::AppError;
use crate::ingest::validate_payload;
use crate::models::{AnalysisMode, AnalysisRequest, AnalysisResult, ResumePayload};
use crate::state::AppState;
use crate::store::{clear_result, save_result};

/// File name recorded for a résumé supplied inline in the analysis body.
const INLINE_RESUME_NAME: &str = "inline";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeBody {
    #[serde(default)]
    pub mode: AnalysisMode,
    pub job_description: Option<String>,
    pub resume: Option<ResumePayload>,
    pub resume_file_name: Option<String>,
}

/// Applies the body's draft overrides and claims the session for one analysis.
///
/// Runs entirely under the session lock so two concurrent submissions cannot both
/// observe `loading == false`.
fn begin_analysis(session: &mut DashboardState, body: AnalyzeBody) -> Result<AnalysisRequest, AppError> {
    if session.loading {
        return Err(AppError::Conflict(
            "An analysis is already in progress".to_string(),
        ));
    }

    if let Some(payload) = &body.resume {
        validate_payload(payload)?;
    }

    let mut next = std::mem::take(session);
    if let Some(text) = body.job_description {
        next = reduce(next, DashboardEvent::JobDescriptionChanged(text));
    }
    if let Some(payload) = body.resume {
        let file_name = body
            .resume_file_name
            .unwrap_or_else(|| INLINE_RESUME_NAME.to_string());
        next = reduce(next, DashboardEvent::ResumeLoaded { file_name, payload });
    }

    let pending = next.pending_request();
    let request = match pending {
        Some(request) => request,
        None => {
            let message = if next.input.job_description.trim().is_empty() {
                "A job description is required before analysis"
            } else {
                "A resume must be loaded before analysis"
            };
            *session = next;
            return Err(AppError::Validation(message.to_string()));
        }
    };

    *session = reduce(next, DashboardEvent::AnalyzeRequested);
    Ok(request)
}

/// POST /api/v1/analysis
///
/// Body is optional: `{mode?, jobDescription?, resume?, resumeFileName?}`.
pub async fn handle_run_analysis(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AnalysisResult>, AppError> {
    let body: AnalyzeBody = if body.iter().all(u8::is_ascii_whitespace) {
        AnalyzeBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid analysis request: {e}")))?
    };
    let mode = body.mode;

    let request = {
        let mut session = state.session.lock().await;
        begin_analysis(&mut session, body)?
    };

    info!("Starting {mode:?} analysis");
    // The session lock is released here; `loading` marks the session busy.
    let outcome = state.provider.analyze(&request, mode).await;

    match outcome {
        Ok(result) => {
            state
                .dispatch(DashboardEvent::AnalyzeSucceeded(result.clone()))
                .await;
            if let Err(e) = save_result(state.store.as_ref(), &result).await {
                warn!("Failed to persist analysis result: {e}");
            }
            info!("Analysis complete (match score {})", result.match_score);
            Ok(Json(result))
        }
        Err(e) => {
            state
                .dispatch(DashboardEvent::AnalyzeFailed(e.to_string()))
                .await;
            Err(AppError::Analysis(e))
        }
    }
}

/// GET /api/v1/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
) -> Result<Json<AnalysisResult>, AppError> {
    state
        .snapshot()
        .await
        .result
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No analysis result yet".to_string()))
}

/// DELETE /api/v1/analysis
///
/// Refused with 409 while an analysis is outstanding.
pub async fn handle_reset_analysis(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .apply_if(DashboardEvent::Reset, |session| !session.loading)
        .await
        .ok_or_else(|| {
            AppError::Conflict("Cannot reset while an analysis is in progress".to_string())
        })?;

    if let Err(e) = clear_result(state.store.as_ref()).await {
        warn!("Failed to clear persisted analysis result: {e}");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{MIME_PDF, MIME_TEXT};

    fn body(jd: Option<&str>, resume: Option<&str>) -> AnalyzeBody {
        AnalyzeBody {
            job_description: jd.map(str::to_string),
            resume: resume.map(ResumePayload::text),
            ..AnalyzeBody::default()
        }
    }

    #[test]
    fn test_begin_claims_session() {
        let mut session = DashboardState::default();
        let request = begin_analysis(&mut session, body(Some("JD"), Some("CV"))).unwrap();
        assert_eq!(request.job_description, "JD");
        assert!(session.loading);
        assert_eq!(session.input.resume_file_name.as_deref(), Some("inline"));
    }

    #[test]
    fn test_begin_rejects_while_loading() {
        let mut session = DashboardState::default();
        begin_analysis(&mut session, body(Some("JD"), Some("CV"))).unwrap();
        let err = begin_analysis(&mut session, AnalyzeBody::default()).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn test_begin_keeps_overrides_when_blocked() {
        let mut session = DashboardState::default();
        let err = begin_analysis(&mut session, body(Some("JD"), None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("resume")));
        assert_eq!(session.input.job_description, "JD");
        assert!(!session.loading);
    }

    #[test]
    fn test_begin_rejects_base64_text_resume() {
        let mut session = DashboardState::default();
        let body = AnalyzeBody {
            job_description: Some("JD".to_string()),
            resume: Some(ResumePayload::binary("CV".to_string(), MIME_TEXT)),
            ..AnalyzeBody::default()
        };
        let err = begin_analysis(&mut session, body).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("isBase64")));
        assert!(!session.loading);
        assert!(session.input.resume.is_none());
        assert!(session.input.job_description.is_empty());
    }

    #[test]
    fn test_begin_rejects_malformed_pdf_resume() {
        let mut unflagged = ResumePayload::text("JVBERi0xLjQ=");
        unflagged.mime_type = MIME_PDF.to_string();
        let garbled = ResumePayload::binary("%%%".to_string(), MIME_PDF);

        for resume in [unflagged, garbled] {
            let mut session = DashboardState::default();
            let body = AnalyzeBody {
                job_description: Some("JD".to_string()),
                resume: Some(resume),
                ..AnalyzeBody::default()
            };
            let err = begin_analysis(&mut session, body).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
            assert!(session.input.resume.is_none());
        }
    }

    #[test]
    fn test_begin_accepts_base64_pdf_resume() {
        let mut session = DashboardState::default();
        let body = AnalyzeBody {
            job_description: Some("JD".to_string()),
            resume: Some(ResumePayload::binary("JVBERi0xLjQ=".to_string(), MIME_PDF)),
            ..AnalyzeBody::default()
        };
        let request = begin_analysis(&mut session, body).unwrap();
        assert!(request.resume.is_base64);
        assert!(session.loading);
    }

    #[test]
    fn test_begin_blank_job_description() {
        let mut session = DashboardState::default();
        let err = begin_analysis(&mut session, body(Some("  "), Some("CV"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("job description")));
    }
}
