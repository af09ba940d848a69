//! Analysis Provider: the narrow seam between the dashboard and the hosted model.
//!
//! Default: `GeminiAnalysisProvider` (schema-constrained `generateContent` call).
//! Tests swap in a scripted provider without touching handlers or the reducer.
//!
//! `AppState` holds an `Arc<dyn AnalysisProvider>`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::analysis::prompts::{GAP_ANALYSIS_SYSTEM, JD_HEADER, PROFILE_ATTACHED, PROFILE_HEADER};
use crate::analysis::schema::analysis_schema;
use crate::llm_client::prompts::with_json_only;
use crate::llm_client::{InlineData, JsonCallOptions, LlmClient, LlmError, Part, MODEL};
use crate::models::{AnalysisMode, AnalysisRequest, AnalysisResult, ResumePayload};

// ────────────────────────────────────────────────────────────────────────────
// Error taxonomy
// ────────────────────────────────────────────────────────────────────────────

/// Every way an analysis call can fail. All variants are terminal for the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("API key is missing. Set API_KEY (or VITE_API_KEY) in the environment or .env file.")]
    MissingApiKey,

    #[error("Model {0} not found. Please check API availability.")]
    ModelUnavailable(String),

    #[error("Empty response from AI model")]
    EmptyResponse,

    #[error("AI response was not valid JSON for the analysis schema: {0}")]
    MalformedResponse(String),

    #[error("AI response failed validation: {0}")]
    InvalidResult(String),

    #[error("AI request failed: {0}")]
    Request(String),
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::MissingApiKey => AnalysisError::MissingApiKey,
            LlmError::ModelNotFound { model, .. } => AnalysisError::ModelUnavailable(model),
            LlmError::EmptyContent => AnalysisError::EmptyResponse,
            LlmError::Parse(e) => AnalysisError::MalformedResponse(e.to_string()),
            other => AnalysisError::Request(other.to_string()),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap the model backend without touching the endpoint,
/// handler, or reducer code.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, AnalysisError>;
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiAnalysisProvider
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiAnalysisProvider {
    llm: LlmClient,
    schema: Value,
    system: String,
}

impl GeminiAnalysisProvider {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            schema: analysis_schema(),
            system: with_json_only(GAP_ANALYSIS_SYSTEM),
        }
    }
}

#[async_trait]
impl AnalysisProvider for GeminiAnalysisProvider {
    async fn analyze(
        &self,
        request: &AnalysisRequest,
        mode: AnalysisMode,
    ) -> Result<AnalysisResult, AnalysisError> {
        let jd_part = format!("{JD_HEADER}{}", request.job_description);
        let profile_text;
        let parts = match &request.resume {
            ResumePayload {
                content,
                mime_type,
                is_base64: true,
            } => vec![
                Part::Text { text: jd_part.as_str() },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: mime_type.as_str(),
                        data: content.as_str(),
                    },
                },
                Part::Text {
                    text: PROFILE_ATTACHED,
                },
            ],
            ResumePayload { content, .. } => {
                profile_text = format!("{PROFILE_HEADER}{content}");
                vec![Part::Text { text: jd_part.as_str() }, Part::Text { text: profile_text.as_str() }]
            }
        };

        let options = JsonCallOptions {
            response_schema: &self.schema,
            max_output_tokens: mode.max_output_tokens(),
            thinking_budget: mode.thinking_budget(),
        };

        info!(
            "Running gap analysis (model: {MODEL}, mode: {mode:?}, resume: {})",
            request.resume.mime_type
        );

        let parsed: AnalysisResult = self
            .llm
            .call_json(&parts, &self.system, &options)
            .await
            .map_err(AnalysisError::from)?;

        let mut result = parsed
            .validated()
            .map_err(|v| AnalysisError::InvalidResult(v.to_string()))?;
        result.model_used = Some(mode.label().to_string());

        Ok(result)
    }
}
