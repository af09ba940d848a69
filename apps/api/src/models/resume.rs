use serde::{Deserialize, Serialize};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

/// A résumé normalized for the model: either text or a base64 binary the model reads directly.
///
/// `is_base64` is true iff `mime_type` is a binary format (PDF). Extracted DOCX text and
/// plain text both travel as `text/plain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    pub content: String,
    pub mime_type: String,
    pub is_base64: bool,
}

impl ResumePayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: MIME_TEXT.to_string(),
            is_base64: false,
        }
    }

    pub fn binary(base64_content: String, mime_type: &str) -> Self {
        Self {
            content: base64_content,
            mime_type: mime_type.to_string(),
            is_base64: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume: ResumePayload,
}
