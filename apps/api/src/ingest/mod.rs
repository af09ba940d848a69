// Resume Ingestion
// Turns an uploaded file into a ResumePayload the analysis provider can send as-is.

pub mod docx;
pub mod handlers;
pub mod sample;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::resume::{MIME_DOCX, MIME_PDF};
use crate::models::ResumePayload;

/// Extensions accepted at the upload boundary.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file type '{0}'. Upload a .pdf, .docx or .txt file")]
    UnsupportedExtension(String),

    #[error("Failed to parse .docx file: {0}")]
    DocxExtraction(#[from] docx::DocxError),

    #[error("Invalid resume payload: {0}")]
    InvalidPayload(String),
}

/// Lowercased extension of `file_name`, if it has one.
fn extension_of(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Rejects anything outside `.pdf`, `.docx`, `.txt`.
pub fn check_extension(file_name: &str) -> Result<(), IngestError> {
    match extension_of(file_name) {
        Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(IngestError::UnsupportedExtension(file_name.to_string())),
    }
}

/// MIME type used to pick the ingestion path: the declared type when the client sent a
/// meaningful one, otherwise a guess from the extension.
pub fn effective_mime_type(file_name: &str, declared: Option<&str>) -> String {
    let declared = declared
        .map(|m| m.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != "application/octet-stream");

    if let Some(mime) = declared {
        return mime;
    }

    match extension_of(file_name).as_deref() {
        Some("pdf") => MIME_PDF.to_string(),
        Some("docx") => MIME_DOCX.to_string(),
        _ => "text/plain".to_string(),
    }
}

/// Converts raw upload bytes into a `ResumePayload`.
///
/// - PDF: base64 passthrough, the model reads the document directly.
/// - DOCX: raw text extraction; failure produces no payload.
/// - anything else: decoded as text, invalid UTF-8 replaced.
pub fn ingest_resume(
    file_name: &str,
    declared_mime: Option<&str>,
    bytes: &[u8],
) -> Result<ResumePayload, IngestError> {
    let mime = effective_mime_type(file_name, declared_mime);
    debug!("Ingesting {file_name} ({} bytes) as {mime}", bytes.len());

    let payload = match mime.as_str() {
        MIME_PDF => ResumePayload::binary(BASE64.encode(bytes), MIME_PDF),
        MIME_DOCX => {
            let text = docx::extract_raw_text(bytes).map_err(|e| {
                warn!("Failed to parse docx {file_name}: {e}");
                IngestError::from(e)
            })?;
            ResumePayload::text(text)
        }
        _ => ResumePayload::text(String::from_utf8_lossy(bytes).into_owned()),
    };

    Ok(payload)
}

/// Checks a payload supplied directly by a client: only PDF travels as base64, and base64
/// content must decode.
pub fn validate_payload(payload: &ResumePayload) -> Result<(), IngestError> {
    let binary = payload.mime_type == MIME_PDF;
    if payload.is_base64 != binary {
        return Err(IngestError::InvalidPayload(format!(
            "isBase64 must be {binary} for mimeType '{}'",
            payload.mime_type
        )));
    }
    if payload.is_base64 && BASE64.decode(&payload.content).is_err() {
        return Err(IngestError::InvalidPayload(
            "content is not valid base64".to_string(),
        ));
    }
    Ok(())
}
