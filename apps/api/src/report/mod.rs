// PDF Report Export
// Pure layout planning (layout.rs) followed by a printpdf replay (render.rs).

pub mod handlers;
pub mod layout;
pub mod metrics;
pub mod render;

use chrono::Utc;
use thiserror::Error;

use crate::models::AnalysisResult;

pub const REPORT_FILE_NAME: &str = "SkillGap_Report.pdf";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("PDF generation failed: {0}")]
    Pdf(#[from] printpdf::Error),
}

/// Builds the downloadable report for `result`, stamped with today's date.
pub fn generate_report(result: &AnalysisResult) -> Result<Vec<u8>, ReportError> {
    let generated_on = Utc::now().format("%B %d, %Y").to_string();
    let plan = layout::plan_report(result, &generated_on);
    tracing::debug!("Report planned over {} page(s)", plan.pages.len());
    render::render_pdf(&plan)
}
