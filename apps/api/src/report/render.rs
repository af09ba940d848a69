use printpdf::{BuiltinFont, Line, Mm, PdfDocument, Point};

use crate::report::layout::{DrawOp, ReportPlan, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, REPORT_TITLE};
use crate::report::ReportError;

/// Replays a plan onto a printpdf document and returns the encoded file.
///
/// `PdfDocumentReference` is not `Send`; call this from a blocking task, never across
/// an await point.
pub fn render_pdf(plan: &ReportPlan) -> Result<Vec<u8>, ReportError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");

    let font_regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let font_bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

    for (index, page) in plan.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };
        layer.set_outline_thickness(0.3);

        // The plan measures from the top edge; PDF user space starts at the bottom.
        for op in &page.ops {
            match op {
                DrawOp::Text {
                    text,
                    x_mm,
                    y_mm,
                    size_pt,
                    bold,
                } => {
                    let font = if *bold { &font_bold } else { &font_regular };
                    layer.use_text(
                        text.as_str(),
                        *size_pt,
                        Mm(*x_mm),
                        Mm(PAGE_HEIGHT_MM - *y_mm),
                        font,
                    );
                }
                DrawOp::Rule { x1_mm, x2_mm, y_mm } => {
                    let y = Mm(PAGE_HEIGHT_MM - *y_mm);
                    layer.add_line(Line {
                        points: vec![
                            (Point::new(Mm(*x1_mm), y), false),
                            (Point::new(Mm(*x2_mm), y), false),
                        ],
                        is_closed: false,
                    });
                }
            }
        }
    }

    Ok(doc.save_to_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::fixtures::{sample_result, skill};
    use crate::models::Importance;
    use crate::report::layout::plan_report;

    #[test]
    fn test_output_is_a_pdf() {
        let plan = plan_report(&sample_result(), "October 18, 2026");
        let bytes = render_pdf(&plan).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_multi_page_plan_renders() {
        let mut result = sample_result();
        result.skills = (0..90)
            .map(|i| skill(&format!("Skill {i}"), Importance::Low, 2, 2))
            .collect();
        let plan = plan_report(&result, "today");
        assert!(plan.pages.len() > 1);

        let bytes = render_pdf(&plan).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }
}
