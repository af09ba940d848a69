//! Report layout planner.
//!
//! Turns an `AnalysisResult` into pages of positioned draw operations. Pure and
//! deterministic; the renderer only replays the operations onto PDF layers.
//! Coordinates are millimetres measured from the top-left corner of an A4 page.

use crate::models::{AnalysisResult, Skill};
use crate::report::metrics::{measure_mm, wrap_to_width, PT_TO_MM};

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 14.0;
pub const CONTENT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;

pub const REPORT_TITLE: &str = "SkillGap Radar - Analysis Report";

const TITLE_SIZE: f32 = 20.0;
const SCORE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;
const LINE_SPACING: f32 = 1.15;
const CELL_PADDING_MM: f32 = 1.5;
const SECTION_GAP_MM: f32 = 10.0;
const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        text: String,
        x_mm: f32,
        y_mm: f32,
        size_pt: f32,
        bold: bool,
    },
    /// Horizontal rule.
    Rule { x1_mm: f32, x2_mm: f32, y_mm: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlannedPage {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPlan {
    pub pages: Vec<PlannedPage>,
}

struct Column {
    title: &'static str,
    width_mm: f32,
}

const SKILL_COLUMNS: [Column; 5] = [
    Column { title: "Skill", width_mm: 62.0 },
    Column { title: "Required", width_mm: 28.0 },
    Column { title: "Observed", width_mm: 28.0 },
    Column { title: "Gap", width_mm: 28.0 },
    Column { title: "Importance", width_mm: 36.0 },
];

const PATHWAY_COLUMNS: [Column; 4] = [
    Column { title: "Action", width_mm: 70.0 },
    Column { title: "Priority", width_mm: 24.0 },
    Column { title: "Timeline", width_mm: 30.0 },
    Column { title: "Resource", width_mm: 58.0 },
];

fn line_height_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM * LINE_SPACING
}

/// Gap cell text: `-n` for a shortfall, `Match` otherwise.
pub fn gap_cell(skill: &Skill) -> String {
    if skill.has_gap() {
        format!("-{}", skill.gap)
    } else {
        "Match".to_string()
    }
}

/// Maps text onto what the built-in PDF fonts can draw. Typographic punctuation is
/// folded to ASCII; anything else non-ASCII becomes `?`.
pub fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' | '\u{2212}' | '\u{2022}' => '-',
            '\u{00A0}' | '\t' | '\n' | '\r' => ' ',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '?',
        })
        .collect()
}

/// Tracks the current page and the vertical position on it.
struct Cursor {
    pages: Vec<PlannedPage>,
    y_mm: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![PlannedPage::default()],
            y_mm: MARGIN_MM,
        }
    }

    fn bottom_limit() -> f32 {
        PAGE_HEIGHT_MM - MARGIN_MM
    }

    fn fits(&self, height_mm: f32) -> bool {
        self.y_mm + height_mm <= Self::bottom_limit()
    }

    fn new_page(&mut self) {
        self.pages.push(PlannedPage::default());
        self.y_mm = MARGIN_MM;
    }

    fn ensure(&mut self, height_mm: f32) {
        if !self.fits(height_mm) {
            self.new_page();
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// Draws one line of text whose top edge sits at the cursor, then advances.
    fn line(&mut self, text: &str, size_pt: f32, bold: bool) {
        let height = line_height_mm(size_pt);
        self.ensure(height);
        self.text_at(text, MARGIN_MM, self.y_mm, size_pt, bold);
        self.y_mm += height;
    }

    fn text_at(&mut self, text: &str, x_mm: f32, top_mm: f32, size_pt: f32, bold: bool) {
        // Baseline sits roughly one font size below the top of the line box.
        self.push(DrawOp::Text {
            text: text.to_string(),
            x_mm,
            y_mm: top_mm + size_pt * PT_TO_MM,
            size_pt,
            bold,
        });
    }

    fn rule(&mut self) {
        let y_mm = self.y_mm;
        self.push(DrawOp::Rule {
            x1_mm: MARGIN_MM,
            x2_mm: PAGE_WIDTH_MM - MARGIN_MM,
            y_mm,
        });
    }

    fn gap(&mut self, height_mm: f32) {
        self.y_mm += height_mm;
    }

    fn finish(self) -> ReportPlan {
        ReportPlan { pages: self.pages }
    }
}

/// Most body lines one cell may hold so that heading, header row and the row itself
/// still fit on a fresh page.
fn max_cell_lines(columns: &[Column]) -> usize {
    let heading = line_height_mm(HEADING_SIZE) + CELL_PADDING_MM;
    let budget = PAGE_HEIGHT_MM
        - 2.0 * MARGIN_MM
        - heading
        - row_height(&header_cells(columns))
        - 2.0 * CELL_PADDING_MM;
    (budget / line_height_mm(BODY_SIZE)).floor().max(1.0) as usize
}

/// Cuts `lines` down to `max` and marks the cut with an ellipsis that still fits `width_mm`.
fn truncate_lines(lines: &mut Vec<String>, max: usize, width_mm: f32) {
    if lines.len() <= max {
        return;
    }
    lines.truncate(max);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && measure_mm(&format!("{last}{ELLIPSIS}"), BODY_SIZE) > width_mm {
            last.pop();
        }
        last.push_str(ELLIPSIS);
    }
}

fn wrap_cells(columns: &[Column], cells: &[String]) -> Vec<Vec<String>> {
    let max_lines = max_cell_lines(columns);
    columns
        .iter()
        .zip(cells)
        .map(|(column, cell)| {
            let width = column.width_mm - 2.0 * CELL_PADDING_MM;
            let mut lines = wrap_to_width(&pdf_safe(cell), width, BODY_SIZE);
            truncate_lines(&mut lines, max_lines, width);
            lines
        })
        .collect()
}

fn row_height(wrapped: &[Vec<String>]) -> f32 {
    let lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
    lines as f32 * line_height_mm(BODY_SIZE) + 2.0 * CELL_PADDING_MM
}

fn draw_row(cursor: &mut Cursor, columns: &[Column], wrapped: &[Vec<String>], bold: bool) {
    let height = row_height(wrapped);
    let top = cursor.y_mm + CELL_PADDING_MM;
    let mut x = MARGIN_MM;
    for (column, lines) in columns.iter().zip(wrapped) {
        for (i, line) in lines.iter().enumerate() {
            let line_top = top + i as f32 * line_height_mm(BODY_SIZE);
            cursor.text_at(line, x + CELL_PADDING_MM, line_top, BODY_SIZE, bold);
        }
        x += column.width_mm;
    }
    cursor.gap(height);
    cursor.rule();
}

fn header_cells(columns: &[Column]) -> Vec<Vec<String>> {
    columns.iter().map(|c| vec![c.title.to_string()]).collect()
}

/// A titled table. The heading stays with the header row and the first body row; the
/// header row is repeated at the top of every page the table continues onto.
fn draw_table(cursor: &mut Cursor, heading: &str, columns: &[Column], rows: &[Vec<String>]) {
    let header = header_cells(columns);
    let wrapped_rows: Vec<Vec<Vec<String>>> = rows.iter().map(|r| wrap_cells(columns, r)).collect();

    let heading_height = line_height_mm(HEADING_SIZE) + CELL_PADDING_MM;
    let first_row = wrapped_rows.first().map(|r| row_height(r)).unwrap_or(0.0);
    cursor.ensure(heading_height + row_height(&header) + first_row);

    cursor.line(heading, HEADING_SIZE, true);
    cursor.gap(CELL_PADDING_MM);
    cursor.rule();
    draw_row(cursor, columns, &header, true);

    for wrapped in &wrapped_rows {
        let height = row_height(wrapped);
        if !cursor.fits(height) {
            cursor.new_page();
            cursor.rule();
            draw_row(cursor, columns, &header, true);
        }
        draw_row(cursor, columns, wrapped, false);
    }
}

/// Lays out the full report. `generated_on` is printed under the score as-is.
pub fn plan_report(result: &AnalysisResult, generated_on: &str) -> ReportPlan {
    let mut cursor = Cursor::new();

    cursor.line(REPORT_TITLE, TITLE_SIZE, true);
    cursor.gap(2.0);
    cursor.line(&format!("Match Score: {}%", result.match_score), SCORE_SIZE, false);
    cursor.line(&format!("Generated on {generated_on}"), BODY_SIZE, false);
    if let Some(model) = &result.model_used {
        cursor.line(&format!("Model: {}", pdf_safe(model)), BODY_SIZE, false);
    }
    cursor.gap(SECTION_GAP_MM / 2.0);

    cursor.line("Executive Summary", HEADING_SIZE, true);
    cursor.gap(1.0);
    for line in wrap_to_width(&pdf_safe(&result.executive_summary), CONTENT_WIDTH_MM, BODY_SIZE) {
        cursor.line(&line, BODY_SIZE, false);
    }
    cursor.gap(SECTION_GAP_MM);

    let skill_rows: Vec<Vec<String>> = result
        .skills
        .iter()
        .map(|s| {
            vec![
                s.name.clone(),
                s.required_level.to_string(),
                s.observed_level.to_string(),
                gap_cell(s),
                s.importance.as_str().to_string(),
            ]
        })
        .collect();
    draw_table(&mut cursor, "Skill Gap Matrix", &SKILL_COLUMNS, &skill_rows);
    cursor.gap(SECTION_GAP_MM);

    let pathway_rows: Vec<Vec<String>> = result
        .learning_pathway
        .iter()
        .map(|a| {
            vec![
                a.action.clone(),
                a.priority.as_str().to_string(),
                a.timeline.clone(),
                a.resource.clone(),
            ]
        })
        .collect();
    draw_table(
        &mut cursor,
        "Recommended Learning Pathway",
        &PATHWAY_COLUMNS,
        &pathway_rows,
    );

    cursor.finish()
}
