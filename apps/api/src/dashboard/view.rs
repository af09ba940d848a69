//! Pure presentation mapping from `DashboardState` to the dashboard view model.
//!
//! Nothing here mutates the analysis data; every function borrows the result and
//! derives what a screen needs (filtered lists, focused skill, radar series, score band).

use serde::Serialize;

use crate::dashboard::reducer::DashboardState;
use crate::models::{AnalysisResult, Importance, LearningAction, Priority, Skill, Theme};

/// At most this many skills are plotted, otherwise the radar becomes unreadable.
pub const RADAR_MAX_SKILLS: usize = 7;
pub const RADAR_FULL_MARK: u8 = 5;

// ────────────────────────────────────────────────────────────────────────────
// View models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    pub fn for_score(score: u8) -> Self {
        if score >= 80 {
            ScoreBand::Strong
        } else if score >= 60 {
            ScoreBand::Moderate
        } else {
            ScoreBand::Weak
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarPoint {
    pub subject: String,
    pub required: u8,
    pub observed: u8,
    pub full_mark: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRow {
    #[serde(flatten)]
    pub skill: Skill,
    pub gap_label: String,
    pub coverage_percent: u8,
    pub critical: bool,
    pub focused: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    #[serde(flatten)]
    pub action: LearningAction,
    pub high_priority: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    pub match_score: u8,
    pub score_band: ScoreBand,
    pub executive_summary: String,
    pub model_used: Option<String>,
    pub search: String,
    pub radar: Vec<RadarPoint>,
    pub skills: Vec<SkillRow>,
    pub focused_skill: Option<Skill>,
    pub learning_pathway: Vec<TimelineEntry>,
    pub completed_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputSummary {
    pub job_description: String,
    pub resume_file_name: Option<String>,
    pub resume_mime_type: Option<String>,
    pub resume_is_base64: bool,
    pub can_submit: bool,
}

impl From<&DashboardState> for InputSummary {
    fn from(state: &DashboardState) -> Self {
        let resume = state.input.resume.as_ref();
        Self {
            job_description: state.input.job_description.clone(),
            resume_file_name: state.input.resume_file_name.clone(),
            resume_mime_type: resume.map(|r| r.mime_type.clone()),
            resume_is_base64: resume.is_some_and(|r| r.is_base64),
            can_submit: state.can_submit(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub theme: Theme,
    pub loading: bool,
    pub last_error: Option<String>,
    pub input: InputSummary,
    pub analysis: Option<AnalysisView>,
}

// ────────────────────────────────────────────────────────────────────────────
// Filtering and focus
// ────────────────────────────────────────────────────────────────────────────

/// The subset of a result matching a search query, in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'a> {
    pub skills: Vec<&'a Skill>,
    pub learning_pathway: Vec<&'a LearningAction>,
}

/// Case-insensitive substring search over skill name/category and action text/resource.
/// A blank query matches everything.
pub fn filter_result<'a>(result: &'a AnalysisResult, query: &str) -> FilteredView<'a> {
    let needle = query.trim().to_lowercase();
    let matches = |field: &str| needle.is_empty() || field.to_lowercase().contains(&needle);

    FilteredView {
        skills: result
            .skills
            .iter()
            .filter(|s| matches(&s.name) || matches(&s.category))
            .collect(),
        learning_pathway: result
            .learning_pathway
            .iter()
            .filter(|a| matches(&a.action) || matches(&a.resource))
            .collect(),
    }
}

/// The selected skill if it survived filtering, else the first filtered skill.
pub fn resolve_focus<'a>(skills: &[&'a Skill], selected: Option<&str>) -> Option<&'a Skill> {
    selected
        .and_then(|name| skills.iter().copied().find(|s| s.name == name))
        .or_else(|| skills.first().copied())
}

// ────────────────────────────────────────────────────────────────────────────
// Derived display values
// ────────────────────────────────────────────────────────────────────────────

pub fn gap_label(skill: &Skill) -> String {
    if skill.has_gap() {
        format!("Gap Level: {}", skill.gap)
    } else {
        "Match / Exceeds".to_string()
    }
}

/// Observed as a share of required, capped at 100.
pub fn coverage_percent(skill: &Skill) -> u8 {
    if skill.required_level == 0 {
        return 100;
    }
    let pct = skill.observed_level as u32 * 100 / skill.required_level as u32;
    pct.min(100) as u8
}

/// Critical and High skills only, first `RADAR_MAX_SKILLS` in result order.
pub fn radar_series(skills: &[Skill]) -> Vec<RadarPoint> {
    skills
        .iter()
        .filter(|s| matches!(s.importance, Importance::Critical | Importance::High))
        .take(RADAR_MAX_SKILLS)
        .map(|s| RadarPoint {
            subject: s.name.clone(),
            required: s.required_level,
            observed: s.observed_level,
            full_mark: RADAR_FULL_MARK,
        })
        .collect()
}

fn analysis_view(state: &DashboardState, result: &AnalysisResult, query: &str) -> AnalysisView {
    let filtered = filter_result(result, query);
    let focused = resolve_focus(&filtered.skills, state.focused_skill.as_deref());

    let skills = filtered
        .skills
        .iter()
        .map(|s| SkillRow {
            skill: (*s).clone(),
            gap_label: gap_label(s),
            coverage_percent: coverage_percent(s),
            critical: s.importance == Importance::Critical,
            focused: focused.is_some_and(|f| f.name == s.name),
        })
        .collect();

    let learning_pathway = filtered
        .learning_pathway
        .iter()
        .map(|a| TimelineEntry {
            action: (*a).clone(),
            high_priority: a.priority == Priority::High,
            completed: state.completed_actions.contains(&a.action),
        })
        .collect();

    let completed_count = result
        .learning_pathway
        .iter()
        .filter(|a| state.completed_actions.contains(&a.action))
        .count();

    AnalysisView {
        match_score: result.match_score,
        score_band: ScoreBand::for_score(result.match_score),
        executive_summary: result.executive_summary.clone(),
        model_used: result.model_used.clone(),
        search: query.to_string(),
        radar: radar_series(&result.skills),
        skills,
        focused_skill: focused.cloned(),
        learning_pathway,
        completed_count,
    }
}

/// Builds the full dashboard view. `query_override` replaces the stored search for this
/// read only.
pub fn build_view(state: &DashboardState, query_override: Option<&str>) -> DashboardView {
    let query = query_override.unwrap_or(&state.search);

    DashboardView {
        theme: state.theme,
        loading: state.loading,
        last_error: state.last_error.clone(),
        input: InputSummary::from(state),
        analysis: state
            .result
            .as_ref()
            .map(|result| analysis_view(state, result, query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::fixtures::{sample_result, skill};

    #[test]
    fn test_search_rea_includes_react() {
        let result = sample_result();
        let filtered = filter_result(&result, "rea");
        assert!(filtered.skills.iter().any(|s| s.name == "React"));
    }

    #[test]
    fn test_search_is_case_insensitive_and_trimmed() {
        let result = sample_result();
        let filtered = filter_result(&result, "  TYPESCRIPT ");
        assert_eq!(filtered.skills.len(), 1);
        assert_eq!(filtered.skills[0].name, "TypeScript");
        // The handbook action mentions TypeScript too.
        assert_eq!(filtered.learning_pathway.len(), 1);
    }

    #[test]
    fn test_search_matches_category_and_resource() {
        let result = sample_result();
        assert_eq!(filter_result(&result, "technical").skills.len(), 4);
        let by_resource = filter_result(&result, "storybook.js.org");
        assert_eq!(by_resource.learning_pathway.len(), 1);
        assert!(by_resource.skills.is_empty());
    }

    #[test]
    fn test_blank_query_keeps_everything_in_order() {
        let result = sample_result();
        let filtered = filter_result(&result, "");
        let names: Vec<_> = filtered.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["React", "TypeScript", "Webpack", "Communication"]);
        assert_eq!(filtered.learning_pathway.len(), 2);
    }

    #[test]
    fn test_no_match_gives_empty_set_and_no_focus() {
        let result = sample_result();
        let filtered = filter_result(&result, "cobol");
        assert!(filtered.skills.is_empty());
        assert!(filtered.learning_pathway.is_empty());
        assert!(resolve_focus(&filtered.skills, Some("React")).is_none());
    }

    #[test]
    fn test_focus_keeps_selection_when_present() {
        let result = sample_result();
        let filtered = filter_result(&result, "");
        let focus = resolve_focus(&filtered.skills, Some("Webpack")).unwrap();
        assert_eq!(focus.name, "Webpack");
    }

    #[test]
    fn test_focus_falls_back_to_first_filtered() {
        let result = sample_result();
        let filtered = filter_result(&result, "script");
        let focus = resolve_focus(&filtered.skills, Some("React")).unwrap();
        assert_eq!(focus.name, "TypeScript");
        assert_eq!(resolve_focus(&filtered.skills, None).unwrap().name, "TypeScript");
    }

    #[test]
    fn test_score_bands() {
        assert_eq!(ScoreBand::for_score(100), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_score(80), ScoreBand::Strong);
        assert_eq!(ScoreBand::for_score(79), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(60), ScoreBand::Moderate);
        assert_eq!(ScoreBand::for_score(59), ScoreBand::Weak);
        assert_eq!(ScoreBand::for_score(0), ScoreBand::Weak);
    }

    #[test]
    fn test_radar_keeps_critical_and_high_capped_at_seven() {
        let mut skills: Vec<Skill> = (0..9)
            .map(|i| skill(&format!("S{i}"), Importance::High, 4, 2))
            .collect();
        skills.insert(0, skill("Soft", Importance::Low, 2, 2));
        let radar = radar_series(&skills);
        assert_eq!(radar.len(), RADAR_MAX_SKILLS);
        assert_eq!(radar[0].subject, "S0");
        assert!(radar.iter().all(|p| p.full_mark == 5));

        let sample = radar_series(&sample_result().skills);
        let subjects: Vec<_> = sample.iter().map(|p| p.subject.as_str()).collect();
        assert_eq!(subjects, vec!["React", "TypeScript", "Webpack"]);
    }

    #[test]
    fn test_gap_label_and_coverage() {
        let gap = skill("Go", Importance::High, 4, 1);
        assert_eq!(gap_label(&gap), "Gap Level: 3");
        assert_eq!(coverage_percent(&gap), 25);

        let exceeds = skill("SQL", Importance::Low, 2, 5);
        assert_eq!(gap_label(&exceeds), "Match / Exceeds");
        assert_eq!(coverage_percent(&exceeds), 100);
    }

    #[test]
    fn test_build_view_without_result() {
        let view = build_view(&DashboardState::default(), None);
        assert!(view.analysis.is_none());
        assert!(!view.input.can_submit);
        assert_eq!(view.theme, Theme::Dark);
    }

    #[test]
    fn test_build_view_marks_focus_and_completion() {
        let mut state = DashboardState {
            result: Some(sample_result()),
            ..Default::default()
        };
        state.focused_skill = Some("Webpack".to_string());
        state
            .completed_actions
            .insert("Complete the TypeScript handbook".to_string());

        let analysis = build_view(&state, None).analysis.unwrap();
        assert_eq!(analysis.score_band, ScoreBand::Moderate);
        assert_eq!(analysis.focused_skill.as_ref().unwrap().name, "Webpack");
        assert_eq!(analysis.skills.iter().filter(|r| r.focused).count(), 1);
        assert!(analysis.skills[0].critical);
        assert!(analysis.learning_pathway[0].completed);
        assert!(analysis.learning_pathway[0].high_priority);
        assert!(!analysis.learning_pathway[1].completed);
        assert_eq!(analysis.completed_count, 1);
    }

    #[test]
    fn test_query_override_does_not_touch_state() {
        let state = DashboardState {
            result: Some(sample_result()),
            search: "react".to_string(),
            ..Default::default()
        };
        let view = build_view(&state, Some("zzz"));
        let analysis = view.analysis.unwrap();
        assert!(analysis.skills.is_empty());
        assert!(analysis.focused_skill.is_none());
        assert_eq!(analysis.search, "zzz");
        assert_eq!(state.search, "react");
    }

    #[test]
    fn test_skill_row_flattens_skill_fields() {
        let state = DashboardState {
            result: Some(sample_result()),
            ..Default::default()
        };
        let value = serde_json::to_value(build_view(&state, None)).unwrap();
        let row = &value["analysis"]["skills"][1];
        assert_eq!(row["name"], "TypeScript");
        assert_eq!(row["requiredLevel"], 4);
        assert_eq!(row["gapLabel"], "Gap Level: 3");
        assert_eq!(value["analysis"]["scoreBand"], "moderate");
    }
}
