use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Lowest and highest level on the 1–5 proficiency rubric.
pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;
pub const MAX_MATCH_SCORE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importance {
    Critical,
    High,
    Medium,
    Low,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Critical => "Critical",
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// One row of the skill-gap matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub importance: Importance,
    pub required_level: u8,
    pub observed_level: u8,
    /// Always `max(required_level - observed_level, 0)` once a result has been validated.
    #[serde(deserialize_with = "deserialize_gap")]
    pub gap: u8,
    pub reasoning: String,
    pub evidence: String,
}

impl Skill {
    pub fn expected_gap(&self) -> u8 {
        self.required_level.saturating_sub(self.observed_level)
    }

    pub fn has_gap(&self) -> bool {
        self.gap > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningAction {
    pub action: String,
    pub priority: Priority,
    pub timeline: String,
    pub resource: String,
}

/// Structured output of a single gap analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub match_score: u8,
    pub executive_summary: String,
    pub skills: Vec<Skill>,
    pub learning_pathway: Vec<LearningAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResultViolation {
    #[error("matchScore {0} is outside 0-100")]
    ScoreOutOfRange(u8),

    #[error("skill '{skill}' has {field} {value}, expected 1-5")]
    LevelOutOfRange {
        skill: String,
        field: &'static str,
        value: u8,
    },
}

impl AnalysisResult {
    /// Checks the numeric ranges and recomputes every skill gap from its levels.
    ///
    /// The model is asked to compute `gap` itself, but the stored value is always derived
    /// from the levels so a stray negative or inconsistent gap never reaches the dashboard.
    pub fn validated(mut self) -> Result<Self, ResultViolation> {
        if self.match_score > MAX_MATCH_SCORE {
            return Err(ResultViolation::ScoreOutOfRange(self.match_score));
        }

        for skill in &mut self.skills {
            for (field, value) in [
                ("requiredLevel", skill.required_level),
                ("observedLevel", skill.observed_level),
            ] {
                if !(MIN_LEVEL..=MAX_LEVEL).contains(&value) {
                    return Err(ResultViolation::LevelOutOfRange {
                        skill: skill.name.clone(),
                        field,
                        value,
                    });
                }
            }
            skill.gap = skill.expected_gap();
        }

        Ok(self)
    }
}

/// Accepts any integer for `gap` (models occasionally emit negatives) and clamps it at zero.
/// The final value is recomputed in [`AnalysisResult::validated`].
fn deserialize_gap<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, u8::MAX as i64) as u8)
}

/// Dashboard colour scheme, persisted between sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

/// How much reasoning budget the model gets for an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    #[default]
    Fast,
    Deep,
}

impl AnalysisMode {
    pub fn thinking_budget(&self) -> u32 {
        match self {
            AnalysisMode::Fast => 0,
            AnalysisMode::Deep => 8192,
        }
    }

    /// Output budget must cover both the thinking tokens and the JSON body.
    pub fn max_output_tokens(&self) -> u32 {
        match self {
            AnalysisMode::Fast => 8192,
            AnalysisMode::Deep => 16384,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisMode::Fast => "Gemini 3 Flash (Standard)",
            AnalysisMode::Deep => "Gemini 3 Flash (Thinking Mode)",
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn skill(name: &str, importance: Importance, required: u8, observed: u8) -> Skill {
        Skill {
            name: name.to_string(),
            category: "Technical".to_string(),
            importance,
            required_level: required,
            observed_level: observed,
            gap: required.saturating_sub(observed),
            reasoning: format!("{name} reasoning"),
            evidence: "Not explicitly found".to_string(),
        }
    }

    pub fn action(action: &str, priority: Priority, resource: &str) -> LearningAction {
        LearningAction {
            action: action.to_string(),
            priority,
            timeline: "2 weeks".to_string(),
            resource: resource.to_string(),
        }
    }

    pub fn sample_result() -> AnalysisResult {
        AnalysisResult {
            match_score: 68,
            executive_summary: "Solid React foundation, missing TypeScript depth.".to_string(),
            skills: vec![
                skill("React", Importance::Critical, 4, 3),
                skill("TypeScript", Importance::Critical, 4, 1),
                skill("Webpack", Importance::High, 3, 2),
                skill("Communication", Importance::Medium, 3, 4),
            ],
            learning_pathway: vec![
                action(
                    "Complete the TypeScript handbook",
                    Priority::High,
                    "https://www.typescriptlang.org/docs/handbook/",
                ),
                action(
                    "Build a component library with Storybook",
                    Priority::Medium,
                    "https://storybook.js.org/tutorials/",
                ),
            ],
            model_used: Some(AnalysisMode::Fast.label().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_result_deserializes_camel_case() {
        let json = r#"{
            "matchScore": 72,
            "executiveSummary": "Good fit",
            "skills": [{
                "name": "Rust",
                "category": "Technical",
                "importance": "Critical",
                "requiredLevel": 4,
                "observedLevel": 2,
                "gap": 2,
                "reasoning": "Two side projects",
                "evidence": "Built a CLI in Rust"
            }],
            "learningPathway": [{
                "action": "Read the Rust book",
                "priority": "High",
                "timeline": "1 month",
                "resource": "https://doc.rust-lang.org/book/"
            }]
        }"#;

        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.match_score, 72);
        assert_eq!(result.skills[0].importance, Importance::Critical);
        assert_eq!(result.learning_pathway[0].priority, Priority::High);
        assert!(result.model_used.is_none());
    }

    #[test]
    fn test_missing_required_field_fails_to_parse() {
        let json = r#"{"matchScore": 50, "executiveSummary": "x", "skills": []}"#;
        assert!(serde_json::from_str::<AnalysisResult>(json).is_err());
    }

    #[test]
    fn test_validated_recomputes_gap_from_levels() {
        let mut result = sample_result();
        result.skills[0].gap = 3; // model arithmetic error
        result.skills[3].gap = 1; // observed exceeds required

        let result = result.validated().unwrap();
        for skill in &result.skills {
            assert_eq!(
                skill.gap,
                skill.required_level.saturating_sub(skill.observed_level)
            );
        }
        assert_eq!(result.skills[0].gap, 1);
        assert_eq!(result.skills[3].gap, 0);
    }

    #[test]
    fn test_negative_gap_is_clamped_on_parse() {
        let json = r#"{
            "name": "SQL", "category": "Technical", "importance": "Low",
            "requiredLevel": 2, "observedLevel": 4, "gap": -2,
            "reasoning": "r", "evidence": "e"
        }"#;
        let skill: Skill = serde_json::from_str(json).unwrap();
        assert_eq!(skill.gap, 0);
    }

    #[test]
    fn test_score_above_100_is_rejected() {
        let mut result = sample_result();
        result.match_score = 101;
        assert_eq!(
            result.validated(),
            Err(ResultViolation::ScoreOutOfRange(101))
        );
    }

    #[test]
    fn test_level_outside_rubric_is_rejected() {
        let mut result = sample_result();
        result.skills[1].observed_level = 0;
        let err = result.validated().unwrap_err();
        assert!(err.to_string().contains("TypeScript"));
        assert!(err.to_string().contains("observedLevel"));

        let mut result = sample_result();
        result.skills[0].required_level = 6;
        assert!(result.validated().is_err());
    }

    #[test]
    fn test_persisted_form_round_trips() {
        let result = sample_result();
        let text = serde_json::to_string(&result).unwrap();
        let restored: AnalysisResult = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, result);
    }

    #[test]
    fn test_model_used_omitted_when_absent() {
        let mut result = sample_result();
        result.model_used = None;
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("modelUsed").is_none());
    }

    #[test]
    fn test_theme_toggle_and_parse() {
        assert_eq!(Theme::default(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
        assert_eq!(serde_json::to_string(&Theme::Light).unwrap(), "\"light\"");
    }

    #[test]
    fn test_deep_mode_allocates_thinking_budget() {
        assert_eq!(AnalysisMode::Fast.thinking_budget(), 0);
        assert_eq!(AnalysisMode::Deep.thinking_budget(), 8192);
        assert!(AnalysisMode::Deep.max_output_tokens() > AnalysisMode::Fast.max_output_tokens());
        assert!(AnalysisMode::Deep.label().contains("Thinking"));
    }
}
