//! Dashboard state machine.
//!
//! All session state lives in one serializable `DashboardState`. The only way to change
//! it is `reduce(state, event)`, a pure function; side effects (provider calls,
//! persistence) happen in the handlers around it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ingest::sample::{sample_resume_payload, SAMPLE_JOB_DESCRIPTION, SAMPLE_RESUME_FILE_NAME};
use crate::models::{AnalysisRequest, AnalysisResult, ResumePayload, Theme};

/// What the user has entered but not yet submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDraft {
    pub job_description: String,
    pub resume: Option<ResumePayload>,
    pub resume_file_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub input: InputDraft,
    pub result: Option<AnalysisResult>,
    pub loading: bool,
    pub last_error: Option<String>,
    pub theme: Theme,
    pub search: String,
    pub focused_skill: Option<String>,
    /// Learning actions marked done, keyed by action text. Never persisted.
    pub completed_actions: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    JobDescriptionChanged(String),
    ResumeLoaded {
        file_name: String,
        payload: ResumePayload,
    },
    SampleLoaded,
    AnalyzeRequested,
    AnalyzeSucceeded(AnalysisResult),
    AnalyzeFailed(String),
    Reset,
    ThemeToggled,
    ThemeReset,
    SearchChanged(String),
    SkillFocused(String),
    ActionToggled(String),
    Restored {
        result: Option<AnalysisResult>,
        theme: Option<Theme>,
    },
}

impl DashboardState {
    /// True when an analysis may be started: nothing outstanding, a non-blank job
    /// description and a loaded résumé.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.input.job_description.trim().is_empty() && self.input.resume.is_some()
    }

    /// The request the current draft would submit, if it is submittable.
    pub fn pending_request(&self) -> Option<AnalysisRequest> {
        if !self.can_submit() {
            return None;
        }
        Some(AnalysisRequest {
            job_description: self.input.job_description.clone(),
            resume: self.input.resume.clone()?,
        })
    }

    fn clear_view(&mut self) {
        self.search.clear();
        self.focused_skill = None;
        self.completed_actions.clear();
    }
}

pub fn reduce(mut state: DashboardState, event: DashboardEvent) -> DashboardState {
    match event {
        DashboardEvent::JobDescriptionChanged(text) => {
            state.input.job_description = text;
        }
        DashboardEvent::ResumeLoaded { file_name, payload } => {
            state.input.resume = Some(payload);
            state.input.resume_file_name = Some(file_name);
        }
        DashboardEvent::SampleLoaded => {
            state.input.job_description = SAMPLE_JOB_DESCRIPTION.to_string();
            state.input.resume = Some(sample_resume_payload());
            state.input.resume_file_name = Some(SAMPLE_RESUME_FILE_NAME.to_string());
        }
        DashboardEvent::AnalyzeRequested => {
            if state.can_submit() {
                state.loading = true;
                state.last_error = None;
            }
        }
        DashboardEvent::AnalyzeSucceeded(result) => {
            state.result = Some(result);
            state.loading = false;
            state.last_error = None;
            state.clear_view();
        }
        DashboardEvent::AnalyzeFailed(message) => {
            state.loading = false;
            state.last_error = Some(message);
        }
        DashboardEvent::Reset => {
            state.result = None;
            state.input = InputDraft::default();
            state.last_error = None;
            state.clear_view();
        }
        DashboardEvent::ThemeToggled => {
            state.theme = state.theme.toggled();
        }
        DashboardEvent::ThemeReset => {
            state.theme = Theme::default();
        }
        DashboardEvent::SearchChanged(query) => {
            state.search = query;
        }
        DashboardEvent::SkillFocused(name) => {
            state.focused_skill = Some(name);
        }
        DashboardEvent::ActionToggled(action) => {
            if !state.completed_actions.remove(&action) {
                state.completed_actions.insert(action);
            }
        }
        DashboardEvent::Restored { result, theme } => {
            if result.is_some() {
                state.result = result;
            }
            if let Some(theme) = theme {
                state.theme = theme;
            }
        }
    }
    state
}
