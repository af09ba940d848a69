pub mod analysis;
pub mod resume;

pub use analysis::{
    AnalysisMode, AnalysisResult, Importance, LearningAction, Priority, Skill, Theme,
};
pub use resume::{AnalysisRequest, ResumePayload};
