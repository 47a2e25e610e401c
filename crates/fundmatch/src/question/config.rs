use serde::{Deserialize, Serialize};

/// Limits that shape a questionnaire session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionConfig {
    /// Safety cap on answered questions before the engine stops asking.
    pub max_questions: usize,
    pub core_questions: usize,
    pub overlay_questions: usize,
    /// Overlay questions are only asked while at least this many candidates reference them.
    pub overlay_min_programs: usize,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            max_questions: 12,
            core_questions: 7,
            overlay_questions: 3,
            overlay_min_programs: 2,
        }
    }
}
