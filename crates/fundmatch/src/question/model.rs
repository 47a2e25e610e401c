use serde::{Deserialize, Serialize};

use super::predicate::ConditionalRule;
use crate::catalog::{Decisiveness, RequirementCategory};
use crate::criteria::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    SingleSelect,
    MultiSelect,
    Number,
    Text,
    Boolean,
}

impl QuestionType {
    /// Free-form inputs are exempt from the two-option minimum.
    pub fn needs_options(self) -> bool {
        matches!(self, QuestionType::SingleSelect | QuestionType::MultiSelect)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub value: String,
    pub label: String,
}

impl QuestionOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Ranking figures computed against the candidate set the question was generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    pub programs_affected: usize,
    pub information_value: u32,
    pub decisiveness: Option<Decisiveness>,
    pub ux_weight: u32,
    pub rank_score: u32,
    pub core: bool,
    pub ranking_version: u32,
}

/// Question offered to the applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomQuestion {
    pub id: String,
    pub dimension: Dimension,
    pub prompt: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub options: Vec<QuestionOption>,
    pub required: bool,
    pub category: RequirementCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ConditionalRule>,
    pub metadata: QuestionMetadata,
}

impl SymptomQuestion {
    /// At least two distinct option values, unless the input is free-form.
    pub fn is_answerable(&self) -> bool {
        if !self.question_type.needs_options() {
            return true;
        }

        let mut values: Vec<&str> = self.options.iter().map(|option| option.value.as_str()).collect();
        values.sort_unstable();
        values.dedup();
        values.len() >= 2
    }
}
