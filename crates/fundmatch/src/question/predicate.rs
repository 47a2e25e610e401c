use serde::{Deserialize, Serialize};

use crate::answers::{AnswerValue, UserAnswers};

/// Condition over earlier answers. A predicate about an unanswered question is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    Equals { question: String, value: String },
    NotEquals { question: String, value: String },
    Contains { question: String, value: String },
    In { question: String, values: Vec<String> },
    NotIn { question: String, values: Vec<String> },
    GreaterThan { question: String, value: f64 },
    LessThan { question: String, value: f64 },
    Answered { question: String },
    Not { predicate: Box<Predicate> },
    And { all: Vec<Predicate> },
    Or { any: Vec<Predicate> },
}

impl Predicate {
    pub fn equals(question: &str, value: &str) -> Self {
        Predicate::Equals {
            question: question.to_string(),
            value: value.to_string(),
        }
    }

    pub fn contains(question: &str, value: &str) -> Self {
        Predicate::Contains {
            question: question.to_string(),
            value: value.to_string(),
        }
    }

    pub fn one_of(question: &str, values: &[&str]) -> Self {
        Predicate::In {
            question: question.to_string(),
            values: values.iter().map(|value| value.to_string()).collect(),
        }
    }

    pub fn negate(self) -> Self {
        Predicate::Not {
            predicate: Box::new(self),
        }
    }

    pub fn evaluate(&self, answers: &UserAnswers) -> bool {
        match self {
            Predicate::Equals { question, value } => {
                with_answer(answers, question, |answer| selections(answer).iter().any(|item| same(item, value)))
            }
            Predicate::NotEquals { question, value } => {
                with_answer(answers, question, |answer| !selections(answer).iter().any(|item| same(item, value)))
            }
            Predicate::Contains { question, value } => {
                let needle = value.trim().to_lowercase();
                with_answer(answers, question, |answer| {
                    selections(answer).iter().any(|item| item.contains(&needle))
                })
            }
            Predicate::In { question, values } => with_answer(answers, question, |answer| {
                selections(answer)
                    .iter()
                    .any(|item| values.iter().any(|value| same(item, value)))
            }),
            Predicate::NotIn { question, values } => with_answer(answers, question, |answer| {
                !selections(answer)
                    .iter()
                    .any(|item| values.iter().any(|value| same(item, value)))
            }),
            Predicate::GreaterThan { question, value } => {
                with_answer(answers, question, |answer| answer.as_number().is_some_and(|number| number > *value))
            }
            Predicate::LessThan { question, value } => {
                with_answer(answers, question, |answer| answer.as_number().is_some_and(|number| number < *value))
            }
            Predicate::Answered { question } => answers.is_answered(question),
            Predicate::Not { predicate } => !predicate.evaluate(answers),
            Predicate::And { all } => all.iter().all(|predicate| predicate.evaluate(answers)),
            Predicate::Or { any } => any.iter().any(|predicate| predicate.evaluate(answers)),
        }
    }
}

fn with_answer(answers: &UserAnswers, question: &str, check: impl FnOnce(&AnswerValue) -> bool) -> bool {
    answers.get(question).is_some_and(check)
}

fn selections(answer: &AnswerValue) -> Vec<String> {
    answer
        .selections()
        .iter()
        .map(|item| item.trim().to_lowercase())
        .collect()
}

fn same(normalized: &str, expected: &str) -> bool {
    normalized == expected.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    Show,
    Hide,
    Require,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub action: RuleAction,
    pub when: Predicate,
}

impl ConditionalRule {
    pub fn new(action: RuleAction, when: Predicate) -> Self {
        Self { action, when }
    }
}

/// How a question should be presented once its rules are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub visible: bool,
    pub required: bool,
}

/// Questions with `Show` rules stay hidden until one fires; any firing `Hide` wins.
pub fn resolve_rules(rules: &[ConditionalRule], base_required: bool, answers: &UserAnswers) -> Presentation {
    let fired = |action: RuleAction| {
        rules
            .iter()
            .filter(|rule| rule.action == action)
            .any(|rule| rule.when.evaluate(answers))
    };
    let has_show = rules.iter().any(|rule| rule.action == RuleAction::Show);

    let visible = (!has_show || fired(RuleAction::Show)) && !fired(RuleAction::Hide);
    let required = if fired(RuleAction::Require) {
        true
    } else if fired(RuleAction::Optional) {
        false
    } else {
        base_required
    };

    Presentation { visible, required }
}
