use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Answer given to a single question. Multi-select questions produce `List`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl AnswerValue {
    /// Individual selections as text; blank entries are dropped.
    pub fn selections(&self) -> Vec<Cow<'_, str>> {
        let values: Vec<Cow<'_, str>> = match self {
            AnswerValue::Flag(true) => vec![Cow::Borrowed("yes")],
            AnswerValue::Flag(false) => vec![Cow::Borrowed("no")],
            AnswerValue::Number(number) => vec![Cow::Owned(number.to_string())],
            AnswerValue::Text(text) => vec![Cow::Borrowed(text.as_str())],
            AnswerValue::List(items) => items.iter().map(|item| Cow::Borrowed(item.as_str())).collect(),
        };

        values
            .into_iter()
            .filter(|value| !value.trim().is_empty())
            .collect()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AnswerValue::Number(number) => Some(*number),
            AnswerValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selections().is_empty()
    }
}

impl From<&str> for AnswerValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AnswerValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for AnswerValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Answers collected in one session, keyed by question id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserAnswers(BTreeMap<String, AnswerValue>);

impl UserAnswers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.insert(question_id, value);
        self
    }

    pub fn insert(&mut self, question_id: impl Into<String>, value: impl Into<AnswerValue>) {
        self.0.insert(question_id.into(), value.into());
    }

    /// Returns the answer only when it carries at least one non-blank selection.
    pub fn get(&self, question_id: &str) -> Option<&AnswerValue> {
        self.0.get(question_id).filter(|value| !value.is_empty())
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.get(question_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for UserAnswers
where
    K: Into<String>,
    V: Into<AnswerValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut answers = Self::new();
        for (key, value) in iter {
            answers.insert(key, value);
        }
        answers
    }
}
