use serde::{Deserialize, Serialize};

use super::MatchedCriterion;

pub(crate) const ELIGIBILITY_THRESHOLD: u8 = 50;
pub(crate) const HIGH_CONFIDENCE_THRESHOLD: u8 = 80;
const REASON_LIMIT: usize = 3;
const FALLBACK_REASON: &str = "Program relevance could not be determined.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eligibility {
    Eligible,
    NotEligible,
}

impl Eligibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Eligibility::Eligible => "Eligible",
            Eligibility::NotEligible => "NotEligible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

pub(crate) fn classify(score: u8) -> (Eligibility, Confidence) {
    let eligibility = if score >= ELIGIBILITY_THRESHOLD {
        Eligibility::Eligible
    } else {
        Eligibility::NotEligible
    };

    let confidence = if score >= HIGH_CONFIDENCE_THRESHOLD {
        Confidence::High
    } else if score >= ELIGIBILITY_THRESHOLD {
        Confidence::Medium
    } else {
        Confidence::Low
    };

    (eligibility, confidence)
}

pub(crate) fn explain(matched: &[MatchedCriterion]) -> String {
    if matched.is_empty() {
        return FALLBACK_REASON.to_string();
    }

    matched
        .iter()
        .take(REASON_LIMIT)
        .map(|criterion| criterion.reason.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
