mod config;
mod policy;
mod rules;

pub use config::ScoringWeights;
pub use policy::{Confidence, Eligibility};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::{CriteriaMatcher, Dimension};
use policy::{classify, explain};

/// Stateless scorer that applies the weight table to every program.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: ScoringWeights,
    matcher: CriteriaMatcher,
}

impl ScoringEngine {
    pub fn new(weights: ScoringWeights) -> Self {
        Self {
            weights,
            matcher: CriteriaMatcher::new(),
        }
    }

    pub fn with_matcher(weights: ScoringWeights, matcher: CriteriaMatcher) -> Self {
        Self { weights, matcher }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, answers: &UserAnswers, program: &Program) -> EnhancedProgramResult {
        let tally = rules::score_program(program, answers, &self.weights, &self.matcher);
        let score = tally.points.min(100) as u8;
        let (eligibility, confidence) = classify(score);

        EnhancedProgramResult {
            program: program.clone(),
            score,
            reason: explain(&tally.matched),
            matched_criteria: tally.matched,
            gaps: tally.gaps,
            eligibility,
            confidence,
        }
    }

    /// Scores and orders programs, best first; equal scores keep catalog order.
    pub fn score_programs(&self, answers: &UserAnswers, programs: &[Program]) -> Vec<EnhancedProgramResult> {
        let mut results: Vec<EnhancedProgramResult> = programs
            .iter()
            .map(|program| self.score(answers, program))
            .collect();
        results.sort_by(|left, right| right.score.cmp(&left.score));

        debug!(
            programs = results.len(),
            eligible = results.iter().filter(|result| result.eligibility == Eligibility::Eligible).count(),
            "scored programs"
        );
        results
    }
}

/// Scores `programs` with the default weight table.
pub fn score_programs(answers: &UserAnswers, programs: &[Program]) -> Vec<EnhancedProgramResult> {
    ScoringEngine::default().score_programs(answers, programs)
}

/// Criterion that earned points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedCriterion {
    pub key: Dimension,
    pub points: u32,
    pub reason: String,
}

/// Answered criterion the program does not satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub key: Dimension,
    pub description: String,
}

/// Ranked, explained recommendation for one program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedProgramResult {
    pub program: Program,
    pub score: u8,
    pub matched_criteria: Vec<MatchedCriterion>,
    pub gaps: Vec<Gap>,
    pub eligibility: Eligibility,
    pub confidence: Confidence,
    pub reason: String,
}
