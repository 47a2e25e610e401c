//! Adaptive questionnaire that narrows the program catalog one answer at a time.
//!
//! Every decision ranks the unanswered dimensions by how strongly the remaining candidates
//! depend on them, then offers the best visible question. Core questions come first; a few
//! overlay questions follow while enough candidates still reference them.

mod bootstrap;
mod config;
mod filter;
mod model;
mod predicate;
mod ranking;

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

pub use config::QuestionConfig;
pub use filter::apply_filters;
pub use model::{QuestionMetadata, QuestionOption, QuestionType, SymptomQuestion};
pub use predicate::{resolve_rules, ConditionalRule, Predicate, Presentation, RuleAction};
pub use ranking::{rank_dimensions, DimensionStats, RANKING_VERSION};

use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::{CriteriaMatcher, Dimension};

/// Why the engine stopped asking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalReason {
    NoQuestions,
    QuestionCap,
    NoCandidates,
}

/// Observable engine state between calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EngineState {
    Idle,
    QuestionPending { question_id: String },
    Terminal { reason: TerminalReason },
}

impl EngineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Terminal { .. })
    }
}

/// Outcome of one decision: the question to ask and the candidates it was chosen for.
#[derive(Debug, Clone, Serialize)]
pub struct NextQuestionResult<'a> {
    pub question: Option<SymptomQuestion>,
    pub remaining: Vec<&'a Program>,
    pub state: EngineState,
}

/// Per-session questionnaire over a shared, read-only catalog.
pub struct QuestionEngine {
    catalog: Arc<[Program]>,
    config: QuestionConfig,
    matcher: CriteriaMatcher,
    core: Vec<Dimension>,
    remaining: Vec<usize>,
    state: EngineState,
}

impl QuestionEngine {
    pub fn new(catalog: Arc<[Program]>, config: QuestionConfig) -> Self {
        Self::with_matcher(catalog, config, CriteriaMatcher::new())
    }

    pub fn with_matcher(catalog: Arc<[Program]>, config: QuestionConfig, matcher: CriteriaMatcher) -> Self {
        let mut engine = Self {
            remaining: (0..catalog.len()).collect(),
            catalog,
            config,
            matcher,
            core: Vec::new(),
            state: EngineState::Idle,
        };
        engine.core = engine.select_core();

        debug!(
            programs = engine.catalog.len(),
            core = ?engine.core,
            ranking_version = RANKING_VERSION,
            "question engine ready"
        );
        engine
    }

    pub fn config(&self) -> &QuestionConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Dimensions asked as core questions, best first.
    pub fn core_dimensions(&self) -> &[Dimension] {
        &self.core
    }

    /// Every answerable question some program references, ranked against the full catalog.
    /// Visibility rules are ignored.
    pub fn get_all_questions(&self) -> Vec<SymptomQuestion> {
        let candidates = self.catalog_refs();
        let empty = UserAnswers::new();
        rank_dimensions(&self.matcher, &empty, &candidates)
            .iter()
            .map(|stats| self.build_question(stats, &candidates, &empty).0)
            .filter(SymptomQuestion::is_answerable)
            .collect()
    }

    pub fn get_core_questions(&self) -> Vec<SymptomQuestion> {
        let candidates = self.catalog_refs();
        let empty = UserAnswers::new();
        self.core
            .iter()
            .map(|dimension| DimensionStats::collect(&self.matcher, *dimension, &candidates))
            .map(|stats| self.build_question(&stats, &candidates, &empty).0)
            .collect()
    }

    /// Narrows the session's candidates with `answers` and picks the next question.
    pub fn get_next_question(&mut self, answers: &UserAnswers) -> Option<SymptomQuestion> {
        let catalog = Arc::clone(&self.catalog);
        let before = self.remaining.len();
        self.remaining
            .retain(|index| self.matcher.admits(answers, &catalog[*index]));
        debug!(before, after = self.remaining.len(), "filter applied");

        let candidates: Vec<&Program> = self.remaining.iter().map(|index| &catalog[*index]).collect();
        let (question, state) = self.decide(answers, &candidates);
        debug!(from = ?self.state, to = ?state, "question engine transition");
        self.state = state;
        question
    }

    /// Pure variant: all state is passed in and handed back in the result.
    pub fn next_question<'a>(&self, answers: &UserAnswers, candidates: &[&'a Program]) -> NextQuestionResult<'a> {
        let remaining = apply_filters(&self.matcher, answers, candidates);
        let (question, state) = self.decide(answers, &remaining);
        NextQuestionResult {
            question,
            remaining,
            state,
        }
    }

    pub fn get_remaining_program_count(&self) -> usize {
        self.remaining.len()
    }

    pub fn get_remaining_programs(&self) -> Vec<&Program> {
        self.remaining.iter().map(|index| &self.catalog[*index]).collect()
    }

    /// Candidates for `answers`, recomputed from the full catalog without touching session state.
    pub fn get_filtered_programs_for_answers(&self, answers: &UserAnswers) -> Vec<&Program> {
        apply_filters(&self.matcher, answers, &self.catalog_refs())
    }

    /// Starts a new session over the full catalog.
    pub fn reset(&mut self) {
        self.remaining = (0..self.catalog.len()).collect();
        self.state = EngineState::Idle;
    }

    fn catalog_refs(&self) -> Vec<&Program> {
        self.catalog.iter().collect()
    }

    fn select_core(&self) -> Vec<Dimension> {
        let candidates = self.catalog_refs();
        let empty = UserAnswers::new();
        rank_dimensions(&self.matcher, &empty, &candidates)
            .iter()
            .filter(|stats| self.build_question(stats, &candidates, &empty).0.is_answerable())
            .map(|stats| stats.dimension)
            .take(self.config.core_questions)
            .collect()
    }

    fn decide(&self, answers: &UserAnswers, candidates: &[&Program]) -> (Option<SymptomQuestion>, EngineState) {
        if candidates.is_empty() {
            return terminal(TerminalReason::NoCandidates);
        }

        let answered: Vec<Dimension> = Dimension::ALL
            .into_iter()
            .filter(|dimension| answers.is_answered(dimension.question_id()))
            .collect();
        if answered.len() >= self.config.max_questions {
            return terminal(TerminalReason::QuestionCap);
        }

        let questions: Vec<SymptomQuestion> = rank_dimensions(&self.matcher, answers, candidates)
            .iter()
            .filter_map(|stats| {
                let (question, presentation) = self.build_question(stats, candidates, answers);
                if !question.is_answerable() {
                    debug!(question = %question.id, "dropping question with fewer than two options");
                    return None;
                }
                presentation.visible.then_some(question)
            })
            .collect();

        let overlay_answered = answered
            .iter()
            .filter(|dimension| !self.core.contains(dimension))
            .count();

        let next = questions
            .iter()
            .find(|question| question.metadata.core)
            .or_else(|| {
                (overlay_answered < self.config.overlay_questions)
                    .then(|| {
                        questions.iter().find(|question| {
                            question.metadata.programs_affected >= self.config.overlay_min_programs
                        })
                    })
                    .flatten()
            })
            .cloned();

        match next {
            Some(question) => {
                let state = EngineState::QuestionPending {
                    question_id: question.id.clone(),
                };
                (Some(question), state)
            }
            None => terminal(TerminalReason::NoQuestions),
        }
    }

    fn build_question(
        &self,
        stats: &DimensionStats,
        candidates: &[&Program],
        answers: &UserAnswers,
    ) -> (SymptomQuestion, Presentation) {
        let dimension = stats.dimension;
        let template = bootstrap::template(dimension);
        let rules = bootstrap::rules(dimension);
        let core = self.core.contains(&dimension);
        let presentation = resolve_rules(&rules, core, answers);

        let question = SymptomQuestion {
            id: dimension.question_id().to_string(),
            dimension,
            prompt: template.prompt.to_string(),
            question_type: template.question_type,
            options: bootstrap::options(dimension, &self.matcher, candidates),
            required: presentation.required,
            category: template.category,
            rules,
            metadata: QuestionMetadata {
                programs_affected: stats.programs_affected,
                information_value: stats.information_value(),
                decisiveness: stats.decisiveness(),
                ux_weight: dimension.ux_weight(),
                rank_score: stats.rank_score(),
                core,
                ranking_version: RANKING_VERSION,
            },
        };

        (question, presentation)
    }
}

fn terminal(reason: TerminalReason) -> (Option<SymptomQuestion>, EngineState) {
    debug!(?reason, "question engine finished");
    (None, EngineState::Terminal { reason })
}
