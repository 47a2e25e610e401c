use super::common::mixed_catalog;
use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::CriteriaMatcher;
use crate::question::{apply_filters, QuestionConfig, QuestionEngine};
use crate::scoring::ScoringEngine;

const ANSWERS: [(&str, &str); 4] = [
    ("location", "austria"),
    ("company_type", "startup"),
    ("funding_amount", "under100k"),
    ("industry_focus", "digital"),
];

fn ids(programs: &[&Program]) -> Vec<String> {
    programs.iter().map(|program| program.id.clone()).collect()
}

#[test]
fn filtering_ignores_answer_order() {
    let catalog = mixed_catalog();
    let everything: Vec<&Program> = catalog.iter().collect();
    let matcher = CriteriaMatcher::new();

    let forward: UserAnswers = ANSWERS.iter().copied().collect();
    let backward: UserAnswers = ANSWERS.iter().rev().copied().collect();

    assert_eq!(
        ids(&apply_filters(&matcher, &forward, &everything)),
        ids(&apply_filters(&matcher, &backward, &everything))
    );
}

#[test]
fn stepwise_session_matches_one_shot_filtering() {
    let catalog = mixed_catalog();
    let mut engine = QuestionEngine::new(catalog, QuestionConfig::default());
    let mut answers = UserAnswers::new();
    for (question, value) in ANSWERS {
        answers.insert(question, value);
        engine.get_next_question(&answers);
    }

    assert_eq!(
        ids(&engine.get_remaining_programs()),
        ids(&engine.get_filtered_programs_for_answers(&answers))
    );
}

#[test]
fn scoring_is_deterministic_and_bounded() {
    let catalog = mixed_catalog();
    let answers: UserAnswers = ANSWERS.iter().copied().collect();
    let engine = ScoringEngine::default();

    let first = engine.score_programs(&answers, &catalog);
    let second = engine.score_programs(&answers, &catalog);
    assert_eq!(first, second);

    for result in &first {
        assert!(result.score <= 100);
        let points: u32 = result.matched_criteria.iter().map(|criterion| criterion.points).sum();
        assert_eq!(u32::from(result.score), points.min(100));
    }
}

#[test]
fn empty_answers_admit_the_whole_catalog() {
    let catalog = mixed_catalog();
    let engine = QuestionEngine::new(catalog.clone(), QuestionConfig::default());
    assert_eq!(
        engine.get_filtered_programs_for_answers(&UserAnswers::new()).len(),
        catalog.len()
    );
}
