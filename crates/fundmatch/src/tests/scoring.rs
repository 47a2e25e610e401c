use super::common::{mixed_catalog, ProgramBuilder};
use crate::answers::UserAnswers;
use crate::criteria::{CriteriaMatcher, Dimension};
use crate::scoring::{Confidence, Eligibility, ScoringEngine, ScoringWeights};

#[test]
fn matching_location_earns_its_full_weight() {
    let program = ProgramBuilder::new("p1").located("Austria").build();
    let answers = UserAnswers::new().with("location", "austria");

    let result = ScoringEngine::default().score(&answers, &program);
    assert_eq!(result.score, 35);
    assert_eq!(result.matched_criteria.len(), 1);
    assert_eq!(result.matched_criteria[0].key, Dimension::Location);
    assert_eq!(result.matched_criteria[0].points, 35);
    assert!(result.gaps.is_empty());
    assert_eq!(result.eligibility, Eligibility::NotEligible);
}

#[test]
fn mismatched_location_scores_nothing() {
    let program = ProgramBuilder::new("p1").located("Austria").build();
    let answers = UserAnswers::new().with("location", "germany");

    let result = ScoringEngine::default().score(&answers, &program);
    assert_eq!(result.score, 0);
    assert_eq!(result.eligibility, Eligibility::NotEligible);
    assert_eq!(result.confidence, Confidence::Low);
    assert_eq!(result.gaps.len(), 1);
    assert_eq!(result.gaps[0].key, Dimension::Location);
    assert_eq!(result.reason, "Program relevance could not be determined.");
}

#[test]
fn funding_ranges_overlap_with_tolerance() {
    let wide = ProgramBuilder::new("wide").funding(50_000.0, 2_000_000.0).build();
    let large = ProgramBuilder::new("large").funding(5_000_000.0, 10_000_000.0).build();
    let answers = UserAnswers::new().with("funding_amount", "under100k");
    let engine = ScoringEngine::default();

    let wide = engine.score(&answers, &wide);
    assert_eq!(wide.score, 20);
    assert!(wide.gaps.is_empty());

    let large = engine.score(&answers, &large);
    assert_eq!(large.score, 0);
    assert_eq!(large.gaps[0].key, Dimension::FundingAmount);
}

#[test]
fn ranks_mixed_catalog_best_first() {
    let catalog = mixed_catalog();
    let answers = UserAnswers::new()
        .with("location", "austria")
        .with("company_type", "startup")
        .with("funding_amount", "under100k")
        .with("industry_focus", "digital");

    let results = ScoringEngine::default().score_programs(&answers, &catalog);
    let ranking: Vec<(&str, u8)> = results
        .iter()
        .map(|result| (result.program.id.as_str(), result.score))
        .collect();
    assert_eq!(
        ranking,
        vec![
            ("aws-preseed", 85),
            ("ffg-basis", 65),
            ("eic-accelerator", 65),
            ("bavaria-digital", 50),
        ]
    );

    let best = &results[0];
    assert_eq!(best.eligibility, Eligibility::Eligible);
    assert_eq!(best.confidence, Confidence::High);
    assert!(best.gaps.is_empty());
    assert_eq!(
        best.reason,
        "Your location is within the program's eligible region. Your sector matches the program focus. Your organisation type is eligible."
    );

    let boundary = &results[3];
    assert_eq!(boundary.eligibility, Eligibility::Eligible);
    assert_eq!(boundary.confidence, Confidence::Medium);
}

#[test]
fn unconstrained_criteria_count_as_satisfied() {
    let open = ProgramBuilder::new("open").build();
    let answers = UserAnswers::new()
        .with("location", "austria")
        .with("company_type", "sme")
        .with("funding_amount", "100kto500k");

    let result = ScoringEngine::default().score(&answers, &open);
    assert_eq!(result.score, 75);
    assert!(result
        .matched_criteria
        .iter()
        .all(|criterion| criterion.reason.ends_with("no restriction in this program.")));
}

#[test]
fn unrecognised_answers_neither_score_nor_exclude() {
    let program = ProgramBuilder::new("p1").located("Austria").build();
    let answers = UserAnswers::new().with("location", "atlantis");
    let matcher = CriteriaMatcher::new();

    let result = ScoringEngine::default().score(&answers, &program);
    assert_eq!(result.score, 0);
    assert!(result.gaps.is_empty());
    assert!(matcher.admits(&answers, &program));
}

#[test]
fn filter_only_dimensions_do_not_score() {
    let program = ProgramBuilder::new("p1").build();
    let answers = UserAnswers::new()
        .with("trl_level", "trl_4_6")
        .with("consortium", "no");

    let result = ScoringEngine::new(ScoringWeights::default()).score(&answers, &program);
    assert_eq!(result.score, 0);
    assert!(result.matched_criteria.is_empty());
}
