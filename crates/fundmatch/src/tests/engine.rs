use super::common::{location_heavy_catalog, mixed_catalog, ProgramBuilder};
use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::Dimension;
use crate::question::{EngineState, QuestionConfig, QuestionEngine, TerminalReason};

#[test]
fn hard_location_outranks_soft_team_size() {
    let mut engine = QuestionEngine::new(location_heavy_catalog(), QuestionConfig::default());
    assert_eq!(engine.core_dimensions(), &[Dimension::Location, Dimension::TeamSize]);

    let question = engine.get_next_question(&UserAnswers::new()).expect("first question");
    assert_eq!(question.id, "location");
    assert_eq!(question.metadata.programs_affected, 8);
    assert_eq!(question.metadata.information_value, 300);
    assert_eq!(question.metadata.rank_score, 3000);
    assert!(question.metadata.core);
    assert_eq!(
        engine.state(),
        &EngineState::QuestionPending {
            question_id: "location".to_string()
        }
    );
}

#[test]
fn filtering_everything_out_ends_the_session() {
    let mut engine = QuestionEngine::new(location_heavy_catalog(), QuestionConfig::default());
    let mut answers = UserAnswers::new();

    answers.insert("location", "germany");
    let question = engine.get_next_question(&answers).expect("team size still open");
    assert_eq!(question.id, "team_size");
    assert_eq!(engine.get_remaining_program_count(), 2);

    answers.insert("team_size", "1to2");
    assert!(engine.get_next_question(&answers).is_none());
    assert_eq!(engine.get_remaining_program_count(), 0);
    assert_eq!(
        engine.state(),
        &EngineState::Terminal {
            reason: TerminalReason::NoCandidates
        }
    );
}

#[test]
fn candidate_set_never_grows_within_a_session() {
    let mut engine = QuestionEngine::new(mixed_catalog(), QuestionConfig::default());
    let mut answers = UserAnswers::new();
    let mut previous = engine.get_remaining_program_count();

    for (question, value) in [("location", "austria"), ("company_type", "startup"), ("funding_amount", "over2m")] {
        answers.insert(question, value);
        engine.get_next_question(&answers);
        let current = engine.get_remaining_program_count();
        assert!(current <= previous, "{question} grew the candidate set");
        previous = current;
    }

    engine.reset();
    assert_eq!(engine.get_remaining_program_count(), 4);
    assert_eq!(engine.state(), &EngineState::Idle);
}

#[test]
fn pure_decision_threads_candidates_explicitly() {
    let catalog = mixed_catalog();
    let engine = QuestionEngine::new(catalog.clone(), QuestionConfig::default());
    let everything: Vec<&Program> = catalog.iter().collect();

    let answers = UserAnswers::new().with("location", "austria");
    let first = engine.next_question(&answers, &everything);
    let ids: Vec<&str> = first.remaining.iter().map(|program| program.id.as_str()).collect();
    assert_eq!(ids, vec!["aws-preseed", "ffg-basis", "eic-accelerator"]);

    let again = engine.next_question(&answers, &everything);
    assert_eq!(first.question, again.question);
    assert_eq!(first.state, again.state);
    assert_eq!(engine.get_remaining_program_count(), catalog.len());
}

#[test]
fn answered_questions_are_never_asked_again() {
    let mut engine = QuestionEngine::new(mixed_catalog(), QuestionConfig::default());
    let mut answers = UserAnswers::new();

    while let Some(question) = engine.get_next_question(&answers) {
        assert!(!answers.is_answered(&question.id), "{} asked twice", question.id);
        let value = question
            .options
            .first()
            .map(|option| option.value.clone())
            .unwrap_or_else(|| "digital".to_string());
        answers.insert(question.id.clone(), value);
        assert!(answers.len() <= engine.config().max_questions);
    }

    assert!(engine.state().is_terminal());
}

#[test]
fn question_cap_stops_the_session() {
    let config = QuestionConfig {
        max_questions: 1,
        core_questions: 1,
        ..QuestionConfig::default()
    };
    let mut engine = QuestionEngine::new(mixed_catalog(), config);
    let answers = UserAnswers::new().with("location", "eu");

    assert!(engine.get_next_question(&answers).is_none());
    assert_eq!(
        engine.state(),
        &EngineState::Terminal {
            reason: TerminalReason::QuestionCap
        }
    );
}

#[test]
fn hidden_questions_are_skipped() {
    let catalog: std::sync::Arc<[Program]> = vec![
        ProgramBuilder::new("a")
            .applicants("Startups")
            .team("at least 3 employees")
            .build(),
        ProgramBuilder::new("b")
            .applicants("Large corporations")
            .team("at least 50 employees")
            .build(),
    ]
    .into();
    let engine = QuestionEngine::new(catalog.clone(), QuestionConfig::default());
    let everything: Vec<&Program> = catalog.iter().collect();

    let answers = UserAnswers::new().with("company_type", "large");
    let result = engine.next_question(&answers, &everything);
    assert!(result.question.is_none());
    assert_eq!(
        result.state,
        EngineState::Terminal {
            reason: TerminalReason::NoQuestions
        }
    );
}

#[test]
fn core_questions_follow_catalog_ranking() {
    let engine = QuestionEngine::new(mixed_catalog(), QuestionConfig::default());
    let core: Vec<String> = engine
        .get_core_questions()
        .into_iter()
        .map(|question| question.id)
        .collect();
    assert_eq!(core, vec!["location", "industry_focus", "company_type", "funding_amount"]);

    let all = engine.get_all_questions();
    assert_eq!(all.len(), core.len());
    assert!(all.iter().all(|question| question.metadata.ranking_version == 1));
}

#[test]
fn single_sector_industry_question_is_skipped_mid_session() {
    let catalog: Vec<Program> = vec![
        ProgramBuilder::new("at-digital-startups").located("Austria").focus(&["Digital"]).applicants("Startups").build(),
        ProgramBuilder::new("at-digital-sme").located("Austria").focus(&["Digital"]).applicants("SME").build(),
        ProgramBuilder::new("de-green-startups").located("Germany").focus(&["Sustainability"]).applicants("Startups").build(),
        ProgramBuilder::new("de-green-sme").located("Germany").focus(&["Sustainability"]).applicants("SME").build(),
    ];
    let mut engine = QuestionEngine::new(catalog.into(), QuestionConfig::default());
    assert_eq!(
        engine.core_dimensions(),
        &[Dimension::Location, Dimension::IndustryFocus, Dimension::CompanyType]
    );

    let answers = UserAnswers::new().with("location", "austria");
    let question = engine.get_next_question(&answers).expect("company type still open");
    assert_eq!(engine.get_remaining_program_count(), 2);
    assert_eq!(question.id, "company_type");
    assert!(question.metadata.core);
}

#[test]
fn catalog_wide_listing_omits_unreferenced_dimensions() {
    let engine = QuestionEngine::new(location_heavy_catalog(), QuestionConfig::default());
    let all = engine.get_all_questions();
    let ids: Vec<&str> = all.iter().map(|question| question.id.as_str()).collect();
    assert_eq!(ids, vec!["location", "team_size"]);
    assert!(all.iter().all(|question| question.metadata.programs_affected > 0));
}
