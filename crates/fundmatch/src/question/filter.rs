use tracing::debug;

use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::CriteriaMatcher;

/// Keeps the candidates no answered dimension rules out. Never adds programs.
pub fn apply_filters<'a>(
    matcher: &CriteriaMatcher,
    answers: &UserAnswers,
    candidates: &[&'a Program],
) -> Vec<&'a Program> {
    let remaining: Vec<&'a Program> = candidates
        .iter()
        .copied()
        .filter(|program| matcher.admits(answers, program))
        .collect();

    debug!(
        before = candidates.len(),
        after = remaining.len(),
        answered = answers.len(),
        "applied answer filters"
    );

    remaining
}
