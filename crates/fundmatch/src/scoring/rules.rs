use super::config::ScoringWeights;
use super::{Gap, MatchedCriterion};
use crate::answers::UserAnswers;
use crate::catalog::Program;
use crate::criteria::{CriteriaMatcher, CriterionOutcome, Dimension};

pub(crate) struct CriteriaTally {
    pub matched: Vec<MatchedCriterion>,
    pub gaps: Vec<Gap>,
    pub points: u32,
}

pub(crate) fn score_program(
    program: &Program,
    answers: &UserAnswers,
    weights: &ScoringWeights,
    matcher: &CriteriaMatcher,
) -> CriteriaTally {
    let mut tally = CriteriaTally {
        matched: Vec::new(),
        gaps: Vec::new(),
        points: 0,
    };

    for dimension in Dimension::ALL {
        let weight = weights.weight(dimension);
        if weight == 0 {
            continue;
        }

        match matcher.evaluate(dimension, answers, program) {
            CriterionOutcome::NotAnswered | CriterionOutcome::Unrecognised => {}
            CriterionOutcome::Unconstrained => {
                tally.matched.push(MatchedCriterion {
                    key: dimension,
                    points: weight,
                    reason: format!("{}: no restriction in this program.", dimension.label()),
                });
                tally.points += weight;
            }
            CriterionOutcome::Matched => {
                tally.matched.push(MatchedCriterion {
                    key: dimension,
                    points: weight,
                    reason: matched_reason(dimension),
                });
                tally.points += weight;
            }
            CriterionOutcome::Mismatched => tally.gaps.push(Gap {
                key: dimension,
                description: gap_description(dimension),
            }),
        }
    }

    tally
}

fn matched_reason(dimension: Dimension) -> String {
    match dimension {
        Dimension::Location => "Your location is within the program's eligible region.".to_string(),
        Dimension::CompanyType => "Your organisation type is eligible.".to_string(),
        Dimension::FundingAmount => "Your funding need fits the program's funding range.".to_string(),
        Dimension::IndustryFocus => "Your sector matches the program focus.".to_string(),
        other => format!("{} matches the program requirements.", other.label()),
    }
}

fn gap_description(dimension: Dimension) -> String {
    match dimension {
        Dimension::Location => "The program is not open to applicants from your location.".to_string(),
        Dimension::CompanyType => "The program targets a different type of organisation.".to_string(),
        Dimension::FundingAmount => "Your funding need is outside the program's funding range.".to_string(),
        other => format!("{} does not meet the program requirements.", other.label()),
    }
}
