use std::collections::BTreeMap;

use super::model::{QuestionOption, QuestionType};
use super::predicate::{ConditionalRule, Predicate, RuleAction};
use crate::catalog::{Program, RequirementCategory};
use crate::criteria::{CriteriaMatcher, Dimension};
use crate::normalization::industry_label;

/// Number of sectors offered for the industry question.
const INDUSTRY_OPTION_LIMIT: usize = 6;

/// Static wording, options and rules for a dimension's question.
pub(crate) struct QuestionTemplate {
    pub prompt: &'static str,
    pub question_type: QuestionType,
    pub category: RequirementCategory,
    pub options: &'static [(&'static str, &'static str)],
}

pub(crate) fn template(dimension: Dimension) -> QuestionTemplate {
    let (prompt, question_type, category, options): (_, _, _, &'static [(&str, &str)]) = match dimension {
        Dimension::Location => (
            "Where is your company based?",
            QuestionType::SingleSelect,
            RequirementCategory::Geographic,
            &[
                ("austria", "Austria"),
                ("germany", "Germany"),
                ("eu", "Another EU country"),
                ("international", "Outside the EU"),
            ],
        ),
        Dimension::IndustryFocus => (
            "Which sectors does your project address?",
            QuestionType::MultiSelect,
            RequirementCategory::Project,
            &[],
        ),
        Dimension::CompanyType => (
            "What kind of organisation is applying?",
            QuestionType::SingleSelect,
            RequirementCategory::Eligibility,
            &[
                ("startup", "Startup"),
                ("sme", "Small or medium-sized enterprise"),
                ("large", "Large company"),
                ("research", "University or research institution"),
                ("nonprofit", "Non-profit organisation"),
                ("individual", "Individual founder"),
            ],
        ),
        Dimension::CompanyStage => (
            "How far along is your company?",
            QuestionType::SingleSelect,
            RequirementCategory::Eligibility,
            &[
                ("idea", "Idea or concept"),
                ("pre_company", "Team formed, not yet incorporated"),
                ("inc_lt_6m", "Incorporated less than 6 months ago"),
                ("inc_6_36m", "Incorporated 6 to 36 months ago"),
                ("inc_gt_36m", "Incorporated more than 36 months ago"),
                ("research_org", "Research organisation"),
            ],
        ),
        Dimension::FundingAmount => (
            "How much funding do you need?",
            QuestionType::SingleSelect,
            RequirementCategory::Financial,
            &[
                ("under100k", "Less than EUR 100,000"),
                ("100kto500k", "EUR 100,000 to 500,000"),
                ("500kto2m", "EUR 500,000 to 2 million"),
                ("over2m", "More than EUR 2 million"),
            ],
        ),
        Dimension::TrlLevel => (
            "What technology readiness level has your solution reached?",
            QuestionType::SingleSelect,
            RequirementCategory::Technical,
            &[
                ("trl_1_3", "TRL 1-3: research and proof of concept"),
                ("trl_4_6", "TRL 4-6: prototype and validation"),
                ("trl_7_9", "TRL 7-9: demonstration and market entry"),
            ],
        ),
        Dimension::CoFinancing => (
            "Can you contribute own funds to the project?",
            QuestionType::SingleSelect,
            RequirementCategory::CoFinancing,
            &[
                ("co_yes", "Yes, fully"),
                ("co_partial", "Partially"),
                ("co_no", "No"),
            ],
        ),
        Dimension::UseOfFunds => (
            "What will you use the funding for?",
            QuestionType::MultiSelect,
            RequirementCategory::UseOfFunds,
            &[
                ("rd", "Research and development"),
                ("marketing", "Marketing and sales"),
                ("equipment", "Equipment and infrastructure"),
                ("personnel", "Hiring and personnel"),
                ("internationalization", "Entering foreign markets"),
                ("working_capital", "Working capital"),
            ],
        ),
        Dimension::Consortium => (
            "Will you apply together with partners?",
            QuestionType::SingleSelect,
            RequirementCategory::Consortium,
            &[
                ("yes", "Yes, we have a consortium"),
                ("open", "We are open to finding partners"),
                ("no", "No, we apply alone"),
            ],
        ),
        Dimension::TeamSize => (
            "How many people work on the project?",
            QuestionType::SingleSelect,
            RequirementCategory::Team,
            &[
                ("1to2", "1-2 people"),
                ("3to5", "3-5 people"),
                ("6to10", "6-10 people"),
                ("over10", "More than 10 people"),
            ],
        ),
        Dimension::RevenueStatus => (
            "Is your company generating revenue?",
            QuestionType::SingleSelect,
            RequirementCategory::Financial,
            &[
                ("pre_revenue", "Not yet"),
                ("early_revenue", "First revenue"),
                ("established_revenue", "Established revenue"),
            ],
        ),
        Dimension::DeadlineUrgency => (
            "When do you need to submit an application?",
            QuestionType::SingleSelect,
            RequirementCategory::Timeline,
            &[
                ("urgent", "Within a month"),
                ("soon", "Within three months"),
                ("flexible", "Within six months"),
            ],
        ),
        Dimension::ImpactFocus => (
            "Which impact does your project aim for?",
            QuestionType::MultiSelect,
            RequirementCategory::Impact,
            &[
                ("economic", "Economic growth and jobs"),
                ("social", "Social impact"),
                ("environmental", "Environmental and climate"),
                ("innovation", "Technological innovation"),
            ],
        ),
    };

    QuestionTemplate {
        prompt,
        question_type,
        category,
        options,
    }
}

/// Branching rules attached to each dimension's question.
pub(crate) fn rules(dimension: Dimension) -> Vec<ConditionalRule> {
    match dimension {
        Dimension::CompanyStage => vec![ConditionalRule::new(
            RuleAction::Hide,
            Predicate::equals("company_type", "research"),
        )],
        Dimension::RevenueStatus => vec![ConditionalRule::new(
            RuleAction::Hide,
            Predicate::one_of("company_stage", &["idea", "pre_company"]),
        )],
        Dimension::TrlLevel => vec![ConditionalRule::new(
            RuleAction::Show,
            Predicate::Or {
                any: vec![
                    Predicate::one_of("company_type", &["startup", "sme", "research"]),
                    Predicate::contains("use_of_funds", "rd"),
                ],
            },
        )],
        Dimension::Consortium => vec![ConditionalRule::new(
            RuleAction::Require,
            Predicate::equals("company_type", "research"),
        )],
        Dimension::TeamSize => vec![ConditionalRule::new(
            RuleAction::Hide,
            Predicate::equals("company_type", "large"),
        )],
        _ => Vec::new(),
    }
}

/// Options for a dimension. Industry options come from the candidates' most common sectors.
pub(crate) fn options(
    dimension: Dimension,
    matcher: &CriteriaMatcher,
    candidates: &[&Program],
) -> Vec<QuestionOption> {
    if dimension == Dimension::IndustryFocus {
        return industry_options(matcher, candidates);
    }

    template(dimension)
        .options
        .iter()
        .map(|(value, label)| QuestionOption::new(*value, *label))
        .collect()
}

fn industry_options(matcher: &CriteriaMatcher, candidates: &[&Program]) -> Vec<QuestionOption> {
    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for program in candidates {
        for sector in matcher.industry_sectors(program) {
            *counts.entry(sector).or_default() += 1;
        }
    }

    let mut sectors: Vec<(&'static str, usize)> = counts.into_iter().collect();
    sectors.sort_by(|left, right| right.1.cmp(&left.1));

    sectors
        .into_iter()
        .take(INDUSTRY_OPTION_LIMIT)
        .map(|(sector, _)| QuestionOption::new(sector, industry_label(sector).unwrap_or(sector)))
        .collect()
}
