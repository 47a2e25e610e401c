//! Shared "does this answer satisfy this program" logic for filtering and scoring.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::answers::{AnswerValue, UserAnswers};
use crate::catalog::{Decisiveness, Program, RequirementCategory, RequirementItem};
use crate::normalization as norm;

/// Profile dimension a question asks about. Declaration order breaks ranking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Location,
    IndustryFocus,
    CompanyType,
    CompanyStage,
    FundingAmount,
    TrlLevel,
    CoFinancing,
    UseOfFunds,
    Consortium,
    TeamSize,
    RevenueStatus,
    DeadlineUrgency,
    ImpactFocus,
}

impl Dimension {
    pub const ALL: [Dimension; 13] = [
        Dimension::Location,
        Dimension::IndustryFocus,
        Dimension::CompanyType,
        Dimension::CompanyStage,
        Dimension::FundingAmount,
        Dimension::TrlLevel,
        Dimension::CoFinancing,
        Dimension::UseOfFunds,
        Dimension::Consortium,
        Dimension::TeamSize,
        Dimension::RevenueStatus,
        Dimension::DeadlineUrgency,
        Dimension::ImpactFocus,
    ];

    /// Key under which the answer is stored in [`UserAnswers`].
    pub fn question_id(self) -> &'static str {
        match self {
            Dimension::Location => "location",
            Dimension::IndustryFocus => "industry_focus",
            Dimension::CompanyType => "company_type",
            Dimension::CompanyStage => "company_stage",
            Dimension::FundingAmount => "funding_amount",
            Dimension::TrlLevel => "trl_level",
            Dimension::CoFinancing => "co_financing",
            Dimension::UseOfFunds => "use_of_funds",
            Dimension::Consortium => "consortium",
            Dimension::TeamSize => "team_size",
            Dimension::RevenueStatus => "revenue_status",
            Dimension::DeadlineUrgency => "deadline_urgency",
            Dimension::ImpactFocus => "impact_focus",
        }
    }

    pub fn from_question_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dimension| dimension.question_id() == id)
    }

    /// Fixed preference for asking this dimension early.
    pub fn ux_weight(self) -> u32 {
        match self {
            Dimension::Location => 10,
            Dimension::IndustryFocus => 9,
            Dimension::CompanyType => 7,
            Dimension::CompanyStage => 6,
            Dimension::FundingAmount | Dimension::TrlLevel => 5,
            Dimension::CoFinancing | Dimension::UseOfFunds => 4,
            Dimension::Consortium | Dimension::TeamSize | Dimension::RevenueStatus => 3,
            Dimension::DeadlineUrgency => 2,
            Dimension::ImpactFocus => 1,
        }
    }

    /// Human-readable criterion name used in explanations.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Location => "Location",
            Dimension::IndustryFocus => "Industry focus",
            Dimension::CompanyType => "Company type",
            Dimension::CompanyStage => "Company stage",
            Dimension::FundingAmount => "Funding amount",
            Dimension::TrlLevel => "Technology readiness",
            Dimension::CoFinancing => "Co-financing",
            Dimension::UseOfFunds => "Use of funds",
            Dimension::Consortium => "Consortium",
            Dimension::TeamSize => "Team size",
            Dimension::RevenueStatus => "Revenue status",
            Dimension::DeadlineUrgency => "Deadline",
            Dimension::ImpactFocus => "Impact focus",
        }
    }

    /// Requirement items that speak about this dimension.
    fn requirement_items(self, program: &Program) -> Vec<&RequirementItem> {
        use RequirementCategory as C;

        let whole = |category: RequirementCategory| {
            program.requirements(&category).iter().collect::<Vec<_>>()
        };
        let by_kind = |categories: &[RequirementCategory], kinds: &[&str]| {
            categories
                .iter()
                .flat_map(|category| program.requirements(category))
                .filter(|item| item.is_kind(kinds))
                .collect::<Vec<_>>()
        };

        match self {
            Dimension::Location => {
                let mut items = whole(C::Geographic);
                items.extend(by_kind(&[C::Eligibility], &["location", "region", "country", "geographic"]));
                items
            }
            Dimension::IndustryFocus => by_kind(
                &[C::Project, C::Eligibility],
                &["industry", "industry_focus", "sector", "thematic_focus", "focus_area"],
            ),
            Dimension::CompanyType => by_kind(
                &[C::Eligibility, C::Team],
                &["company_type", "applicant_type", "entity_type", "legal_form", "eligible_applicants"],
            ),
            Dimension::CompanyStage => by_kind(
                &[C::Eligibility, C::Team],
                &["company_stage", "company_age", "stage", "maturity"],
            ),
            Dimension::FundingAmount => by_kind(
                &[C::Financial],
                &["funding_amount", "amount", "funding_range", "max_funding", "min_funding"],
            ),
            Dimension::TrlLevel => {
                let mut items = whole(C::Technical);
                items.extend(by_kind(&[C::Project], &["trl", "trl_level", "technology_readiness"]));
                items
            }
            Dimension::CoFinancing => {
                let mut items = whole(C::CoFinancing);
                items.extend(by_kind(&[C::Financial], &["co_financing", "cofinancing", "own_contribution"]));
                items
            }
            Dimension::UseOfFunds => {
                let mut items = whole(C::UseOfFunds);
                items.extend(by_kind(&[C::Financial], &["use_of_funds", "eligible_costs"]));
                items
            }
            Dimension::Consortium => {
                let mut items = whole(C::Consortium);
                items.extend(by_kind(&[C::Team, C::Eligibility], &["consortium", "partners", "collaboration"]));
                items
            }
            Dimension::TeamSize => by_kind(
                &[C::Team, C::Eligibility],
                &["team_size", "employees", "headcount", "min_team_size", "max_employees"],
            ),
            Dimension::RevenueStatus => by_kind(
                &[C::Financial, C::Eligibility],
                &["revenue", "revenue_status", "turnover"],
            ),
            Dimension::DeadlineUrgency => by_kind(
                &[C::Timeline],
                &["deadline", "application_deadline", "submission_deadline", "call_deadline", "closing_date"],
            ),
            Dimension::ImpactFocus => whole(C::Impact),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.question_id())
    }
}

/// Result of checking one answered dimension against one program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionOutcome {
    NotAnswered,
    /// The answer was given but no normalizer recognised it.
    Unrecognised,
    /// The program states nothing the answer could be checked against.
    Unconstrained,
    Matched,
    Mismatched,
}

impl CriterionOutcome {
    /// Everything except an explicit mismatch keeps a program in the candidate set.
    pub fn is_mismatch(self) -> bool {
        self == CriterionOutcome::Mismatched
    }
}

/// Raw program-side values for one dimension, before normalization.
struct Evidence<'a> {
    texts: Vec<Cow<'a, str>>,
    strength: Option<Decisiveness>,
}

impl<'a> Evidence<'a> {
    fn new() -> Self {
        Self {
            texts: Vec::new(),
            strength: None,
        }
    }

    fn add(&mut self, text: Cow<'a, str>, decisiveness: Decisiveness) {
        self.texts.push(text);
        self.strength = self.strength.max(Some(decisiveness));
    }

    fn joined(&self) -> Option<String> {
        (!self.texts.is_empty()).then(|| self.texts.join("; "))
    }
}

/// Single definition of dimension matching shared by the question and scoring engines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CriteriaMatcher {
    as_of: Option<NaiveDate>,
}

impl CriteriaMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference date for deadline checks. Without one, deadlines never exclude a program.
    pub fn as_of(date: NaiveDate) -> Self {
        Self { as_of: Some(date) }
    }

    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.as_of
    }

    /// Strongest decisiveness with which the program constrains the dimension, if at all.
    pub fn reference(&self, dimension: Dimension, program: &Program) -> Option<Decisiveness> {
        evidence(dimension, program).strength
    }

    /// Canonical sectors a program targets, from its focus list and industry rules.
    pub fn industry_sectors(&self, program: &Program) -> BTreeSet<&'static str> {
        evidence(Dimension::IndustryFocus, program)
            .joined()
            .as_deref()
            .and_then(norm::normalize_industry)
            .map(|industry| industry.sectors)
            .unwrap_or_default()
    }

    pub fn evaluate(&self, dimension: Dimension, answers: &UserAnswers, program: &Program) -> CriterionOutcome {
        match answers.get(dimension.question_id()) {
            Some(answer) => self.evaluate_answer(dimension, answer, program),
            None => CriterionOutcome::NotAnswered,
        }
    }

    /// True unless some answered dimension reports a mismatch.
    pub fn admits(&self, answers: &UserAnswers, program: &Program) -> bool {
        Dimension::ALL
            .into_iter()
            .all(|dimension| !self.evaluate(dimension, answers, program).is_mismatch())
    }

    pub fn evaluate_answer(&self, dimension: Dimension, answer: &AnswerValue, program: &Program) -> CriterionOutcome {
        let selections = answer.selections();
        if selections.is_empty() {
            return CriterionOutcome::NotAnswered;
        }

        let evidence = evidence(dimension, program);
        let joined = evidence.joined();
        let text = joined.as_deref();

        match dimension {
            Dimension::Location => compare(
                &selections,
                text.and_then(norm::normalize_location),
                norm::normalize_location,
                norm::match_location,
            ),
            Dimension::IndustryFocus => compare(
                &selections,
                text.and_then(norm::normalize_industry),
                norm::normalize_industry,
                norm::match_industry,
            ),
            Dimension::CompanyType => compare(
                &selections,
                text.and_then(norm::normalize_company_type),
                norm::normalize_company_type,
                norm::match_company_type,
            ),
            Dimension::CompanyStage => compare(
                &selections,
                text.and_then(norm::normalize_company_stage),
                norm::normalize_company_stage,
                norm::match_company_stage,
            ),
            Dimension::FundingAmount => {
                let program_side = program
                    .funding_amount
                    .as_ref()
                    .and_then(norm::normalize_funding_bounds)
                    .or_else(|| text.and_then(norm::normalize_funding_requirement));
                compare(
                    &selections,
                    program_side,
                    norm::normalize_funding_amount,
                    norm::match_funding_amount,
                )
            }
            Dimension::TrlLevel => compare(
                &selections,
                text.and_then(norm::normalize_trl),
                norm::normalize_trl,
                norm::match_trl,
            ),
            Dimension::CoFinancing => {
                let program_side = text
                    .and_then(norm::normalize_co_financing)
                    .or_else(|| norm::co_financing_from_funding_types(&program.funding_types));
                compare(
                    &selections,
                    program_side,
                    norm::normalize_co_financing,
                    norm::match_co_financing,
                )
            }
            Dimension::UseOfFunds => compare(
                &selections,
                text.and_then(norm::normalize_use_of_funds),
                norm::normalize_use_of_funds,
                norm::match_tags,
            ),
            Dimension::Consortium => compare(
                &selections,
                text.and_then(norm::normalize_consortium),
                norm::normalize_consortium,
                norm::match_consortium,
            ),
            Dimension::TeamSize => compare(
                &selections,
                text.and_then(norm::normalize_team_size),
                norm::normalize_team_size,
                norm::match_team_size,
            ),
            Dimension::RevenueStatus => {
                let program_side = text
                    .and_then(norm::normalize_revenue_constraint)
                    .or_else(|| norm::revenue_constraint_from_funding_types(&program.funding_types));
                compare(
                    &selections,
                    program_side,
                    norm::normalize_revenue_status,
                    norm::match_revenue_status,
                )
            }
            Dimension::DeadlineUrgency => {
                let Some(as_of) = self.as_of else {
                    return recognised(
                        &selections,
                        norm::normalize_urgency,
                        CriterionOutcome::Unconstrained,
                    );
                };
                compare(
                    &selections,
                    text.and_then(norm::normalize_deadline),
                    norm::normalize_urgency,
                    |user, program| norm::match_deadline(user, program, Some(as_of)),
                )
            }
            Dimension::ImpactFocus => compare(
                &selections,
                text.and_then(norm::normalize_impact_focus),
                norm::normalize_impact_focus,
                norm::match_tags,
            ),
        }
    }
}

fn evidence(dimension: Dimension, program: &Program) -> Evidence<'_> {
    let mut evidence = Evidence::new();

    match dimension {
        Dimension::Location => {
            if let Some(region) = program.region.as_deref().filter(|region| !region.trim().is_empty()) {
                evidence.add(Cow::Borrowed(region), Decisiveness::Hard);
            }
        }
        Dimension::IndustryFocus if !program.program_focus.is_empty() => {
            evidence.add(Cow::Owned(program.program_focus.join("; ")), Decisiveness::Hard);
        }
        Dimension::FundingAmount => {
            if program.funding_amount.as_ref().and_then(norm::normalize_funding_bounds).is_some() {
                evidence.strength = Some(Decisiveness::Hard);
            }
        }
        Dimension::CoFinancing | Dimension::RevenueStatus if !program.funding_types.is_empty() => {
            evidence.strength = Some(Decisiveness::Soft);
        }
        _ => {}
    }

    for item in dimension.requirement_items(program) {
        if let Some(text) = item.value.as_text() {
            evidence.add(text, item.decisiveness());
        }
    }

    evidence
}

/// Multi-select answers match when any selection matches.
fn compare<U, P>(
    selections: &[Cow<'_, str>],
    program: Option<P>,
    normalize: impl Fn(&str) -> Option<U>,
    matches: impl Fn(Option<&U>, Option<&P>) -> bool,
) -> CriterionOutcome {
    let users: Vec<U> = selections.iter().filter_map(|value| normalize(&**value)).collect();
    if users.is_empty() {
        return CriterionOutcome::Unrecognised;
    }

    let Some(program) = program else {
        return CriterionOutcome::Unconstrained;
    };

    if users.iter().any(|user| matches(Some(user), Some(&program))) {
        CriterionOutcome::Matched
    } else {
        CriterionOutcome::Mismatched
    }
}

fn recognised<U>(
    selections: &[Cow<'_, str>],
    normalize: impl Fn(&str) -> Option<U>,
    outcome: CriterionOutcome,
) -> CriterionOutcome {
    if selections.iter().any(|value| normalize(&**value).is_some()) {
        outcome
    } else {
        CriterionOutcome::Unrecognised
    }
}
